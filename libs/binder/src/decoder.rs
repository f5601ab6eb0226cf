//! Schema-directed decoding of an annotation index
//!
//! The walk visits every field of the destination schema, takes its value
//! from the index according to the field's source, then runs the field's
//! rules against the final value. Conversion and rule failures become
//! diagnostics and never stop the walk; only a broken schema aborts a call.

use std::collections::BTreeSet;

use mosaic_annotation::{AnnotationIndex, Position, PositionedAnnotation};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{ConversionError, Result, SchemaError};
use crate::rules::{RuleContext, RuleRegistry};
use crate::schema::{Bind, FieldKind, FieldSpec, Mode, Source};
use crate::trace::FieldTrace;
use crate::value::FieldValue;

/// Outcome of decoding into a caller-owned value
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub diagnostics: Diagnostics,
    pub trace: FieldTrace,
    /// Annotation keys some field looked up and found
    pub consumed: BTreeSet<String>,
}

/// A decoded value together with what the pass observed
#[derive(Debug, Clone, Default)]
pub struct Decoded<T> {
    pub value: T,
    pub diagnostics: Diagnostics,
    pub trace: FieldTrace,
    pub consumed: BTreeSet<String>,
}

impl<T> Decoded<T> {
    pub fn has_failures(&self) -> bool {
        self.diagnostics.has_failures()
    }

    /// Annotations under `prefix` that no field consumed
    pub fn unused<'a>(
        &'a self,
        prefix: &'a str,
        index: &'a AnnotationIndex,
    ) -> impl Iterator<Item = &'a PositionedAnnotation> + 'a {
        index
            .with_prefix(prefix)
            .filter(move |a| !self.consumed.contains(&a.key))
    }
}

/// Decodes annotation indexes into [`Bind`] types
///
/// Holds no per-call state; one decoder can serve any number of calls,
/// concurrently or not.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'r> {
    rules: &'r RuleRegistry,
}

impl<'r> Decoder<'r> {
    pub fn new(rules: &'r RuleRegistry) -> Self {
        Self { rules }
    }

    /// Decode a fresh `T` from the annotations under `prefix`
    pub fn decode<T: Bind>(&self, prefix: &str, index: &AnnotationIndex) -> Result<Decoded<T>> {
        let mut value = T::default();
        let report = self.decode_into(prefix, index, &mut value)?;
        Ok(Decoded {
            value,
            diagnostics: report.diagnostics,
            trace: report.trace,
            consumed: report.consumed,
        })
    }

    /// Decode into an existing value; fields without a matching annotation
    /// keep what they hold
    pub fn decode_into<T: Bind>(
        &self,
        prefix: &str,
        index: &AnnotationIndex,
        target: &mut T,
    ) -> Result<Report> {
        if prefix.is_empty() {
            return Err(SchemaError::EmptyPrefix);
        }

        let schema = T::schema();
        schema.verify(self.rules, Mode::Namespaced)?;

        tracing::debug!(
            schema = schema.name(),
            prefix,
            annotations = index.len(),
            "decoding annotations"
        );

        let mut walk = Walk::new(index, self.rules);
        walk.namespaced(target, prefix, schema.name());
        let report = walk.finish();

        tracing::debug!(
            schema = schema.name(),
            bound = report.trace.len(),
            failures = report.diagnostics.failure_count(),
            warnings = report.diagnostics.warning_count(),
            "decoded annotations"
        );

        Ok(report)
    }
}

/// Private accumulator of one decode call
pub(crate) struct Walk<'r> {
    index: &'r AnnotationIndex,
    rules: &'r RuleRegistry,
    diagnostics: Diagnostics,
    trace: FieldTrace,
    consumed: BTreeSet<String>,
}

impl<'r> Walk<'r> {
    fn new(index: &'r AnnotationIndex, rules: &'r RuleRegistry) -> Self {
        Self {
            index,
            rules,
            diagnostics: Diagnostics::new(),
            trace: FieldTrace::new(),
            consumed: BTreeSet::new(),
        }
    }

    fn finish(self) -> Report {
        Report {
            diagnostics: self.diagnostics,
            trace: self.trace,
            consumed: self.consumed,
        }
    }

    /// Bind every field of `target` from keys `prefix-<name>`
    pub(crate) fn namespaced<T: Bind>(&mut self, target: &mut T, prefix: &str, path: &str) {
        let index = self.index;

        for field in T::schema().fields() {
            let spec = &field.spec;
            let key = format!("{prefix}-{}", spec.name());
            let field_path = format!("{path}.{}", spec.ident());
            let found = index.get(&key);
            // Composite kinds mark their own keys when they read them
            if found.is_some()
                && matches!(
                    field.kind,
                    FieldKind::Scalar(_) | FieldKind::Flag(_) | FieldKind::List(_)
                )
            {
                self.consumed.insert(key.clone());
            }
            let position = found.map(|a| &a.position);

            match &field.kind {
                FieldKind::Scalar(slot) => {
                    let converted = found.map_or(true, |a| {
                        let result = slot.set(target, a.value());
                        self.settle(result, &field_path, &key, &key, a)
                    });
                    if converted {
                        self.validate(spec, slot.value(target), &key, &key, position);
                    }
                }
                FieldKind::Flag(get) => {
                    if let Some(a) = found {
                        *get(target) = true;
                        self.bound(&field_path, a);
                    }
                    self.validate(spec, &*get(target), &key, &key, position);
                }
                FieldKind::List(slot) => {
                    let converted = found.map_or(true, |a| {
                        let result = slot.set(target, &a.options);
                        self.settle(result, &field_path, &key, &key, a)
                    });
                    if converted {
                        self.validate(spec, slot.value(target), &key, &key, position);
                    }
                }
                FieldKind::Group(nested) | FieldKind::Inline(nested) => {
                    nested.walk(target, self, &key, &field_path);
                }
                FieldKind::InlineList(nested) => {
                    nested.walk(target, self, &key, &field_path);
                    if let Some(value) = nested.value(target) {
                        self.validate(spec, value, &key, &key, position);
                    }
                }
                // Inline-only sources are rejected before the walk starts
                FieldKind::OptionFlag(_) | FieldKind::Options(_) => {}
            }
        }
    }

    /// Decode the first occurrence of `key` as one inline composite
    pub(crate) fn inline_single<U: Bind>(&mut self, key: &str, path: &str) -> Option<U> {
        let index = self.index;
        let occurrence = index.get(key)?;
        self.consumed.insert(key.to_string());
        self.bound(path, occurrence);

        let mut value = U::default();
        self.inline_fields(&mut value, occurrence, path);
        Some(value)
    }

    /// Decode every occurrence of `key`, in encounter order
    pub(crate) fn inline_list<U: Bind>(&mut self, key: &str, path: &str) -> Vec<U> {
        let index = self.index;
        let occurrences = index.get_all(key);
        if !occurrences.is_empty() {
            self.consumed.insert(key.to_string());
        }

        occurrences
            .into_iter()
            .enumerate()
            .map(|(i, occurrence)| {
                let element_path = format!("{path}[{i}]");
                self.bound(&element_path, occurrence);
                let mut value = U::default();
                self.inline_fields(&mut value, occurrence, &element_path);
                value
            })
            .collect()
    }

    /// Bind the fields of one inline composite from a single occurrence
    fn inline_fields<U: Bind>(
        &mut self,
        target: &mut U,
        occurrence: &PositionedAnnotation,
        path: &str,
    ) {
        let key = occurrence.key.as_str();
        let position = Some(&occurrence.position);

        for field in U::schema().fields() {
            let spec = &field.spec;
            let name = spec.name();
            let subject = format!("{key} {name}");
            let field_path = format!("{path}.{}", spec.ident());

            match &field.kind {
                FieldKind::Scalar(slot) => {
                    let text = match spec.source() {
                        Source::Value if !occurrence.options.is_empty() => {
                            Some(occurrence.value())
                        }
                        Source::Param => occurrence.param(&name),
                        _ => None,
                    };
                    let converted = text.map_or(true, |text| {
                        let result = slot.set(target, text);
                        self.settle(result, &field_path, &subject, key, occurrence)
                    });
                    if converted {
                        self.validate(spec, slot.value(target), &subject, key, position);
                    }
                }
                FieldKind::OptionFlag(get) => {
                    if occurrence.has_option(&name) {
                        *get(target) = true;
                        self.bound(&field_path, occurrence);
                    }
                    self.validate(spec, &*get(target), &subject, key, position);
                }
                FieldKind::Options(get) => {
                    *get(target) = occurrence.options.clone();
                    self.bound(&field_path, occurrence);
                    self.validate(spec, &*get(target), &subject, key, position);
                }
                // Namespaced fields have nothing to read from one occurrence
                FieldKind::Flag(get) => {
                    self.validate(spec, &*get(target), &subject, key, position);
                }
                FieldKind::List(slot) => {
                    self.validate(spec, slot.value(target), &subject, key, position);
                }
                // Rejected before the walk starts
                FieldKind::Group(_) | FieldKind::Inline(_) | FieldKind::InlineList(_) => {}
            }
        }
    }

    fn bound(&mut self, path: &str, source: &PositionedAnnotation) {
        tracing::trace!(path, key = %source.key, "bound field");
        self.trace.record(path, &source.annotation, &source.position);
    }

    /// Record a successful conversion in the trace, or a failure diagnostic
    ///
    /// Returns whether the value was converted; rules are skipped for a
    /// field that already failed conversion.
    fn settle(
        &mut self,
        result: std::result::Result<(), ConversionError>,
        path: &str,
        subject: &str,
        key: &str,
        source: &PositionedAnnotation,
    ) -> bool {
        match result {
            Ok(()) => {
                self.bound(path, source);
                true
            }
            Err(err) => {
                self.diagnostics.push(
                    Diagnostic::failure(format!("{subject}: {err}"))
                        .with_key(key)
                        .with_position(source.position.clone()),
                );
                false
            }
        }
    }

    fn validate(
        &mut self,
        spec: &FieldSpec,
        value: &dyn FieldValue,
        subject: &str,
        key: &str,
        position: Option<&Position>,
    ) {
        for rule_spec in spec.rules() {
            let Some(rule) = self.rules.get(&rule_spec.name) else {
                continue;
            };
            let ctx = RuleContext {
                subject,
                params: &rule_spec.params,
                default: spec.default_literal(),
            };
            if let Err(message) = rule.check(value, &ctx) {
                let mut diagnostic = Diagnostic::failure(message).with_key(key);
                if let Some(position) = position {
                    diagnostic = diagnostic.with_position(position.clone());
                }
                self.diagnostics.push(diagnostic);
            }
        }
    }
}
