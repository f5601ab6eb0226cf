//! Declarative schema tables
//!
//! A configuration type describes its fields once, through [`SchemaBuilder`],
//! and the decoder interprets that table. Each entry pairs a [`FieldSpec`]
//! (annotation name, extraction source, rules, default) with an accessor
//! returning a mutable reference to the field.
//!
//! ```
//! use std::sync::OnceLock;
//! use mosaic_binder::{field, Bind, Schema};
//!
//! #[derive(Default)]
//! struct Route {
//!     path: String,
//!     deprecated: bool,
//! }
//!
//! impl Bind for Route {
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: OnceLock<Schema<Route>> = OnceLock::new();
//!         SCHEMA.get_or_init(|| {
//!             Schema::<Self>::builder("Route")
//!                 .scalar(field("path").required(), |r| &mut r.path)
//!                 .flag(field("deprecated"), |r| &mut r.deprecated)
//!                 .build()
//!         })
//!     }
//! }
//! ```

use std::collections::HashSet;
use std::fmt;

use crate::decoder::Walk;
use crate::error::{ConversionError, Result, SchemaError};
use crate::rules::{RuleRegistry, RuleSpec, IN_PARAMS};
use crate::strcase;
use crate::value::{parse_list, FieldValue, Scalar};

/// Where a field takes its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The first annotation under the field's namespaced key
    Key,
    /// First option of the enclosing inline occurrence
    Value,
    /// Named parameter of the enclosing inline occurrence
    Param,
    /// Presence of the field name among the occurrence's options
    Option,
    /// All options of the occurrence
    Options,
}

impl Source {
    fn policy(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Value => "fromValue",
            Self::Param => "fromParam",
            Self::Option => "fromOption",
            Self::Options => "fromOptions",
        }
    }

    fn is_inline_only(self) -> bool {
        self != Self::Key
    }
}

/// Per-field metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    ident: &'static str,
    name: Option<String>,
    source: Source,
    rules: Vec<RuleSpec>,
    default: Option<String>,
}

/// Start a field description from its identifier
///
/// The annotation name defaults to the identifier in kebab case.
pub fn field(ident: &'static str) -> FieldSpec {
    FieldSpec {
        ident,
        name: None,
        source: Source::Key,
        rules: Vec::new(),
        default: None,
    }
}

impl FieldSpec {
    /// Explicit annotation name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Read the occurrence's first option (scalar fields of inline composites)
    pub fn from_value(mut self) -> Self {
        self.source = Source::Value;
        self
    }

    /// Read the occurrence's parameter named after the field (scalar fields
    /// of inline composites)
    pub fn from_param(mut self) -> Self {
        self.source = Source::Param;
        self
    }

    pub fn required(self) -> Self {
        self.rule(RuleSpec::new("required"))
    }

    /// Restrict the value to a fixed set of literals
    pub fn one_of<I, S>(self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = allowed
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.rule(RuleSpec::new("in").with_param(IN_PARAMS, joined))
    }

    pub fn rule(mut self, rule: RuleSpec) -> Self {
        self.rules.push(rule);
        self
    }

    /// Default literal substituted when an `in` rule checks an unset value
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn ident(&self) -> &'static str {
        self.ident
    }

    /// Annotation name: the override if any, else the kebab-cased identifier
    pub fn name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => strcase::to_kebab(self.ident),
        }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn rules(&self) -> &[RuleSpec] {
        &self.rules
    }

    pub fn default_literal(&self) -> Option<&str> {
        self.default.as_deref()
    }

    fn with_source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }
}

pub(crate) trait ScalarSlot<T>: Send + Sync {
    fn set(&self, target: &mut T, text: &str) -> std::result::Result<(), ConversionError>;
    fn value<'a>(&self, target: &'a mut T) -> &'a dyn FieldValue;
}

pub(crate) trait ListSlot<T>: Send + Sync {
    fn set(&self, target: &mut T, options: &[String])
        -> std::result::Result<(), ConversionError>;
    fn value<'a>(&self, target: &'a mut T) -> &'a dyn FieldValue;
}

/// A composite field whose type has its own schema
pub(crate) trait Nested<T>: Send + Sync {
    fn verify(&self, rules: &RuleRegistry) -> Result<()>;
    fn walk(&self, target: &mut T, walk: &mut Walk<'_>, key: &str, path: &str);
    /// Value view for rule checks; only repeated composites have one
    fn value<'a>(&self, target: &'a mut T) -> Option<&'a dyn FieldValue>;
}

struct ScalarAccess<T, V> {
    get: fn(&mut T) -> &mut V,
}

impl<T: 'static, V: Scalar> ScalarSlot<T> for ScalarAccess<T, V> {
    fn set(&self, target: &mut T, text: &str) -> std::result::Result<(), ConversionError> {
        *(self.get)(target) = V::parse_scalar(text)?;
        Ok(())
    }

    fn value<'a>(&self, target: &'a mut T) -> &'a dyn FieldValue {
        (self.get)(target)
    }
}

struct ListAccess<T, V> {
    get: fn(&mut T) -> &mut Vec<V>,
}

impl<T: 'static, V: Scalar> ListSlot<T> for ListAccess<T, V> {
    fn set(
        &self,
        target: &mut T,
        options: &[String],
    ) -> std::result::Result<(), ConversionError> {
        *(self.get)(target) = parse_list(options)?;
        Ok(())
    }

    fn value<'a>(&self, target: &'a mut T) -> &'a dyn FieldValue {
        (self.get)(target)
    }
}

struct GroupAccess<T, U> {
    get: fn(&mut T) -> &mut U,
}

impl<T: 'static, U: Bind> Nested<T> for GroupAccess<T, U> {
    fn verify(&self, rules: &RuleRegistry) -> Result<()> {
        U::schema().verify(rules, Mode::Namespaced)
    }

    fn walk(&self, target: &mut T, walk: &mut Walk<'_>, key: &str, path: &str) {
        walk.namespaced((self.get)(target), key, path);
    }

    fn value<'a>(&self, _target: &'a mut T) -> Option<&'a dyn FieldValue> {
        None
    }
}

struct InlineAccess<T, U> {
    get: fn(&mut T) -> &mut U,
}

impl<T: 'static, U: Bind> Nested<T> for InlineAccess<T, U> {
    fn verify(&self, rules: &RuleRegistry) -> Result<()> {
        U::schema().verify(rules, Mode::Inline)
    }

    fn walk(&self, target: &mut T, walk: &mut Walk<'_>, key: &str, path: &str) {
        if let Some(value) = walk.inline_single::<U>(key, path) {
            *(self.get)(target) = value;
        }
    }

    fn value<'a>(&self, _target: &'a mut T) -> Option<&'a dyn FieldValue> {
        None
    }
}

struct InlineListAccess<T, U> {
    get: fn(&mut T) -> &mut Vec<U>,
}

impl<T: 'static, U: Bind> Nested<T> for InlineListAccess<T, U> {
    fn verify(&self, rules: &RuleRegistry) -> Result<()> {
        U::schema().verify(rules, Mode::Inline)
    }

    fn walk(&self, target: &mut T, walk: &mut Walk<'_>, key: &str, path: &str) {
        let list = walk.inline_list::<U>(key, path);
        if !list.is_empty() {
            *(self.get)(target) = list;
        }
    }

    fn value<'a>(&self, target: &'a mut T) -> Option<&'a dyn FieldValue> {
        let list: &'a dyn FieldValue = (self.get)(target);
        Some(list)
    }
}

pub(crate) enum FieldKind<T> {
    Scalar(Box<dyn ScalarSlot<T>>),
    Flag(fn(&mut T) -> &mut bool),
    List(Box<dyn ListSlot<T>>),
    OptionFlag(fn(&mut T) -> &mut bool),
    Options(fn(&mut T) -> &mut Vec<String>),
    Group(Box<dyn Nested<T>>),
    Inline(Box<dyn Nested<T>>),
    InlineList(Box<dyn Nested<T>>),
}

impl<T> FieldKind<T> {
    fn label(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Flag(_) => "flag",
            Self::List(_) => "list",
            Self::OptionFlag(_) => "option flag",
            Self::Options(_) => "options",
            Self::Group(_) => "group",
            Self::Inline(_) => "inline",
            Self::InlineList(_) => "inline list",
        }
    }
}

pub struct Field<T> {
    pub(crate) spec: FieldSpec,
    pub(crate) kind: FieldKind<T>,
}

impl<T> Field<T> {
    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    /// Short description of how the field is bound (`scalar`, `group`, ...)
    pub fn kind(&self) -> &'static str {
        self.kind.label()
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("spec", &self.spec)
            .field("kind", &self.kind.label())
            .finish()
    }
}

/// How a schema is being read: under a key namespace, or from one
/// annotation occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Namespaced,
    Inline,
}

/// Field table of one configuration type
pub struct Schema<T> {
    name: &'static str,
    fields: Vec<Field<T>>,
}

impl<T: 'static> Schema<T> {
    pub fn builder(name: &'static str) -> SchemaBuilder<T> {
        SchemaBuilder {
            schema: Schema {
                name,
                fields: Vec::new(),
            },
        }
    }

    /// Root segment of trace paths and schema error messages
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> std::slice::Iter<'_, Field<T>> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check the table, and every nested table, for usage errors
    pub(crate) fn verify(&self, rules: &RuleRegistry, mode: Mode) -> Result<()> {
        let mut seen = HashSet::new();

        for field in &self.fields {
            let spec = &field.spec;

            if !seen.insert(spec.name()) {
                return Err(SchemaError::DuplicateName {
                    schema: self.name,
                    name: spec.name(),
                });
            }

            if let Some(unknown) = spec.rules.iter().find(|r| !rules.contains(&r.name)) {
                return Err(SchemaError::UnknownRule {
                    schema: self.name,
                    field: spec.ident,
                    rule: unknown.name.clone(),
                });
            }

            match &field.kind {
                FieldKind::Group(_) | FieldKind::Inline(_) | FieldKind::InlineList(_)
                    if mode == Mode::Inline =>
                {
                    return Err(SchemaError::NestedInline {
                        schema: self.name,
                        field: spec.ident,
                    });
                }
                FieldKind::Group(_) | FieldKind::Inline(_) if !spec.rules.is_empty() => {
                    return Err(SchemaError::RuleOnComposite {
                        schema: self.name,
                        field: spec.ident,
                    });
                }
                FieldKind::Group(nested)
                | FieldKind::Inline(nested)
                | FieldKind::InlineList(nested) => nested.verify(rules)?,
                _ if mode == Mode::Namespaced && spec.source.is_inline_only() => {
                    return Err(SchemaError::InlineOnly {
                        schema: self.name,
                        field: spec.ident,
                        policy: spec.source.policy(),
                    });
                }
                _ => {}
            }
        }

        Ok(())
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Builds a [`Schema`] one field at a time, in declaration order
pub struct SchemaBuilder<T> {
    schema: Schema<T>,
}

impl<T: 'static> SchemaBuilder<T> {
    fn push(mut self, spec: FieldSpec, kind: FieldKind<T>) -> Self {
        self.schema.fields.push(Field { spec, kind });
        self
    }

    /// A single value decoded from the annotation's first option, or from
    /// the occurrence's value or parameter when the spec says so
    pub fn scalar<V: Scalar>(self, spec: FieldSpec, get: fn(&mut T) -> &mut V) -> Self {
        self.push(spec, FieldKind::Scalar(Box::new(ScalarAccess { get })))
    }

    /// `true` when the key is present, whatever its options
    pub fn flag(self, spec: FieldSpec, get: fn(&mut T) -> &mut bool) -> Self {
        self.push(spec.with_source(Source::Key), FieldKind::Flag(get))
    }

    /// Every option of the annotation parsed as one element
    pub fn list<V: Scalar>(self, spec: FieldSpec, get: fn(&mut T) -> &mut Vec<V>) -> Self {
        self.push(
            spec.with_source(Source::Key),
            FieldKind::List(Box::new(ListAccess { get })),
        )
    }

    /// Inside an inline composite: `true` when the field name is one of the
    /// occurrence's options
    pub fn option_flag(self, spec: FieldSpec, get: fn(&mut T) -> &mut bool) -> Self {
        self.push(spec.with_source(Source::Option), FieldKind::OptionFlag(get))
    }

    /// Inside an inline composite: the occurrence's options as written
    pub fn options(self, spec: FieldSpec, get: fn(&mut T) -> &mut Vec<String>) -> Self {
        self.push(spec.with_source(Source::Options), FieldKind::Options(get))
    }

    /// Nested type read from keys under this field's key
    pub fn group<U: Bind>(self, spec: FieldSpec, get: fn(&mut T) -> &mut U) -> Self {
        self.push(
            spec.with_source(Source::Key),
            FieldKind::Group(Box::new(GroupAccess { get })),
        )
    }

    /// Nested type read from the first occurrence of this field's key
    pub fn inline<U: Bind>(self, spec: FieldSpec, get: fn(&mut T) -> &mut U) -> Self {
        self.push(
            spec.with_source(Source::Key),
            FieldKind::Inline(Box::new(InlineAccess { get })),
        )
    }

    /// One element per occurrence of this field's key, in encounter order
    pub fn inline_list<U: Bind>(self, spec: FieldSpec, get: fn(&mut T) -> &mut Vec<U>) -> Self {
        self.push(
            spec.with_source(Source::Key),
            FieldKind::InlineList(Box::new(InlineListAccess { get })),
        )
    }

    pub fn build(self) -> Schema<T> {
        self.schema
    }
}

/// A configuration type with a schema table
pub trait Bind: Default + Send + Sync + 'static {
    fn schema() -> &'static Schema<Self>;
}
