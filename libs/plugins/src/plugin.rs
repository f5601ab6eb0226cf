//! Plugin trait and the explicit plugin registry

use mosaic_annotation::{Position, PositionedAnnotation};
use mosaic_binder::{Bind, Decoded, Decoder, Diagnostic, Diagnostics, FieldTrace, RuleRegistry};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::http::HttpPlugin;
use crate::metrics::MetricsPlugin;
use crate::model::{doc_comments, Module, RawComment};

/// Configuration decoded by one plugin run, with what the run observed
#[derive(Debug, Clone, Default)]
pub struct Loaded<C> {
    pub config: C,
    pub diagnostics: Diagnostics,
    pub trace: FieldTrace,
}

impl<C> Loaded<C> {
    pub fn has_failures(&self) -> bool {
        self.diagnostics.has_failures()
    }
}

impl<C: Serialize> Loaded<C> {
    /// Erase the configuration type for the code emitters
    pub fn into_report(self) -> Result<LoadReport> {
        Ok(Loaded {
            config: serde_json::to_value(&self.config)?,
            diagnostics: self.diagnostics,
            trace: self.trace,
        })
    }
}

/// Plugin output as handed to the code emitters
pub type LoadReport = Loaded<serde_json::Value>;

/// A generator backend's annotation loader
pub trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;

    /// Namespace of the annotation keys the plugin reads
    fn prefix(&self) -> &'static str;

    /// Decode and validate the plugin's configuration from a module
    ///
    /// Data problems are reported as diagnostics; `Err` means the plugin
    /// itself is misconfigured.
    fn load(&self, module: &Module, rules: &RuleRegistry) -> Result<LoadReport>;
}

/// Plugins available to one run, looked up by name
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `http` and `metrics-middleware`
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(HttpPlugin);
        registry.register(MetricsPlugin);
        registry
    }

    /// Add a plugin; a plugin with the same name is replaced
    pub fn register(&mut self, plugin: impl Plugin + 'static) {
        self.plugins.retain(|p| p.name() != plugin.name());
        self.plugins.push(Box::new(plugin));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Plugin> {
        self.plugins
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
            .ok_or_else(|| Error::UnknownPlugin(name.to_string()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Plugin> {
        self.plugins.iter().map(|p| p.as_ref())
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.names())
            .finish()
    }
}

/// Per-run accumulator shared by the loaders
///
/// Decodes one declaration at a time and gathers every diagnostic and trace
/// entry of the run.
pub(crate) struct Collector<'r> {
    decoder: Decoder<'r>,
    plugin: &'static str,
    prefix: &'static str,
    diagnostics: Diagnostics,
    trace: FieldTrace,
}

impl<'r> Collector<'r> {
    pub(crate) fn new(plugin: &dyn Plugin, rules: &'r RuleRegistry) -> Self {
        Self {
            decoder: Decoder::new(rules),
            plugin: plugin.name(),
            prefix: plugin.prefix(),
            diagnostics: Diagnostics::new(),
            trace: FieldTrace::new(),
        }
    }

    /// Decode the options of one declaration
    ///
    /// Trace paths are recorded under `path`. Annotations under the plugin
    /// prefix that no field reads are reported as warnings.
    pub(crate) fn decode<T: Bind>(
        &mut self,
        path: &str,
        decl_name: &str,
        comments: &[RawComment],
    ) -> Result<T> {
        let doc = doc_comments(decl_name, comments);
        let decoded = self.decoder.decode::<T>(self.prefix, &doc.index)?;

        let mut unused = Diagnostics::new();
        for a in decoded.unused(self.prefix, &doc.index) {
            unused.push(self.unused_warning(a));
        }

        let Decoded {
            value,
            diagnostics,
            trace,
            ..
        } = decoded;
        self.diagnostics.extend(diagnostics);
        self.diagnostics.extend(unused);
        self.trace.merge_under(path, trace);
        Ok(value)
    }

    /// Check a declaration the plugin reads no options from
    pub(crate) fn scan(&mut self, decl_name: &str, comments: &[RawComment]) {
        let doc = doc_comments(decl_name, comments);
        for a in doc.index.with_prefix(self.prefix) {
            let warning = self.unused_warning(a);
            self.diagnostics.push(warning);
        }
    }

    pub(crate) fn fail(&mut self, message: String, position: Option<&Position>) {
        let mut diagnostic = Diagnostic::failure(message);
        if let Some(position) = position {
            diagnostic = diagnostic.with_position(position.clone());
        }
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn finish<C>(self, config: C) -> Loaded<C> {
        tracing::debug!(
            plugin = self.plugin,
            failures = self.diagnostics.failure_count(),
            warnings = self.diagnostics.warning_count(),
            "plugin loaded"
        );
        Loaded {
            config,
            diagnostics: self.diagnostics,
            trace: self.trace,
        }
    }

    fn unused_warning(&self, a: &PositionedAnnotation) -> Diagnostic {
        Diagnostic::warning(format!(
            "{}: annotation is not used by the {} plugin",
            a.key, self.plugin
        ))
        .with_key(a.key.clone())
        .with_position(a.position.clone())
    }
}
