//! HTTP server and client generator configuration

mod loader;
pub mod options;

use mosaic_binder::{strcase, RuleRegistry};
use serde::Serialize;

use crate::error::Result;
use crate::model::Module;
use crate::plugin::{Collector, LoadReport, Loaded, Plugin};

pub use options::{
    DefaultOpt, InterfaceOptions, MethodOptions, NameOpt, OpenapiOpt, ParamOptions, QueryOpt,
    QueryValue, ResultOptions, SingleOpt, UseOpt, WrapOpt,
};

pub const PREFIX: &str = "http";

/// `form-max-memory` when none is given: 32 MiB
pub const DEFAULT_FORM_MAX_MEMORY: i64 = 32 << 20;

pub const BODY: &str = "body";
pub const QUERY: &str = "query";
pub const HEADER: &str = "header";
pub const COOKIE: &str = "cookie";
pub const PATH: &str = "path";

/// Wire name of a parameter or result
///
/// An explicit name wins; otherwise the declared name is converted with
/// `format`, falling back to lowerCamel for an empty or unknown format.
pub fn format_name(explicit: &str, declared: &str, format: &str) -> String {
    if !explicit.is_empty() {
        return explicit.to_string();
    }
    match format {
        "kebab" => strcase::to_kebab(declared),
        "screamingKebab" => strcase::to_screaming_kebab(declared),
        "snake" => strcase::to_snake(declared),
        "screamingSnake" => strcase::to_screaming_snake(declared),
        _ => strcase::to_lower_camel(declared),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParamConfig {
    pub var: String,
    pub type_name: String,
    /// Wire name
    pub name: String,
    pub options: ParamOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_param_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_param_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultConfig {
    pub var: String,
    pub type_name: String,
    pub name: String,
    pub options: ResultOptions,
}

/// A method with its options resolved and its variables grouped by how they
/// travel over HTTP; groups hold variable names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MethodConfig {
    pub name: String,
    pub options: MethodOptions,
    pub context: Option<String>,
    pub error: Option<String>,
    pub params: Vec<ParamConfig>,
    pub results: Vec<ResultConfig>,
    pub body_params: Vec<String>,
    pub query_params: Vec<String>,
    pub header_params: Vec<String>,
    pub cookie_params: Vec<String>,
    pub path_params: Vec<String>,
    pub body_results: Vec<String>,
    pub header_results: Vec<String>,
    pub cookie_results: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceConfig {
    pub name: String,
    pub options: InterfaceOptions,
    pub methods: Vec<MethodConfig>,
}

/// Loader for `@http-*` annotations
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpPlugin;

impl HttpPlugin {
    /// Typed configuration of every interface in `module`
    pub fn load_interfaces(
        &self,
        module: &Module,
        rules: &RuleRegistry,
    ) -> Result<Loaded<Vec<InterfaceConfig>>> {
        let mut collector = Collector::new(self, rules);
        let interfaces = loader::load(&mut collector, &module.interfaces)?;
        Ok(collector.finish(interfaces))
    }
}

impl Plugin for HttpPlugin {
    fn name(&self) -> &'static str {
        "http"
    }

    fn prefix(&self) -> &'static str {
        PREFIX
    }

    fn load(&self, module: &Module, rules: &RuleRegistry) -> Result<LoadReport> {
        self.load_interfaces(module, rules)?.into_report()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_name() {
        assert_eq!(format_name("id", "UserID", "snake"), "id");
        assert_eq!(format_name("", "UserID", ""), "userId");
        assert_eq!(format_name("", "UserID", "unknown"), "userId");
        assert_eq!(format_name("", "UserID", "kebab"), "user-id");
        assert_eq!(format_name("", "UserID", "screamingKebab"), "USER-ID");
        assert_eq!(format_name("", "userID", "snake"), "user_id");
        assert_eq!(format_name("", "userID", "screamingSnake"), "USER_ID");
    }
}
