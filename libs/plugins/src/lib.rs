//! Annotation loaders for the generator backends
//!
//! Each plugin reads the annotations under its own prefix from a source
//! [`Module`], decodes them into typed options with the binder, and applies
//! the post-processing its code emitters rely on.

pub mod error;
pub mod http;
pub mod metrics;
pub mod model;
pub mod plugin;

pub use error::{Error, Result};
pub use http::HttpPlugin;
pub use metrics::MetricsPlugin;
pub use model::{doc_comments, Interface, Method, Module, RawComment, Var};
pub use plugin::{LoadReport, Loaded, Plugin, PluginRegistry};
