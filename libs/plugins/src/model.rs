//! Source model consumed by the plugins
//!
//! A module lists interfaces, their methods and each method's parameters and
//! results, with the raw comment lines written above every declaration. It
//! is produced by an external extractor and read here as JSON.

use std::path::Path;

use mosaic_annotation::{classify, CommentLine, DocComments, Position};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A raw comment line as written in source, comment markers included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawComment {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Var {
    pub name: String,
    #[serde(default)]
    pub type_name: String,
    #[serde(default)]
    pub is_context: bool,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub comments: Vec<RawComment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub comments: Vec<RawComment>,
    #[serde(default)]
    pub params: Vec<Var>,
    #[serde(default)]
    pub results: Vec<Var>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub comments: Vec<RawComment>,
    #[serde(default)]
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    #[serde(default)]
    pub interfaces: Vec<Interface>,
}

impl Module {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Classify the comments of a declaration and index its annotations
pub fn doc_comments(decl_name: &str, comments: &[RawComment]) -> DocComments {
    let lines: Vec<CommentLine> = comments
        .iter()
        .map(|c| classify(&c.text, decl_name, c.position.clone().unwrap_or_default()))
        .collect();
    DocComments::collect(&lines)
}
