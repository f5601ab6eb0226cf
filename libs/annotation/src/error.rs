//! Error types for annotation parsing

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Grammar errors raised while tokenizing a single annotation line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("annotation is empty")]
    Empty,

    #[error("annotation marker '@' not found: {0}")]
    MissingMarker(String),
}
