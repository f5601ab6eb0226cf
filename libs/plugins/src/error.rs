//! Error types for plugin loading

use mosaic_binder::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown plugin: {0}")]
    UnknownPlugin(String),

    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
