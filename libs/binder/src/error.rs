//! Error types for schema decoding
//!
//! [`ConversionError`] is data-dependent and ends up as a diagnostic on the
//! field it concerns. [`SchemaError`] is a usage error in a schema table and
//! aborts the whole decode call.

use thiserror::Error;

/// A textual value could not be parsed into a field's scalar kind
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot parse {value:?} as {kind}: {reason}")]
pub struct ConversionError {
    pub value: String,
    pub kind: &'static str,
    pub reason: String,
}

impl ConversionError {
    pub fn new(value: &str, kind: &'static str, reason: impl ToString) -> Self {
        Self {
            value: value.to_string(),
            kind,
            reason: reason.to_string(),
        }
    }
}

/// A destination schema cannot be used for decoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("annotation prefix must not be empty")]
    EmptyPrefix,

    #[error("{schema}.{field}: unknown validation rule `{rule}`")]
    UnknownRule {
        schema: &'static str,
        field: &'static str,
        rule: String,
    },

    #[error("{schema}.{field}: validation rules are not supported on this field kind")]
    RuleOnComposite {
        schema: &'static str,
        field: &'static str,
    },

    #[error("{schema}: annotation name `{name}` is bound by more than one field")]
    DuplicateName { schema: &'static str, name: String },

    #[error("{schema}.{field}: `{policy}` extraction is only valid inside an inline composite")]
    InlineOnly {
        schema: &'static str,
        field: &'static str,
        policy: &'static str,
    },

    #[error("{schema}.{field}: nested composites cannot appear inside an inline composite")]
    NestedInline {
        schema: &'static str,
        field: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
