//! Schema-directed binding of annotations into typed configuration
//!
//! Configuration types declare a [`Schema`] table through [`Bind`]; a
//! [`Decoder`] walks that table against an
//! [`AnnotationIndex`](mosaic_annotation::AnnotationIndex), converting
//! values, checking rules from a [`RuleRegistry`] and collecting
//! [`Diagnostics`] instead of stopping at the first problem.
//!
//! ```
//! use std::sync::OnceLock;
//! use mosaic_annotation::{AnnotationIndex, Position};
//! use mosaic_binder::{field, Bind, Decoder, RuleRegistry, Schema};
//!
//! #[derive(Default)]
//! struct Route {
//!     method: String,
//!     tags: Vec<String>,
//! }
//!
//! impl Bind for Route {
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: OnceLock<Schema<Route>> = OnceLock::new();
//!         SCHEMA.get_or_init(|| {
//!             Schema::<Self>::builder("Route")
//!                 .scalar(field("method").one_of(["GET", "POST"]), |r| &mut r.method)
//!                 .list(field("tags"), |r| &mut r.tags)
//!                 .build()
//!         })
//!     }
//! }
//!
//! let (index, _) = AnnotationIndex::from_lines(vec![
//!     ("@http-method GET", Position::unknown()),
//!     ("@http-tags users admin", Position::unknown()),
//! ]);
//! let rules = RuleRegistry::default();
//! let decoded = Decoder::new(&rules).decode::<Route>("http", &index).unwrap();
//! assert_eq!(decoded.value.method, "GET");
//! assert_eq!(decoded.value.tags, vec!["users", "admin"]);
//! assert!(decoded.diagnostics.is_empty());
//! ```

pub mod decoder;
pub mod diagnostics;
pub mod error;
pub mod rules;
pub mod schema;
pub mod strcase;
pub mod trace;
pub mod value;

pub use decoder::{Decoded, Decoder, Report};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{ConversionError, Result, SchemaError};
pub use rules::{OneOf, Required, Rule, RuleContext, RuleRegistry, RuleSpec};
pub use schema::{field, Bind, Field, FieldSpec, Schema, SchemaBuilder, Source};
pub use trace::{FieldTrace, TraceEntry};
pub use value::{FieldValue, Scalar};
