//! Annotation comments for code generators
//!
//! Declarations opt into code generation through comment lines such as
//!
//! ```text
//! // @http-method GET
//! // @http-path /users/:id
//! // @http-openapi-header name required title="User name"
//! ```
//!
//! This crate turns such lines into structured [`Annotation`]s and groups the
//! annotations of one declaration into an [`AnnotationIndex`]:
//!
//! ```text
//! comment lines -> classify -> Lexer -> Annotation -> AnnotationIndex
//! ```
//!
//! Decoding an index into typed configuration is done by `mosaic-binder`.

pub mod annotation;
pub mod comments;
pub mod error;
pub mod index;
pub mod lexer;
pub mod position;
pub mod token;

pub use annotation::{parse, Annotation, MARKER};
pub use comments::{classify, CommentKind, CommentLine, DocComments};
pub use error::{Error, Result};
pub use index::{AnnotationIndex, PositionedAnnotation, RejectedLine};
pub use position::Position;
