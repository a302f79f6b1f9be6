//! FCPX Validate - Semantic and schema validation for FCPXML
//!
//! Two read-only passes over the document tree:
//! - Reference-graph validation: every `ref` must resolve to an `id`
//!   somewhere in the same tree.
//! - Schema validation: the element vocabulary and required-child rules of
//!   one of the ten supported schema versions (1.5 through 1.14).
//!
//! A document is valid only when both passes report zero errors.

pub mod reference;
pub mod report;
pub mod schema;

pub use reference::validate_references;
pub use report::{
    ErrorKind, ValidationError, ValidationReport, ValidationResult, ValidationWarning, WarningKind,
};
pub use schema::{validate_declared, validate_document, validate_schema};
