//! Validation result types.
//!
//! Errors invalidate a document; warnings do not. Both carry a free-form
//! context map so presentation layers can render the offending ids,
//! attributes, and element names without re-walking the tree.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// What went wrong, at the level exporters and UIs branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A `ref` attribute that resolves to no `id` anywhere in the tree.
    MissingAssetReference,
    /// Missing root element or missing top-level `resources` container.
    MissingRequiredElement,
    /// The root carries no `version` attribute.
    MissingVersionAttribute,
    /// The declared version is not one of the supported schemas.
    UnsupportedVersion,
    /// An element outside the FCPXML vocabulary entirely.
    UnknownElement,
    /// A known element used below the schema version that introduced it.
    ElementNotAllowedInVersion,
    /// A required child element is absent.
    MissingRequiredChild,
}

/// Non-fatal findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningKind {
    /// A `duration`/`offset`/`start` attribute with a negative value.
    NegativeTimeAttribute,
}

/// A single validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub message: String,
    pub context: HashMap<String, String>,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: HashMap::new(),
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// A single validation warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub kind: WarningKind,
    pub message: String,
    pub context: HashMap<String, String>,
}

impl ValidationWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: HashMap::new(),
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Outcome of one validation pass. Always freshly computed, never cached
/// across tree mutations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Valid when this pass found no errors; warnings do not invalidate.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Combined semantic + schema report. The document is valid only when both
/// passes report zero errors; each pass stays separately inspectable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub semantic: ValidationResult,
    pub schema: ValidationResult,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.semantic.is_valid() && self.schema.is_valid()
    }
}
