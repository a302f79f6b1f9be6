//! Semantic reference-graph validation.
//!
//! One depth-first pass over the tree collects every `id` and every `ref`;
//! a `ref` with no matching `id` anywhere in the same tree is a dangling
//! reference. Ids are not restricted to the `resources` container — nested
//! `text-style-def` ids resolve too.

use std::collections::HashSet;

use fcpx_core::RationalTime;
use fcpx_document::XmlDocument;
use tracing::debug;

use crate::report::{
    ErrorKind, ValidationError, ValidationResult, ValidationWarning, WarningKind,
};

/// Attributes holding rational time values worth a negative-value check.
const TIME_ATTRIBUTES: [&str; 3] = ["duration", "offset", "start"];

/// Validate the reference graph and structural skeleton of a document.
pub fn validate_references(doc: &XmlDocument) -> ValidationResult {
    let mut result = ValidationResult::default();

    let Some(root) = doc.root() else {
        result.errors.push(
            ValidationError::new(ErrorKind::MissingRequiredElement, "document has no root element")
                .with_context("expected", "fcpxml"),
        );
        return result;
    };

    if doc.node(root).name != "fcpxml" {
        result.errors.push(
            ValidationError::new(
                ErrorKind::MissingRequiredElement,
                format!("root element is `{}`, expected `fcpxml`", doc.node(root).name),
            )
            .with_context("expected", "fcpxml")
            .with_context("found", doc.node(root).name.clone()),
        );
    }

    if doc.find_child(root, "resources").is_none() {
        result.errors.push(
            ValidationError::new(
                ErrorKind::MissingRequiredElement,
                "missing top-level `resources` element",
            )
            .with_context("expected", "resources"),
        );
    }

    let mut ids: HashSet<&str> = HashSet::new();
    let mut refs: Vec<(&str, &str)> = Vec::new(); // (ref value, element name)

    for id in doc.descendants(root) {
        let node = doc.node(id);
        if let Some(value) = node.attribute("id") {
            ids.insert(value);
        }
        if let Some(value) = node.attribute("ref") {
            refs.push((value, node.name.as_str()));
        }
        for attr in TIME_ATTRIBUTES {
            if let Some(raw) = node.attribute(attr) {
                if RationalTime::from_fcpxml(raw).is_negative() {
                    result.warnings.push(
                        ValidationWarning::new(
                            WarningKind::NegativeTimeAttribute,
                            format!("negative `{attr}` on `{}`", node.name),
                        )
                        .with_context("attribute", attr)
                        .with_context("value", raw)
                        .with_context("element", node.name.clone()),
                    );
                }
            }
        }
    }

    for (reference, element) in refs {
        if !ids.contains(reference) {
            result.errors.push(
                ValidationError::new(
                    ErrorKind::MissingAssetReference,
                    format!("`{element}` references missing id `{reference}`"),
                )
                .with_context("ref", reference)
                .with_context("element", element),
            );
        }
    }

    debug!(
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        ids = ids.len(),
        "reference validation finished"
    );
    result
}
