//! Schema (DTD) validation against the bundled per-version grammar tables.
//!
//! The grammars are code-resident: the element vocabulary at each version
//! plus required-child rules. The full DTD text is an external data
//! collaborator and is not embedded here.

use fcpx_document::{SchemaVersion, XmlDocument};
use tracing::debug;

use crate::report::{ErrorKind, ValidationError, ValidationReport, ValidationResult};
use crate::reference::validate_references;

/// Elements present in every supported schema version.
const BASE_VOCABULARY: &[&str] = &[
    "fcpxml",
    "resources",
    "format",
    "asset",
    "media-rep",
    "effect",
    "media",
    "multicam",
    "mc-angle",
    "library",
    "event",
    "project",
    "sequence",
    "spine",
    "asset-clip",
    "clip",
    "video",
    "audio",
    "gap",
    "transition",
    "title",
    "ref-clip",
    "sync-clip",
    "sync-source",
    "mc-clip",
    "audition",
    "marker",
    "chapter-marker",
    "keyword",
    "rating",
    "analysis-marker",
    "metadata",
    "md",
    "array",
    "string",
    "note",
    "bookmark",
    "text",
    "text-style",
    "text-style-def",
    "param",
    "crop-rect",
    "trim-rect",
    "pan",
    "filter-video",
    "filter-audio",
    "adjust-crop",
    "adjust-corners",
    "adjust-conform",
    "adjust-transform",
    "adjust-blend",
    "adjust-stabilization",
    "adjust-rollingShutter",
    "adjust-360-transform",
    "adjust-volume",
    "adjust-panner",
    "adjust-loudness",
    "adjust-noiseReduction",
    "adjust-humReduction",
    "adjust-EQ",
    "adjust-matchEQ",
    "audio-channel-source",
    "audio-role-source",
    "keyword-collection",
    "smart-collection",
    "collection-folder",
    "match-clip",
    "match-media",
    "match-time",
    "match-text",
    "match-ratings",
    "match-keywords",
    "match-property",
];

/// Children an element must have, in every version that has the element.
fn required_children(element: &str) -> &'static [&'static str] {
    match element {
        "fcpxml" => &["resources"],
        "sequence" => &["spine"],
        _ => &[],
    }
}

fn is_known(element: &str) -> bool {
    BASE_VOCABULARY.contains(&element) || SchemaVersion::element_introduced(element).is_some()
}

/// Validate a document against the grammar for a specific version.
pub fn validate_schema(doc: &XmlDocument, version: SchemaVersion) -> ValidationResult {
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
            .with_context("found", doc.node(root).name.clone()),
        );
    }

    for id in doc.descendants(root) {
        let name = doc.node(id).name.as_str();

        if !is_known(name) {
            result.errors.push(
                ValidationError::new(
                    ErrorKind::UnknownElement,
                    format!("`{name}` is not an FCPXML element"),
                )
                .with_context("element", name),
            );
            continue;
        }

        if !version.supports_element(name) {
            // element_introduced is Some for every gated element.
            let introduced = SchemaVersion::element_introduced(name)
                .map(|v| v.as_str())
                .unwrap_or("?");
            result.errors.push(
                ValidationError::new(
                    ErrorKind::ElementNotAllowedInVersion,
                    format!("`{name}` requires FCPXML {introduced}, document is {version}"),
                )
                .with_context("element", name)
                .with_context("introduced", introduced)
                .with_context("version", version.as_str()),
            );
        }

        for required in required_children(name) {
            if doc.find_child(id, required).is_none() {
                result.errors.push(
                    ValidationError::new(
                        ErrorKind::MissingRequiredChild,
                        format!("`{name}` is missing required child `{required}`"),
                    )
                    .with_context("element", name)
                    .with_context("required", *required),
                );
            }
        }
    }

    debug!(
        version = version.as_str(),
        errors = result.errors.len(),
        "schema validation finished"
    );
    result
}

/// Validate against the version the document itself declares.
///
/// An absent `version` attribute and an unparsable one are distinct error
/// kinds, both different from a grammar mismatch.
pub fn validate_declared(doc: &XmlDocument) -> ValidationResult {
    let Some(root) = doc.root() else {
        let mut result = ValidationResult::default();
        result.errors.push(
            ValidationError::new(ErrorKind::MissingRequiredElement, "document has no root element")
                .with_context("expected", "fcpxml"),
        );
        return result;
    };

    match doc.attribute(root, "version") {
        None => {
            let mut result = ValidationResult::default();
            result.errors.push(ValidationError::new(
                ErrorKind::MissingVersionAttribute,
                "root element has no `version` attribute",
            ));
            result
        }
        Some(raw) => match raw.parse::<SchemaVersion>() {
            Ok(version) => validate_schema(doc, version),
            Err(_) => {
                let mut result = ValidationResult::default();
                result.errors.push(
                    ValidationError::new(
                        ErrorKind::UnsupportedVersion,
                        format!("declared version `{raw}` is not supported"),
                    )
                    .with_context("version", raw),
                );
                result
            }
        },
    }
}

/// Run both passes and combine them into one report.
pub fn validate_document(doc: &XmlDocument) -> ValidationReport {
    ValidationReport {
        semantic: validate_references(doc),
        schema: validate_declared(doc),
    }
}
