//! FCPX Convert - Cross-version structural conversion
//!
//! Rewrites a document tree to a target schema version, always producing a
//! new, independent tree. Downgrades drop version-gated constructs the
//! target schema does not know; upgrades are purely additive. Time-valued
//! attributes are canonicalized through the exact rational grammar on the
//! way through.

use fcpx_core::RationalTime;
use fcpx_document::{NodeId, SchemaVersion, XmlDocument};
use fcpx_validate::reference::validate_references;
use fcpx_validate::schema::validate_schema;
use thiserror::Error;
use tracing::{debug, warn};

/// Attributes rewritten through the rational time grammar.
const TIME_ATTRIBUTES: [&str; 5] = ["offset", "duration", "start", "tcStart", "frameDuration"];

/// Why a conversion could not produce a document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("document has no root element")]
    MissingRoot,

    #[error("document declares no `version` attribute")]
    MissingVersion,

    #[error("unsupported source version `{0}`")]
    UnsupportedSource(String),

    #[error("stripping `{element}` leaves the document invalid at {version}")]
    WouldInvalidate {
        element: String,
        version: SchemaVersion,
    },
}

/// Convert a document to `target`, returning a new tree.
///
/// The input is never mutated. If stripping unsupported constructs
/// introduces a validation failure the source did not already have — a
/// required element lost, or a reference left dangling because its target
/// was stripped — the conversion fails instead of emitting the damaged
/// document. Failures already present in the source pass through
/// untouched; callers are still expected to re-run the validators on the
/// result as a confirming step.
pub fn convert(doc: &XmlDocument, target: SchemaVersion) -> Result<XmlDocument, ConvertError> {
    let root = doc.root().ok_or(ConvertError::MissingRoot)?;
    let declared = doc
        .attribute(root, "version")
        .ok_or(ConvertError::MissingVersion)?;
    let source: SchemaVersion = declared
        .parse()
        .map_err(|_| ConvertError::UnsupportedSource(declared.to_string()))?;

    let mut out = XmlDocument::new();
    let mut dropped: Vec<String> = Vec::new();
    let new_root = copy_filtered(doc, root, &mut out, target, &mut dropped);
    out.set_root(new_root);
    out.set_attribute(new_root, "version", target.as_str());

    // Canonicalize every time attribute; malformed values collapse to the
    // zero sentinel exactly as the lenient parser reads them.
    let ids: Vec<NodeId> = out.descendants(new_root).collect();
    for id in ids {
        for attr in TIME_ATTRIBUTES {
            if let Some(raw) = out.attribute(id, attr) {
                let canonical = RationalTime::from_fcpxml(raw).to_fcpxml();
                out.set_attribute(id, attr, canonical);
            }
        }
    }

    if !dropped.is_empty() {
        warn!(
            from = source.as_str(),
            to = target.as_str(),
            dropped = ?dropped,
            "version-gated constructs removed during downgrade"
        );
        if stripping_introduced_errors(doc, &out, target) {
            return Err(ConvertError::WouldInvalidate {
                element: dropped.remove(0),
                version: target,
            });
        }
    }

    debug!(
        from = source.as_str(),
        to = target.as_str(),
        nodes = out.len(),
        "conversion complete"
    );
    Ok(out)
}

/// Whether the stripped tree has validation errors the source did not.
///
/// Both trees are checked against the target grammar, so errors the
/// source carried in — a missing required element, a ref that never
/// resolved — do not get blamed on the downgrade.
fn stripping_introduced_errors(src: &XmlDocument, out: &XmlDocument, target: SchemaVersion) -> bool {
    let schema_before = validate_schema(src, target);
    let schema_after = validate_schema(out, target);
    if schema_after
        .errors
        .iter()
        .any(|e| !schema_before.errors.contains(e))
    {
        return true;
    }

    let refs_before = validate_references(src);
    let refs_after = validate_references(out);
    refs_after
        .errors
        .iter()
        .any(|e| !refs_before.errors.contains(e))
}

/// Copy a subtree, skipping children whose element the target schema does
/// not support. Returns the id of the copied node in `out`.
fn copy_filtered(
    src: &XmlDocument,
    id: NodeId,
    out: &mut XmlDocument,
    target: SchemaVersion,
    dropped: &mut Vec<String>,
) -> NodeId {
    let node = src.node(id);
    let copy = out.create_element(node.name.clone());
    out.node_mut(copy).attributes = node.attributes.clone();
    out.node_mut(copy).text = node.text.clone();

    for &child in &node.children {
        let child_name = src.node(child).name.as_str();
        if !target.supports_element(child_name) {
            dropped.push(child_name.to_string());
            continue;
        }
        let child_copy = copy_filtered(src, child, out, target, dropped);
        out.append_child(copy, child_copy);
    }
    copy
}
