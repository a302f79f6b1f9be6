//! Boundary classification over the ordered children of a spine.

use fcpx_core::RationalTime;
use fcpx_document::{NodeId, XmlDocument};
use tracing::debug;

use crate::point::{CutSummary, EditPoint, EditType, SourceRelationship};

/// Story elements that participate in edit-point boundaries. Nested spines
/// (secondary storylines) count as clip-like; gaps and transitions are
/// separators, not participants.
const CLIP_LIKE: &[&str] = &[
    "asset-clip",
    "clip",
    "video",
    "audio",
    "title",
    "ref-clip",
    "sync-clip",
    "mc-clip",
    "audition",
    "spine",
];

fn is_clip_like(name: &str) -> bool {
    CLIP_LIKE.contains(&name)
}

/// Detect edit points in the first project's primary spine.
///
/// A document with no project or spine yields an empty summary, the same
/// as an empty spine.
pub fn detect(doc: &XmlDocument) -> CutSummary {
    let spine = doc.root().and_then(|root| {
        let project = doc.find_descendant(root, "project")?;
        doc.find_descendant(project, "spine")
    });
    match spine {
        Some(spine) => detect_in_spine(doc, spine),
        None => {
            debug!("no primary spine found, empty cut summary");
            CutSummary::from_points(Vec::new())
        }
    }
}

/// Detect edit points in a specific spine.
///
/// For every pair of consecutive clip-like children, the elements strictly
/// between them classify the boundary: a transition wins over a gap when
/// both are present; neither means a hard cut. An empty or single-clip
/// spine yields zero edit points.
pub fn detect_in_spine(doc: &XmlDocument, spine: NodeId) -> CutSummary {
    let children = doc.children(spine);

    // One pass to resolve each child's start position: explicit `offset`
    // wins, otherwise the running end of the story so far. Transitions
    // overlap their neighbors and do not advance the running position.
    let mut running = RationalTime::ZERO;
    let mut clips: Vec<(usize, NodeId, RationalTime)> = Vec::new();
    for (index, &child) in children.iter().enumerate() {
        let node = doc.node(child);
        let start = match node.attribute("offset") {
            Some(raw) => RationalTime::from_fcpxml(raw),
            None => running,
        };
        if node.name == "transition" {
            continue;
        }
        let duration = node
            .attribute("duration")
            .map(RationalTime::from_fcpxml)
            .unwrap_or(RationalTime::ZERO);
        running = start + duration;
        if is_clip_like(&node.name) {
            clips.push((index, child, start));
        }
    }

    let mut points = Vec::new();
    for pair in clips.windows(2) {
        let (left_index, left, _) = pair[0];
        let (right_index, right, right_start) = pair[1];

        let mut transition_name: Option<String> = None;
        let mut saw_gap = false;
        for &between in &children[left_index + 1..right_index] {
            let node = doc.node(between);
            match node.name.as_str() {
                "transition" => {
                    transition_name
                        .get_or_insert_with(|| node.attribute("name").unwrap_or("").to_string());
                }
                "gap" => saw_gap = true,
                _ => {}
            }
        }

        // Transition always takes priority over gap.
        let edit_type = match transition_name {
            Some(name) => EditType::Transition { name },
            None if saw_gap => EditType::Gap,
            None => EditType::HardCut,
        };

        let source_relationship = match (
            doc.attribute(left, "ref"),
            doc.attribute(right, "ref"),
        ) {
            (Some(a), Some(b)) if a == b => SourceRelationship::SameClip,
            _ => SourceRelationship::DifferentClips,
        };

        points.push(EditPoint {
            position: right_start,
            edit_type,
            source_relationship,
        });
    }

    debug!(points = points.len(), "spine edit points detected");
    CutSummary::from_points(points)
}
