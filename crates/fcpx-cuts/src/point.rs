//! Edit point types and the aggregate summary.
//!
//! Edit points are derived values: recomputed on every detection call,
//! never persisted in the tree.

use fcpx_core::RationalTime;
use serde::{Deserialize, Serialize};

/// What separates two adjacent clips at a boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditType {
    /// Clips are strictly adjacent with nothing between them.
    HardCut,
    /// A transition element sits between the clips. Takes priority over a
    /// gap when both are present.
    Transition { name: String },
    /// A gap element sits between the clips.
    Gap,
}

/// Whether the two sides of a boundary come from the same source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceRelationship {
    /// Both clips reference the same resource id (a continuity cut).
    SameClip,
    /// The clips reference different resources, or one has no reference.
    DifferentClips,
}

/// One classified boundary between consecutive clips in a spine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditPoint {
    /// Timeline position of the boundary.
    pub position: RationalTime,
    pub edit_type: EditType,
    pub source_relationship: SourceRelationship,
}

/// All edit points of one spine plus aggregate counters.
///
/// The counters are derived from the point list in one place so the two
/// counting invariants (`hard + transition + gap == total` and
/// `same + different == total`) hold by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutSummary {
    pub edit_points: Vec<EditPoint>,
    pub hard_cut_count: usize,
    pub transition_count: usize,
    pub gap_cut_count: usize,
    pub same_clip_count: usize,
    pub different_clips_count: usize,
}

impl CutSummary {
    /// Build a summary, computing every counter from the point list.
    pub fn from_points(edit_points: Vec<EditPoint>) -> Self {
        let mut hard_cut_count = 0;
        let mut transition_count = 0;
        let mut gap_cut_count = 0;
        let mut same_clip_count = 0;
        let mut different_clips_count = 0;

        for point in &edit_points {
            match point.edit_type {
                EditType::HardCut => hard_cut_count += 1,
                EditType::Transition { .. } => transition_count += 1,
                EditType::Gap => gap_cut_count += 1,
            }
            match point.source_relationship {
                SourceRelationship::SameClip => same_clip_count += 1,
                SourceRelationship::DifferentClips => different_clips_count += 1,
            }
        }

        Self {
            edit_points,
            hard_cut_count,
            transition_count,
            gap_cut_count,
            same_clip_count,
            different_clips_count,
        }
    }

    /// Total number of edit points.
    pub fn total(&self) -> usize {
        self.edit_points.len()
    }
}
