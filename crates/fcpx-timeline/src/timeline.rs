//! The timeline container and its pure queries.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use fcpx_core::{RationalTime, TimeRange};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clip::{ChapterMarker, Keyword, Marker, Rating, TimelineClip};

/// A clip paired with its resolved timeline interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlacement<'a> {
    pub clip: &'a TimelineClip,
    pub range: TimeRange,
}

/// A lane-based timeline.
///
/// Clip storage order is insertion order, not time order; use
/// [`Timeline::sorted_clips`] for a time-ordered view. Mutation happens
/// only through the documented edit operations — pure queries never touch
/// `modified_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub name: String,
    /// Resource id of the sequence format, if known.
    pub format: Option<String>,
    pub clips: Vec<TimelineClip>,
    pub markers: Vec<Marker>,
    pub chapter_markers: Vec<ChapterMarker>,
    pub keywords: Vec<Keyword>,
    pub ratings: Vec<Rating>,
    pub metadata: HashMap<String, String>,
    /// Fixed at construction; propagated unchanged through every edit,
    /// including the pure variants.
    pub created_at: DateTime<Utc>,
    /// Updated by every mutating operation, never by queries.
    pub modified_at: DateTime<Utc>,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            format: None,
            clips: Vec::new(),
            markers: Vec::new(),
            chapter_markers: Vec::new(),
            keywords: Vec::new(),
            ratings: Vec::new(),
            metadata: HashMap::new(),
            created_at: now,
            modified_at: now,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.modified_at = Utc::now();
    }

    /// Append a clip as-is. No lane-overlap check happens here; overlap is
    /// only enforced by the auto-lane insertion operation.
    pub fn add_clip(&mut self, clip: TimelineClip) {
        self.clips.push(clip);
        self.touch();
    }

    /// Remove a clip by id, returning it if present.
    pub fn remove_clip(&mut self, id: Uuid) -> Option<TimelineClip> {
        let index = self.clips.iter().position(|c| c.id == id)?;
        let clip = self.clips.remove(index);
        self.touch();
        Some(clip)
    }

    // ── Pure queries ────────────────────────────────────────────

    /// Time-ordered view of the clips (offset, then lane).
    pub fn sorted_clips(&self) -> Vec<&TimelineClip> {
        let mut view: Vec<&TimelineClip> = self.clips.iter().collect();
        view.sort_by(|a, b| a.offset.cmp(&b.offset).then(a.lane.cmp(&b.lane)));
        view
    }

    /// Timeline duration: the maximum end time among lane-0 clips only.
    /// Clips on other lanes do not extend it.
    pub fn duration(&self) -> RationalTime {
        self.clips
            .iter()
            .filter(|c| c.lane == 0)
            .map(|c| c.end())
            .max()
            .unwrap_or(RationalTime::ZERO)
    }

    /// Find a clip by id.
    pub fn clip(&self, id: Uuid) -> Option<&TimelineClip> {
        self.clips.iter().find(|c| c.id == id)
    }

    /// Clips on one lane, in storage order.
    pub fn clips_in_lane(&self, lane: i32) -> Vec<&TimelineClip> {
        self.clips.iter().filter(|c| c.lane == lane).collect()
    }

    /// Clips whose interval intersects `range` (boundary-touching counts).
    pub fn clips_in_range(&self, range: TimeRange) -> Vec<&TimelineClip> {
        self.clips
            .iter()
            .filter(|c| c.interval().intersects(range))
            .collect()
    }

    /// Clips referencing the given asset resource id.
    pub fn clips_for_asset(&self, asset_ref: &str) -> Vec<&TimelineClip> {
        self.clips
            .iter()
            .filter(|c| c.asset_ref == asset_ref)
            .collect()
    }

    /// Minimum and maximum lane in use; `None` for an empty timeline.
    pub fn lane_range(&self) -> Option<(i32, i32)> {
        let min = self.clips.iter().map(|c| c.lane).min()?;
        let max = self.clips.iter().map(|c| c.lane).max()?;
        Some((min, max))
    }

    /// Every clip paired with its resolved interval, in storage order.
    pub fn placements(&self) -> Vec<ClipPlacement<'_>> {
        self.clips
            .iter()
            .map(|clip| ClipPlacement {
                clip,
                range: clip.interval(),
            })
            .collect()
    }

    /// Placements restricted to one lane.
    pub fn placements_in_lane(&self, lane: i32) -> Vec<ClipPlacement<'_>> {
        self.clips
            .iter()
            .filter(|c| c.lane == lane)
            .map(|clip| ClipPlacement {
                clip,
                range: clip.interval(),
            })
            .collect()
    }

    // ── Annotation edits ────────────────────────────────────────

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
        self.touch();
    }

    /// Remove markers by text. Returns how many were removed.
    pub fn remove_marker(&mut self, value: &str) -> usize {
        let before = self.markers.len();
        self.markers.retain(|m| m.value != value);
        let removed = before - self.markers.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    pub fn add_chapter_marker(&mut self, marker: ChapterMarker) {
        self.chapter_markers.push(marker);
        self.touch();
    }

    pub fn add_keyword(&mut self, keyword: Keyword) {
        self.keywords.push(keyword);
        self.touch();
    }

    pub fn remove_keyword(&mut self, value: &str) -> usize {
        let before = self.keywords.len();
        self.keywords.retain(|k| k.value != value);
        let removed = before - self.keywords.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    pub fn add_rating(&mut self, rating: Rating) {
        self.ratings.push(rating);
        self.touch();
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
        self.touch();
    }
}
