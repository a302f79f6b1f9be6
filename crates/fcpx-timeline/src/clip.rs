//! Clip and annotation types for the timeline.

use std::collections::HashMap;

use fcpx_core::{RationalTime, TimeRange};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named marker on a clip or timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Position relative to the owner's local time.
    pub start: RationalTime,
    /// Marker text.
    pub value: String,
    /// Optional note body.
    pub note: Option<String>,
}

impl Marker {
    pub fn new(start: RationalTime, value: impl Into<String>) -> Self {
        Self {
            start,
            value: value.into(),
            note: None,
        }
    }
}

/// A chapter marker with an optional poster frame offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterMarker {
    pub start: RationalTime,
    pub value: String,
    pub poster_offset: Option<RationalTime>,
}

/// A keyword range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub start: Option<RationalTime>,
    pub duration: Option<RationalTime>,
    pub value: String,
}

/// A favorite/reject rating range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub start: Option<RationalTime>,
    pub duration: Option<RationalTime>,
    /// `favorite` or `reject` in FCPXML terms.
    pub value: String,
}

/// A clip placed on the timeline.
///
/// `lane == 0` is the primary storyline; positive lanes sit above it,
/// negative lanes below (typically audio).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineClip {
    /// Unique clip ID.
    pub id: Uuid,
    /// Resource id of the underlying asset.
    pub asset_ref: String,
    /// Timeline position.
    pub offset: RationalTime,
    /// Duration on the timeline.
    pub duration: RationalTime,
    /// Source in-point.
    pub start: RationalTime,
    /// Vertical lane.
    pub lane: i32,
    pub markers: Vec<Marker>,
    pub chapter_markers: Vec<ChapterMarker>,
    pub keywords: Vec<Keyword>,
    pub ratings: Vec<Rating>,
    pub metadata: HashMap<String, String>,
}

impl TimelineClip {
    /// Create a clip on the primary storyline.
    pub fn new(asset_ref: impl Into<String>, offset: RationalTime, duration: RationalTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset_ref: asset_ref.into(),
            offset,
            duration,
            start: RationalTime::ZERO,
            lane: 0,
            markers: Vec::new(),
            chapter_markers: Vec::new(),
            keywords: Vec::new(),
            ratings: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    /// Same clip on a different lane.
    pub fn with_lane(mut self, lane: i32) -> Self {
        self.lane = lane;
        self
    }

    /// Same clip with a source in-point.
    pub fn with_start(mut self, start: RationalTime) -> Self {
        self.start = start;
        self
    }

    /// The timeline interval this clip occupies.
    #[inline]
    pub fn interval(&self) -> TimeRange {
        TimeRange::new(self.offset, self.duration)
    }

    /// Timeline end time.
    #[inline]
    pub fn end(&self) -> RationalTime {
        self.offset + self.duration
    }
}
