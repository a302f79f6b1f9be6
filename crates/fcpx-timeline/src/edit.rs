//! Ripple insertion and lane assignment.

use fcpx_core::{RationalTime, TimeRange};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;
use uuid::Uuid;

use crate::clip::TimelineClip;
use crate::timeline::Timeline;

/// Which lanes a ripple edit relocates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneScope {
    /// Only the primary storyline (lane 0).
    PrimaryOnly,
    /// One specific lane.
    Single(i32),
    /// An inclusive lane range.
    Range(RangeInclusive<i32>),
    /// Every lane.
    All,
}

impl LaneScope {
    /// Whether a clip on `lane` is inside this scope.
    pub fn matches(&self, lane: i32) -> bool {
        match self {
            Self::PrimaryOnly => lane == 0,
            Self::Single(single) => lane == *single,
            Self::Range(range) => range.contains(&lane),
            Self::All => true,
        }
    }
}

/// One relocated clip in a ripple report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipShift {
    pub clip_id: Uuid,
    pub lane: i32,
    pub from: RationalTime,
    pub to: RationalTime,
}

/// What a ripple insertion did: the inserted clip and every shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftReport {
    pub inserted_id: Uuid,
    pub inserted_at: RationalTime,
    pub shifts: Vec<ClipShift>,
}

impl ShiftReport {
    /// Serialize for exporters and logs.
    pub fn to_json(&self) -> fcpx_core::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| fcpx_core::FcpxError::Serialization(e.to_string()))
    }
}

/// The preferred lane is occupied and auto-assignment is disabled.
///
/// Carries the interval of the clip already sitting there. The timeline is
/// left unmodified.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("lane {lane} occupied by clip at {offset} for {duration}")]
pub struct LaneConflictError {
    pub lane: i32,
    pub offset: RationalTime,
    pub duration: RationalTime,
}

impl Timeline {
    // ── Ripple insert ───────────────────────────────────────────

    /// Insert `clip` at `at`, shifting every in-scope clip whose offset is
    /// at or after `at` later by the inserted clip's duration.
    ///
    /// Clips starting strictly before `at` are never split or extended,
    /// even when they span past the insertion point — ripple relocates
    /// whole clips only.
    pub fn ripple_insert(
        &mut self,
        mut clip: TimelineClip,
        at: RationalTime,
        scope: &LaneScope,
    ) -> ShiftReport {
        let shift = clip.duration;
        let mut shifts = Vec::new();

        for existing in &mut self.clips {
            if scope.matches(existing.lane) && existing.offset >= at {
                let from = existing.offset;
                existing.offset = from + shift;
                shifts.push(ClipShift {
                    clip_id: existing.id,
                    lane: existing.lane,
                    from,
                    to: existing.offset,
                });
            }
        }

        clip.offset = at;
        let report = ShiftReport {
            inserted_id: clip.id,
            inserted_at: at,
            shifts,
        };
        self.clips.push(clip);
        self.touch();
        report
    }

    /// Pure form of [`Timeline::ripple_insert`]: returns a new timeline
    /// and the same shift report, leaving `self` untouched. `created_at`
    /// propagates unchanged into the result.
    pub fn rippled(
        &self,
        clip: TimelineClip,
        at: RationalTime,
        scope: &LaneScope,
    ) -> (Timeline, ShiftReport) {
        let mut next = self.clone();
        let report = next.ripple_insert(clip, at, scope);
        (next, report)
    }

    // ── Auto-lane assignment ────────────────────────────────────

    /// Place `clip` at `at`, choosing a lane.
    ///
    /// If `preferred` is free for the clip's interval it is used.
    /// Otherwise, with `auto_assign` enabled, adjacent lanes are probed
    /// alternately (+1, -1, +2, -2, ... relative to `preferred`) until a
    /// free lane is found. With `auto_assign` disabled a conflict is a
    /// typed error and the timeline is left unmodified.
    pub fn insert_auto_lane(
        &mut self,
        mut clip: TimelineClip,
        at: RationalTime,
        preferred: i32,
        auto_assign: bool,
    ) -> Result<i32, LaneConflictError> {
        let interval = TimeRange::new(at, clip.duration);

        match self.first_conflict(preferred, interval) {
            None => {
                clip.offset = at;
                clip.lane = preferred;
                self.clips.push(clip);
                self.touch();
                Ok(preferred)
            }
            Some(conflict) if !auto_assign => Err(LaneConflictError {
                lane: preferred,
                offset: conflict.offset,
                duration: conflict.duration,
            }),
            Some(_) => {
                // The occupied lanes are finite, so probing outward from
                // the preferred lane always terminates.
                let mut step = 1;
                let lane = loop {
                    let above = preferred + step;
                    if self.first_conflict(above, interval).is_none() {
                        break above;
                    }
                    let below = preferred - step;
                    if self.first_conflict(below, interval).is_none() {
                        break below;
                    }
                    step += 1;
                };
                clip.offset = at;
                clip.lane = lane;
                self.clips.push(clip);
                self.touch();
                Ok(lane)
            }
        }
    }

    /// First clip on `lane` whose interval intersects `interval`.
    fn first_conflict(&self, lane: i32, interval: TimeRange) -> Option<&TimelineClip> {
        self.clips
            .iter()
            .find(|c| c.lane == lane && c.interval().intersects(interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(asset: &str, offset: i64, duration: i64, lane: i32) -> TimelineClip {
        TimelineClip::new(
            asset,
            RationalTime::new(offset, 1),
            RationalTime::new(duration, 1),
        )
        .with_lane(lane)
    }

    fn primary_timeline() -> Timeline {
        let mut timeline = Timeline::new("Main");
        timeline.add_clip(clip("r1", 0, 10, 0));
        timeline.add_clip(clip("r2", 10, 10, 0));
        timeline.add_clip(clip("r3", 20, 10, 0));
        timeline
    }

    #[test]
    fn ripple_shifts_clips_at_or_after_insertion_point() {
        let mut timeline = primary_timeline();
        let insert = clip("rx", 0, 5, 0);
        let report = timeline.ripple_insert(insert, RationalTime::new(5, 1), &LaneScope::All);

        // Clip at 0 untouched; clips at 10 and 20 move to 15 and 25.
        let offsets: Vec<i64> = timeline
            .sorted_clips()
            .iter()
            .map(|c| c.offset.value() / c.offset.timescale() as i64)
            .collect();
        assert_eq!(offsets, vec![0, 5, 15, 25]);
        assert_eq!(report.shifts.len(), 2);
        assert_eq!(timeline.clips.len(), 4);
    }

    #[test]
    fn ripple_never_splits_a_spanning_clip() {
        let mut timeline = Timeline::new("Main");
        timeline.add_clip(clip("r1", 0, 20, 0)); // spans the insertion point
        let report = timeline.ripple_insert(
            clip("rx", 0, 5, 0),
            RationalTime::new(5, 1),
            &LaneScope::All,
        );
        assert!(report.shifts.is_empty());
        let spanning = timeline.clips_for_asset("r1")[0];
        assert_eq!(spanning.offset, RationalTime::ZERO);
        assert_eq!(spanning.duration, RationalTime::new(20, 1));
    }

    #[test]
    fn ripple_boundary_offset_equal_to_insertion_point_shifts() {
        let mut timeline = Timeline::new("Main");
        timeline.add_clip(clip("r1", 5, 10, 0));
        let report = timeline.ripple_insert(
            clip("rx", 0, 3, 0),
            RationalTime::new(5, 1),
            &LaneScope::All,
        );
        assert_eq!(report.shifts.len(), 1);
        assert_eq!(report.shifts[0].to, RationalTime::new(8, 1));
    }

    #[test]
    fn lane_scope_limits_the_ripple() {
        let mut timeline = primary_timeline();
        timeline.add_clip(clip("audio", 10, 10, -1));

        let report = timeline.ripple_insert(
            clip("rx", 0, 5, 0),
            RationalTime::new(10, 1),
            &LaneScope::PrimaryOnly,
        );
        // Only the lane-0 clips at 10 and 20 move; the audio clip stays.
        assert_eq!(report.shifts.len(), 2);
        assert!(report.shifts.iter().all(|s| s.lane == 0));
        assert_eq!(
            timeline.clips_in_lane(-1)[0].offset,
            RationalTime::new(10, 1)
        );
    }

    #[test]
    fn single_and_range_scopes() {
        assert!(LaneScope::Single(2).matches(2));
        assert!(!LaneScope::Single(2).matches(0));
        assert!(LaneScope::Range(-1..=1).matches(0));
        assert!(LaneScope::Range(-1..=1).matches(-1));
        assert!(!LaneScope::Range(-1..=1).matches(2));
        assert!(LaneScope::All.matches(-17));
    }

    #[test]
    fn pure_and_mutating_forms_agree() {
        let timeline = primary_timeline();
        let insert = clip("rx", 0, 5, 0);
        let at = RationalTime::new(5, 1);

        let (pure_result, pure_report) = timeline.rippled(insert.clone(), at, &LaneScope::All);

        let mut mutated = timeline.clone();
        let mutating_report = mutated.ripple_insert(insert, at, &LaneScope::All);

        assert_eq!(pure_report, mutating_report);
        let pure_offsets: Vec<RationalTime> =
            pure_result.sorted_clips().iter().map(|c| c.offset).collect();
        let mutated_offsets: Vec<RationalTime> =
            mutated.sorted_clips().iter().map(|c| c.offset).collect();
        assert_eq!(pure_offsets, mutated_offsets);

        // The original is untouched and created_at propagated.
        assert_eq!(timeline.clips.len(), 3);
        assert_eq!(pure_result.created_at, timeline.created_at);
    }

    #[test]
    fn shift_report_serializes_for_exporters() {
        let mut timeline = primary_timeline();
        let report = timeline.ripple_insert(
            clip("rx", 0, 5, 0),
            RationalTime::new(5, 1),
            &LaneScope::All,
        );
        let json = report.to_json().unwrap();
        assert!(json.contains("inserted_at"));
        assert!(json.contains("shifts"));
    }

    #[test]
    fn clip_count_increases_by_exactly_one() {
        let mut timeline = primary_timeline();
        let before = timeline.clips.len();
        timeline.ripple_insert(clip("rx", 0, 5, 0), RationalTime::ZERO, &LaneScope::All);
        assert_eq!(timeline.clips.len(), before + 1);
    }

    // ── Auto-lane ───────────────────────────────────────────────

    #[test]
    fn preferred_lane_used_when_free() {
        let mut timeline = Timeline::new("Main");
        let lane = timeline
            .insert_auto_lane(clip("r1", 0, 5, 0), RationalTime::ZERO, 0, true)
            .unwrap();
        assert_eq!(lane, 0);
    }

    #[test]
    fn conflict_probes_outward_alternating() {
        let mut timeline = Timeline::new("Main");
        timeline.add_clip(clip("r1", 0, 10, 0));
        timeline.add_clip(clip("r2", 0, 10, 1));

        // Lane 0 and +1 busy; probe order 1, -1 lands on -1.
        let lane = timeline
            .insert_auto_lane(clip("rx", 0, 5, 0), RationalTime::ZERO, 0, true)
            .unwrap();
        assert_eq!(lane, -1);
    }

    #[test]
    fn assigned_lane_never_overlaps_existing_clips() {
        let mut timeline = Timeline::new("Main");
        for lane in -2..=2 {
            timeline.add_clip(clip("busy", 0, 10, lane));
        }
        let at = RationalTime::new(2, 1);
        let lane = timeline
            .insert_auto_lane(clip("rx", 0, 5, 0), at, 0, true)
            .unwrap();
        let interval = TimeRange::new(at, RationalTime::new(5, 1));
        let overlapping = timeline
            .clips_in_lane(lane)
            .iter()
            .filter(|c| c.asset_ref == "busy" && c.interval().intersects(interval))
            .count();
        assert_eq!(overlapping, 0);
        assert_eq!(lane, 3); // +1, -1, +2, -2 all busy; +3 is first free
    }

    #[test]
    fn disabled_auto_assignment_is_a_typed_error() {
        let mut timeline = Timeline::new("Main");
        timeline.add_clip(clip("r1", 3, 10, 0));
        let before = timeline.clone();

        let err = timeline
            .insert_auto_lane(clip("rx", 0, 5, 0), RationalTime::ZERO, 0, false)
            .unwrap_err();
        assert_eq!(err.lane, 0);
        assert_eq!(err.offset, RationalTime::new(3, 1));
        assert_eq!(err.duration, RationalTime::new(10, 1));
        // Timeline left unmodified, timestamps included.
        assert_eq!(timeline, before);
    }

    #[test]
    fn boundary_touching_counts_as_conflict() {
        let mut timeline = Timeline::new("Main");
        timeline.add_clip(clip("r1", 0, 10, 0));
        // New clip starts exactly where the existing one ends.
        let err = timeline
            .insert_auto_lane(clip("rx", 0, 5, 0), RationalTime::new(10, 1), 0, false)
            .unwrap_err();
        assert_eq!(err.lane, 0);
    }
}
