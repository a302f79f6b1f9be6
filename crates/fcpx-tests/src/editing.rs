//! End-to-end timeline editing: ripple inserts, lane assignment, queries.

use fcpx_core::{RationalTime, TimeRange};
use fcpx_timeline::{LaneScope, Marker, Timeline, TimelineClip};

fn seconds(n: i64) -> RationalTime {
    RationalTime::new(n, 1)
}

fn clip(asset: &str, offset: i64, duration: i64) -> TimelineClip {
    TimelineClip::new(asset, seconds(offset), seconds(duration))
}

/// Three back-to-back clips on the primary storyline plus a music bed.
fn rough_cut() -> Timeline {
    let mut timeline = Timeline::new("Rough Cut");
    timeline.format = Some("r0".into());
    timeline.add_clip(clip("r1", 0, 10));
    timeline.add_clip(clip("r2", 10, 10));
    timeline.add_clip(clip("r3", 20, 10));
    timeline.add_clip(clip("music", 0, 30).with_lane(-1));
    timeline
}

// ── A full editing session ─────────────────────────────────────

#[test]
fn ripple_session_keeps_the_story_consistent() {
    let mut timeline = rough_cut();
    let created = timeline.created_at;

    // Insert a 5s pickup at t=5 across every lane.
    let report = timeline.ripple_insert(clip("pickup", 0, 5), seconds(5), &LaneScope::All);

    // The clip at t=0 and the music bed at t=0 stay; everything at or
    // after t=5 moved by 5s.
    assert_eq!(report.inserted_at, seconds(5));
    assert_eq!(report.shifts.len(), 2);
    let offsets: Vec<RationalTime> = timeline.sorted_clips().iter().map(|c| c.offset).collect();
    assert_eq!(
        offsets,
        vec![seconds(0), seconds(0), seconds(5), seconds(15), seconds(25)]
    );

    // Story duration grew by the inserted duration.
    assert_eq!(timeline.duration(), seconds(35));
    // The music bed still spans [0, 30) untouched.
    let music = timeline.clips_for_asset("music")[0];
    assert_eq!(music.offset, seconds(0));
    assert_eq!(music.duration, seconds(30));

    assert_eq!(timeline.created_at, created);
    assert!(timeline.modified_at >= created);
}

#[test]
fn pure_ripple_leaves_the_working_copy_alone() {
    let timeline = rough_cut();
    let (next, report) = timeline.rippled(clip("pickup", 0, 5), seconds(5), &LaneScope::All);

    assert_eq!(timeline.clips.len(), 4);
    assert_eq!(timeline.duration(), seconds(30));
    assert_eq!(next.clips.len(), 5);
    assert_eq!(next.duration(), seconds(35));
    assert_eq!(next.created_at, timeline.created_at);
    assert!(next.clip(report.inserted_id).is_some());
    assert!(timeline.clip(report.inserted_id).is_none());
}

#[test]
fn scoped_ripple_keeps_the_music_bed_in_sync_point() {
    let mut timeline = rough_cut();
    timeline.ripple_insert(clip("pickup", 0, 5), seconds(10), &LaneScope::PrimaryOnly);

    // Lane 0 rippled, lane -1 did not.
    assert_eq!(timeline.duration(), seconds(35));
    assert_eq!(timeline.clips_in_lane(-1)[0].offset, seconds(0));
}

// ── Connected clips via auto-lane ──────────────────────────────

#[test]
fn connected_clips_stack_above_the_storyline() {
    let mut timeline = rough_cut();

    // A title over the first clip goes to its preferred lane.
    let lane = timeline
        .insert_auto_lane(clip("title", 0, 4), seconds(2), 1, true)
        .unwrap();
    assert_eq!(lane, 1);

    // A second overlapping title gets bumped to the next free lane.
    let lane = timeline
        .insert_auto_lane(clip("title2", 0, 4), seconds(3), 1, true)
        .unwrap();
    assert_eq!(lane, 2);

    assert_eq!(timeline.lane_range(), Some((-1, 2)));

    // Connected clips never extend the story duration.
    assert_eq!(timeline.duration(), seconds(30));
}

#[test]
fn strict_placement_reports_the_blocking_clip() {
    let mut timeline = rough_cut();
    let before = timeline.clone();

    let err = timeline
        .insert_auto_lane(clip("pickup", 0, 5), seconds(8), 0, false)
        .unwrap_err();
    assert_eq!(err.lane, 0);
    assert_eq!(err.offset, seconds(0));
    assert_eq!(err.duration, seconds(10));
    assert_eq!(timeline, before);
}

// ── Queries after edits ────────────────────────────────────────

#[test]
fn interval_queries_track_the_edit() {
    let mut timeline = rough_cut();
    timeline.ripple_insert(clip("pickup", 0, 5), seconds(10), &LaneScope::All);

    // The window [11, 13) now holds the pickup and the music bed; the
    // former t=10 clip moved out to t=15.
    let hits = timeline.clips_in_range(TimeRange::new(seconds(11), seconds(2)));
    let assets: Vec<&str> = hits.iter().map(|c| c.asset_ref.as_str()).collect();
    assert!(assets.contains(&"pickup"));
    assert!(assets.contains(&"music"));
    assert!(!assets.contains(&"r3"));
}

#[test]
fn markers_survive_edits_and_serialization() {
    let mut timeline = rough_cut();
    timeline.add_marker(Marker::new(seconds(12), "review this"));
    timeline.set_metadata("editor", "JM");

    let (next, _) = timeline.rippled(clip("pickup", 0, 5), seconds(5), &LaneScope::All);
    assert_eq!(next.markers.len(), 1);
    assert_eq!(next.metadata.get("editor").map(String::as_str), Some("JM"));

    let json = serde_json::to_string(&next).unwrap();
    let back: Timeline = serde_json::from_str(&json).unwrap();
    assert_eq!(back, next);
}
