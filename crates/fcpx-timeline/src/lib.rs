//! FCPX Timeline - Lane-based timeline edit engine
//!
//! Implements the timeline model and its edit operations:
//! - Clips on integer lanes around the primary storyline (lane 0)
//! - Ripple insertion, in mutating and pure forms, with shift reports
//! - Auto-lane assignment with typed conflict errors
//! - Interval queries over half-open clip ranges

pub mod clip;
pub mod edit;
pub mod timeline;

pub use clip::{ChapterMarker, Keyword, Marker, Rating, TimelineClip};
pub use edit::{ClipShift, LaneConflictError, LaneScope, ShiftReport};
pub use timeline::{ClipPlacement, Timeline};
