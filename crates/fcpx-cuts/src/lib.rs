//! FCPX Cuts - Edit-point detection
//!
//! Classifies every boundary between consecutive clips in a spine as a
//! hard cut, a transition, or a gap, and tags it with whether the two
//! sides come from the same source resource. Results are derived values;
//! nothing is written back into the tree.

pub mod detect;
pub mod point;

pub use detect::{detect, detect_in_spine};
pub use point::{CutSummary, EditPoint, EditType, SourceRelationship};
