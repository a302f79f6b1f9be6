//! FCPX Core - Foundation types for the FCPXML document engine
//!
//! This crate provides the fundamental types used throughout FCPX Studio:
//! - Exact rational time (RationalTime, FrameRate, TimeRange)
//! - The FCPXML time-string grammar (parse and canonical emission)
//! - SMPTE timecode rendering, including drop-frame rates
//! - The shared error type

pub mod error;
pub mod time;
pub mod timecode;

pub use error::{FcpxError, Result};
pub use time::{frame_aligned, FrameRate, RationalTime, TimeParseError, TimeRange, QUANTUM_TIMESCALE};
pub use timecode::{timecode_from_seconds, Timecode};
