//! SMPTE timecode rendering, including drop-frame rates.
//!
//! The frame index is always derived from the exact rational time before
//! any display math happens, so 29.97/59.94 material stays frame-accurate
//! over long durations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::{FrameRate, RationalTime};

/// A wall-clock style timecode: hours, minutes, seconds, frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timecode {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u32,
    /// True when the rate uses drop-frame counting (29.97, 59.94).
    pub drop_frame: bool,
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.drop_frame { ';' } else { ':' };
        write!(
            f,
            "{:02}:{:02}:{:02}{}{:02}",
            self.hours, self.minutes, self.seconds, sep, self.frames
        )
    }
}

impl RationalTime {
    /// Convert to a timecode at the given rate.
    ///
    /// Returns `None` for negative times; timecode has no sign convention
    /// here and callers display negative offsets differently.
    pub fn to_timecode(self, rate: FrameRate) -> Option<Timecode> {
        if self.is_negative() {
            return None;
        }
        let frame = self.to_frames(rate);
        Some(timecode_from_frame(frame, rate))
    }
}

/// Convert a floating-point second count to a timecode.
///
/// Non-finite or negative input yields `None` rather than a fault.
pub fn timecode_from_seconds(seconds: f64, rate: FrameRate) -> Option<Timecode> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let frame = (seconds * rate.to_fps_f64()).floor() as i64;
    Some(timecode_from_frame(frame, rate))
}

fn timecode_from_frame(frame: i64, rate: FrameRate) -> Timecode {
    let nominal = rate.nominal_fps();
    let drop = rate.is_drop_frame();
    let display_frame = if drop {
        // 2 dropped numbers per minute at 29.97, 4 at 59.94.
        apply_drop_frame(frame, nominal, nominal / 15)
    } else {
        frame
    };

    let frames = display_frame % nominal;
    let total_seconds = display_frame / nominal;
    let seconds = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let minutes = total_minutes % 60;
    let hours = total_minutes / 60;

    Timecode {
        hours: hours as u32,
        minutes: minutes as u32,
        seconds: seconds as u32,
        frames: frames as u32,
        drop_frame: drop,
    }
}

/// Re-insert the dropped frame numbers so the field math above can use the
/// nominal rate. Standard SMPTE counting: `drop` numbers are skipped at the
/// start of every minute except each tenth minute.
fn apply_drop_frame(frame: i64, nominal: i64, drop: i64) -> i64 {
    let frames_per_10min = nominal * 600 - 9 * drop;
    let frames_per_min = nominal * 60 - drop;

    let tens = frame / frames_per_10min;
    let rem = frame % frames_per_10min;

    let mut adjusted = frame + 9 * drop * tens;
    if rem > drop {
        adjusted += drop * ((rem - drop) / frames_per_min);
    }
    adjusted
}
