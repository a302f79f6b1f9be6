//! Rational time values and the FCPXML time-string grammar.
//!
//! All arithmetic goes through exact fraction math so that repeated edits
//! never accumulate floating-point drift. The stored `value/timescale` pair
//! is preserved as written, which keeps re-emission of parsed attribute
//! strings stable.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use num_rational::Ratio;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error produced by the strict time-string parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("malformed time string `{0}`")]
    Malformed(String),

    #[error("non-positive timescale in time string `{0}`")]
    NonPositiveTimescale(String),
}

/// An exact point in time or duration: `value / timescale` seconds.
///
/// The timescale is always positive; constructing a value with a zero
/// timescale is a programming error and panics. Equality and ordering
/// compare the represented fraction, not the raw pair, so `1/2s` equals
/// `2/4s`.
///
/// Arithmetic is exact as long as the reduced result fits the stored
/// pair. A result whose denominator exceeds `u32` is rounded to the
/// nearest [`QUANTUM_TIMESCALE`] tick, an error of at most half a tick.
/// Sums of media-rate times (1001-based included) stay in the exact
/// range; the quantized path only arises for large coprime timescales.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RationalTime {
    value: i64,
    timescale: u32,
}

impl RationalTime {
    /// Zero seconds.
    pub const ZERO: Self = Self {
        value: 0,
        timescale: 1,
    };

    /// Create a new time of `value / timescale` seconds.
    ///
    /// # Panics
    ///
    /// Panics if `timescale` is zero.
    #[inline]
    pub fn new(value: i64, timescale: u32) -> Self {
        assert!(timescale > 0, "RationalTime timescale must be positive");
        Self { value, timescale }
    }

    /// Numerator of the stored fraction.
    #[inline]
    pub fn value(self) -> i64 {
        self.value
    }

    /// Denominator of the stored fraction. Always positive.
    #[inline]
    pub fn timescale(self) -> u32 {
        self.timescale
    }

    /// Create a RationalTime from a frame number and frame rate.
    #[inline]
    pub fn from_frames(frames: i64, rate: FrameRate) -> Self {
        Self::new(frames * rate.denominator as i64, rate.numerator)
    }

    /// Convert to seconds as f64. Display only; never feed back into edits.
    #[inline]
    pub fn to_seconds_f64(self) -> f64 {
        self.value as f64 / self.timescale as f64
    }

    /// Convert to a whole frame number at the given rate, rounding down.
    pub fn to_frames(self, rate: FrameRate) -> i64 {
        let frames = self.as_ratio() * Ratio::new(rate.numerator as i128, rate.denominator as i128);
        frames.floor().to_integer() as i64
    }

    /// Check if this time is zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.value == 0
    }

    /// Check if this time is strictly negative.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.value < 0
    }

    /// Get the absolute value of this time.
    #[inline]
    pub fn abs(self) -> Self {
        Self {
            value: self.value.abs(),
            timescale: self.timescale,
        }
    }

    /// Reduce the stored fraction to lowest terms. The represented time is
    /// unchanged.
    pub fn normalized(self) -> Self {
        Self::from_ratio(self.as_ratio())
    }

    // ── FCPXML string grammar ───────────────────────────────────

    /// Parse an FCPXML time attribute, defaulting to zero on malformed
    /// input.
    ///
    /// Accepts `"<num>/<den>s"`, whole seconds `"<num>s"`, and a bare
    /// fraction `"<num>/<den>"`. Lenient exporters emit attributes this
    /// parser must not choke on, so anything else yields the zero sentinel.
    /// Use [`RationalTime::parse_strict`] to surface the error instead.
    pub fn from_fcpxml(s: &str) -> Self {
        Self::parse_strict(s).unwrap_or(Self::ZERO)
    }

    /// Parse an FCPXML time attribute, reporting malformed input.
    pub fn parse_strict(s: &str) -> Result<Self, TimeParseError> {
        let trimmed = s.trim();
        let (body, had_suffix) = match trimmed.strip_suffix('s') {
            Some(body) => (body, true),
            None => (trimmed, false),
        };

        if let Some((num, den)) = body.split_once('/') {
            let value: i64 = num
                .parse()
                .map_err(|_| TimeParseError::Malformed(s.to_string()))?;
            let den: i64 = den
                .parse()
                .map_err(|_| TimeParseError::Malformed(s.to_string()))?;
            if den <= 0 {
                return Err(TimeParseError::NonPositiveTimescale(s.to_string()));
            }
            let timescale =
                u32::try_from(den).map_err(|_| TimeParseError::Malformed(s.to_string()))?;
            Ok(Self::new(value, timescale))
        } else if had_suffix {
            // Whole seconds, e.g. "5s".
            let value: i64 = body
                .parse()
                .map_err(|_| TimeParseError::Malformed(s.to_string()))?;
            Ok(Self::new(value, 1))
        } else {
            Err(TimeParseError::Malformed(s.to_string()))
        }
    }

    /// Emit the canonical FCPXML form: `"0s"` for zero, otherwise
    /// `"<value>/<timescale>s"` with the denominator always shown.
    pub fn to_fcpxml(self) -> String {
        if self.value == 0 {
            "0s".to_string()
        } else {
            format!("{}/{}s", self.value, self.timescale)
        }
    }

    // ── Frame quantization ──────────────────────────────────────

    /// Quantize down to the nearest whole multiple of `frame_duration`.
    ///
    /// Rounds down (floor), never to nearest; edit points stay on the frame
    /// boundary at or before the requested time. For nearest-frame rounding
    /// see [`RationalTime::aligned`].
    pub fn conform(self, frame_duration: RationalTime) -> Self {
        let frames = (self.as_ratio() / frame_duration.as_ratio())
            .floor()
            .to_integer();
        Self::from_ratio(frame_duration.as_ratio() * frames)
    }

    /// Round to the nearest whole frame at the given rate.
    ///
    /// Cosmetic alignment for timecode display. Distinct policy from
    /// [`RationalTime::conform`], which floors.
    pub fn aligned(self, rate: FrameRate) -> Self {
        let frames = self.as_ratio() * Ratio::new(rate.numerator as i128, rate.denominator as i128);
        let nearest = (frames + Ratio::new(1, 2)).floor().to_integer();
        Self::from_ratio(Ratio::new(
            nearest * rate.denominator as i128,
            rate.numerator as i128,
        ))
    }

    // ── Exact arithmetic plumbing ───────────────────────────────

    pub(crate) fn as_ratio(self) -> Ratio<i128> {
        Ratio::new(self.value as i128, self.timescale as i128)
    }

    /// Store a reduced ratio, quantizing when it does not fit the pair.
    ///
    /// The exact fraction is kept whenever its reduced form fits
    /// `i64/u32`. Otherwise the value is rounded to the nearest tick of
    /// [`QUANTUM_TIMESCALE`] (error at most half a tick, under 0.71 ns).
    /// When even the tick count overflows `i64` the timescale is coarsened
    /// just enough for the whole-second magnitude to fit, and magnitudes
    /// past `i64::MAX` seconds clamp to that bound.
    pub(crate) fn from_ratio(ratio: Ratio<i128>) -> Self {
        let (numer, denom) = (*ratio.numer(), *ratio.denom());
        if let (Ok(value), Ok(timescale)) = (i64::try_from(numer), u32::try_from(denom)) {
            return Self { value, timescale };
        }

        let whole_seconds = numer.abs() / denom;
        if whole_seconds >= i64::MAX as i128 {
            let value = if numer < 0 { i64::MIN } else { i64::MAX };
            return Self {
                value,
                timescale: 1,
            };
        }

        // Finest tick that keeps the rounded count inside i64.
        let cap = (i64::MAX as i128) / (whole_seconds + 1);
        let timescale = (QUANTUM_TIMESCALE as i128).min(cap).max(1) as u32;
        let ticks = (ratio * Ratio::from_integer(timescale as i128) + Ratio::new(1, 2))
            .floor()
            .to_integer();
        Self {
            value: ticks as i64,
            timescale,
        }
    }
}

/// Fallback timescale for arithmetic results whose exact denominator
/// exceeds `u32`. 705.6 MHz is a whole multiple of every broadcast frame
/// rate, the 1001-based NTSC rates included, so frame-aligned times pass
/// through this grid without moving.
pub const QUANTUM_TIMESCALE: u32 = 705_600_000;

/// Round a floating-point second count to the nearest frame boundary.
///
/// Returns `None` for non-finite input rather than faulting.
pub fn frame_aligned(seconds: f64, rate: FrameRate) -> Option<RationalTime> {
    if !seconds.is_finite() {
        return None;
    }
    let frames = (seconds * rate.to_fps_f64()).round() as i64;
    Some(RationalTime::from_frames(frames, rate))
}

impl Default for RationalTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for RationalTime {
    fn eq(&self, other: &Self) -> bool {
        self.value as i128 * other.timescale as i128
            == other.value as i128 * self.timescale as i128
    }
}

impl Eq for RationalTime {}

impl PartialOrd for RationalTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RationalTime {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.value as i128 * other.timescale as i128;
        let rhs = other.value as i128 * self.timescale as i128;
        lhs.cmp(&rhs)
    }
}

impl Hash for RationalTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Hash the reduced fraction so equal times hash equally.
        let reduced = self.as_ratio();
        reduced.numer().hash(state);
        reduced.denom().hash(state);
    }
}

impl Add for RationalTime {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::from_ratio(self.as_ratio() + rhs.as_ratio())
    }
}

impl Sub for RationalTime {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::from_ratio(self.as_ratio() - rhs.as_ratio())
    }
}

impl Neg for RationalTime {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            value: -self.value,
            timescale: self.timescale,
        }
    }
}

impl Mul<i64> for RationalTime {
    type Output = Self;
    fn mul(self, rhs: i64) -> Self {
        Self::from_ratio(self.as_ratio() * rhs as i128)
    }
}

impl Div<i64> for RationalTime {
    type Output = Self;
    fn div(self, rhs: i64) -> Self {
        Self::from_ratio(self.as_ratio() / rhs as i128)
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fcpxml())
    }
}

impl FromStr for RationalTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_strict(s)
    }
}

/// Frame rate as a rational number (e.g., 24000/1001 for 23.976 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 24000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Duration of a single frame.
    #[inline]
    pub fn frame_duration(self) -> RationalTime {
        RationalTime::new(self.denominator as i64, self.numerator)
    }

    /// Whether timecode at this rate uses drop-frame counting.
    #[inline]
    pub fn is_drop_frame(self) -> bool {
        self.denominator == 1001 && (self.numerator == 30000 || self.numerator == 60000)
    }

    /// Nominal whole-frame rate used for timecode field math (30 for 29.97).
    #[inline]
    pub fn nominal_fps(self) -> i64 {
        ((self.numerator as i64) + (self.denominator as i64) / 2) / self.denominator as i64
    }

    /// Common frame rates
    pub const FPS_23_976: Self = Self::new(24000, 1001);
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_50: Self = Self::new(50, 1);
    pub const FPS_59_94: Self = Self::new(60000, 1001);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_24
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}

/// A half-open time range `[start, start + duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time (inclusive)
    pub start: RationalTime,
    /// Duration of the range
    pub duration: RationalTime,
}

impl TimeRange {
    /// Create a new time range from start and duration.
    #[inline]
    pub fn new(start: RationalTime, duration: RationalTime) -> Self {
        Self { start, duration }
    }

    /// Create a time range from start and end times.
    #[inline]
    pub fn from_start_end(start: RationalTime, end: RationalTime) -> Self {
        Self {
            start,
            duration: end - start,
        }
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(self) -> RationalTime {
        self.start + self.duration
    }

    /// Check if a time is within this range.
    #[inline]
    pub fn contains(self, time: RationalTime) -> bool {
        time >= self.start && time < self.end()
    }

    /// Check if two ranges intersect.
    ///
    /// A range that shares only a boundary point with another (one ends
    /// exactly where the other begins) counts as intersecting. Lane
    /// placement and range queries both rely on this predicate.
    pub fn intersects(self, other: Self) -> bool {
        self.start <= other.end() && other.start <= self.end()
    }

    /// Empty range starting at zero.
    pub const EMPTY: Self = Self {
        start: RationalTime::ZERO,
        duration: RationalTime::ZERO,
    };
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::EMPTY
    }
}
