//! FCPXML schema versions and the version-gated element table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A declared version string that is not one of the supported schemas.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported FCPXML version `{0}`")]
pub struct UnsupportedVersion(pub String);

/// The ten supported FCPXML schema versions, in increasing order.
///
/// Each version maps to exactly one bundled grammar table consumed by the
/// schema validator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SchemaVersion {
    V1_5,
    V1_6,
    V1_7,
    V1_8,
    V1_9,
    V1_10,
    V1_11,
    V1_12,
    V1_13,
    V1_14,
}

impl SchemaVersion {
    /// All supported versions, oldest first.
    pub const ALL: [SchemaVersion; 10] = [
        Self::V1_5,
        Self::V1_6,
        Self::V1_7,
        Self::V1_8,
        Self::V1_9,
        Self::V1_10,
        Self::V1_11,
        Self::V1_12,
        Self::V1_13,
        Self::V1_14,
    ];

    /// Newest supported version.
    pub const fn latest() -> Self {
        Self::V1_14
    }

    /// Dotted version string as written in the `version` attribute.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1_5 => "1.5",
            Self::V1_6 => "1.6",
            Self::V1_7 => "1.7",
            Self::V1_8 => "1.8",
            Self::V1_9 => "1.9",
            Self::V1_10 => "1.10",
            Self::V1_11 => "1.11",
            Self::V1_12 => "1.12",
            Self::V1_13 => "1.13",
            Self::V1_14 => "1.14",
        }
    }

    /// The schema version that introduced `element`, for constructs that
    /// are not part of the base vocabulary. `None` means the element has
    /// been present since 1.5 (or is unknown entirely; the validator's
    /// vocabulary decides that).
    pub fn element_introduced(element: &str) -> Option<SchemaVersion> {
        match element {
            "conform-rate" => Some(Self::V1_6),
            "caption" => Some(Self::V1_8),
            "live-drawing" => Some(Self::V1_9),
            "object-tracker" | "tracking-shape" => Some(Self::V1_10),
            "adjust-cinematic" => Some(Self::V1_11),
            "import-options" | "option" => Some(Self::V1_14),
            _ => None,
        }
    }

    /// Whether this schema version allows `element`, assuming the element
    /// is part of the FCPXML vocabulary at all.
    pub fn supports_element(self, element: &str) -> bool {
        match Self::element_introduced(element) {
            Some(introduced) => introduced <= self,
            None => true,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = UnsupportedVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| UnsupportedVersion(s.to_string()))
    }
}
