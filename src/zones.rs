//! Heart-rate zone table used by the workout notation
//!
//! Zone codes are the short labels coaches write after a duration
//! (`10' zr`). Each code maps to a fixed inclusive bpm range.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ---------------------------------------------------------------------------
/// Zone Codes
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HeartRateZone {
  ZR, // Regenerative
  ZM, // Moderate
  ZS, // Sub-threshold
  ZE, // Threshold
  ZT, // Top end
}

impl HeartRateZone {
  pub const ALL: [HeartRateZone; 5] = [
    HeartRateZone::ZR,
    HeartRateZone::ZM,
    HeartRateZone::ZS,
    HeartRateZone::ZE,
    HeartRateZone::ZT,
  ];

  /// Inclusive (min, max) heart rate in bpm
  pub const fn range(&self) -> (u16, u16) {
    match self {
      HeartRateZone::ZR => (157, 167),
      HeartRateZone::ZM => (167, 176),
      HeartRateZone::ZS => (176, 186),
      HeartRateZone::ZE => (186, 196),
      HeartRateZone::ZT => (196, 216),
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      HeartRateZone::ZR => "ZR",
      HeartRateZone::ZM => "ZM",
      HeartRateZone::ZS => "ZS",
      HeartRateZone::ZE => "ZE",
      HeartRateZone::ZT => "ZT",
    }
  }
}

impl fmt::Display for HeartRateZone {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Case-insensitive lookup; the error carries the code as written.
impl FromStr for HeartRateZone {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    HeartRateZone::ALL
      .into_iter()
      .find(|zone| zone.as_str().eq_ignore_ascii_case(s))
      .ok_or_else(|| s.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
