use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a step ends. The discriminator and key are the ones Garmin Connect
/// uses for end conditions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
  /// Whole minutes, stored as seconds
  Duration { seconds: u64 },
  Distance { meters: f64, unit: DistanceUnit },
}

impl Condition {
  pub fn minutes(minutes: u64) -> Option<Self> {
    minutes
      .checked_mul(60)
      .map(|seconds| Condition::Duration { seconds })
  }

  pub fn id(&self) -> u8 {
    match self {
      Condition::Duration { .. } => 2,
      Condition::Distance { .. } => 3,
    }
  }

  pub fn key(&self) -> &'static str {
    match self {
      Condition::Duration { .. } => "time",
      Condition::Distance { .. } => "distance",
    }
  }

  /// Seconds for durations, meters for distances
  pub fn value(&self) -> f64 {
    match self {
      Condition::Duration { seconds } => *seconds as f64,
      Condition::Distance { meters, .. } => *meters,
    }
  }
}

/// Units the notation accepts for distance steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
  Kilometers,
  Meters,
}

impl DistanceUnit {
  pub fn symbol(&self) -> &'static str {
    match self {
      DistanceUnit::Kilometers => "km",
      DistanceUnit::Meters => "m",
    }
  }

  /// Garmin `unitKey` for the preferred display unit
  pub fn unit_key(&self) -> &'static str {
    match self {
      DistanceUnit::Kilometers => "kilometer",
      DistanceUnit::Meters => "meter",
    }
  }
}

impl FromStr for DistanceUnit {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "km" => Ok(DistanceUnit::Kilometers),
      "m" => Ok(DistanceUnit::Meters),
      _ => Err(s.to_string()),
    }
  }
}
