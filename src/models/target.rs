use crate::zones::HeartRateZone;
use serde::{Deserialize, Serialize};

/// Performance goal attached to a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Target {
  #[default]
  None,
  HeartRateZone {
    zone: HeartRateZone,
    min: u16,
    max: u16,
  },
}

impl Target {
  pub fn heart_rate(zone: HeartRateZone) -> Self {
    let (min, max) = zone.range();
    Target::HeartRateZone { zone, min, max }
  }

  pub fn target_type(&self) -> TargetType {
    match self {
      Target::None => TargetType::NoTarget,
      Target::HeartRateZone { .. } => TargetType::HeartRate,
    }
  }

  pub fn values(&self) -> Option<(u16, u16)> {
    match self {
      Target::None => None,
      Target::HeartRateZone { min, max, .. } => Some((*min, *max)),
    }
  }

  pub fn unit(&self) -> Option<&'static str> {
    match self {
      Target::None => None,
      Target::HeartRateZone { .. } => Some("bpm"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetType {
  NoTarget,
  HeartRate,
}

impl TargetType {
  pub fn id(&self) -> u8 {
    match self {
      TargetType::NoTarget => 1,
      TargetType::HeartRate => 4,
    }
  }

  pub fn key(&self) -> &'static str {
    match self {
      TargetType::NoTarget => "no.target",
      TargetType::HeartRate => "heart.rate.zone",
    }
  }
}
