use super::{Condition, Target};
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Sport and Step Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SportType {
  #[default]
  Running,
  Cycling,
  Swimming,
  Strength,
  Cardio,
}

impl SportType {
  pub fn id(&self) -> u8 {
    match self {
      SportType::Running => 1,
      SportType::Cycling => 2,
      SportType::Swimming => 4,
      SportType::Strength => 5,
      SportType::Cardio => 6,
    }
  }

  pub fn key(&self) -> &'static str {
    match self {
      SportType::Running => "running",
      SportType::Cycling => "cycling",
      SportType::Swimming => "swimming",
      SportType::Strength => "strength_training",
      SportType::Cardio => "cardio_training",
    }
  }
}

/// Semantic role of a step, derived from its position in its sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepRole {
  WarmUp,
  CoolDown,
  Interval,
  Recovery,
  Repeat,
}

impl StepRole {
  pub fn id(&self) -> u8 {
    match self {
      StepRole::WarmUp => 1,
      StepRole::CoolDown => 2,
      StepRole::Interval => 3,
      StepRole::Recovery => 4,
      StepRole::Repeat => 6,
    }
  }

  pub fn key(&self) -> &'static str {
    match self {
      StepRole::WarmUp => "warmup",
      StepRole::CoolDown => "cooldown",
      StepRole::Interval => "interval",
      StepRole::Recovery => "recovery",
      StepRole::Repeat => "repeat",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Steps
/// ---------------------------------------------------------------------------

/// A single leaf instruction: run for a duration or a distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
  pub name: String,
  pub description: String,
  pub role: StepRole,
  pub condition: Condition,
  #[serde(default)]
  pub target: Target,
}

/// An inner sequence executed `iterations` times
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatedStep {
  pub iterations: u32,
  pub steps: Vec<WorkoutStep>,
}

impl RepeatedStep {
  pub fn role(&self) -> StepRole {
    StepRole::Repeat
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkoutStep {
  Single(Step),
  Repeat(RepeatedStep),
}

impl WorkoutStep {
  pub fn role(&self) -> StepRole {
    match self {
      WorkoutStep::Single(step) => step.role,
      WorkoutStep::Repeat(repeat) => repeat.role(),
    }
  }

  pub fn as_step(&self) -> Option<&Step> {
    match self {
      WorkoutStep::Single(step) => Some(step),
      WorkoutStep::Repeat(_) => None,
    }
  }

  pub fn as_repeat(&self) -> Option<&RepeatedStep> {
    match self {
      WorkoutStep::Single(_) => None,
      WorkoutStep::Repeat(repeat) => Some(repeat),
    }
  }
}

impl From<Step> for WorkoutStep {
  fn from(step: Step) -> Self {
    WorkoutStep::Single(step)
  }
}

impl From<RepeatedStep> for WorkoutStep {
  fn from(repeat: RepeatedStep) -> Self {
    WorkoutStep::Repeat(repeat)
  }
}

/// ---------------------------------------------------------------------------
/// Workout
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
  pub name: String,
  pub sport: SportType,
  pub steps: Vec<WorkoutStep>,
}

impl Workout {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      sport: SportType::default(),
      steps: Vec::new(),
    }
  }

  pub fn add_step(&mut self, step: impl Into<WorkoutStep>) {
    self.steps.push(step.into());
  }
}
