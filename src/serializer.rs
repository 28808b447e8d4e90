//! Garmin Connect workout payloads
//!
//! Maps a parsed [`Workout`] onto the JSON body the workout service expects.
//! Step ids are assigned depth-first in source order; the counter lives on
//! the stack of each call.

use crate::models::{Condition, RepeatedStep, SportType, Step, StepRole, Workout, WorkoutStep};
use serde_json::{json, Map, Value};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const EXECUTABLE_STEP: &str = "ExecutableStepDTO";
const REPEAT_GROUP: &str = "RepeatGroupDTO";
const ITERATIONS_CONDITION_ID: u8 = 7;
const ITERATIONS_CONDITION_KEY: &str = "iterations";

/// ---------------------------------------------------------------------------
/// Workout Payload
/// ---------------------------------------------------------------------------

pub fn serialize_workout(workout: &Workout) -> Value {
  let mut step_order = 1;
  let steps = serialize_steps(&workout.steps, &mut step_order);

  json!({
    "sportType": sport_type(workout.sport),
    "subSportType": null,
    "workoutName": workout.name,
    "estimatedDistanceUnit": { "unitKey": null },
    "workoutSegments": [{
      "segmentOrder": 1,
      "sportType": sport_type(workout.sport),
      "workoutSteps": steps,
    }],
    "avgTrainingSpeed": null,
    "estimatedDurationInSecs": estimated_duration(&workout.steps),
    "estimatedDistanceInMeters": estimated_distance(&workout.steps),
    "estimateType": null,
  })
}

fn serialize_steps(steps: &[WorkoutStep], step_order: &mut u32) -> Vec<Value> {
  steps
    .iter()
    .map(|step| match step {
      WorkoutStep::Single(step) => serialize_step(step, step_order),
      WorkoutStep::Repeat(repeat) => serialize_repeat(repeat, step_order),
    })
    .collect()
}

fn serialize_step(step: &Step, step_order: &mut u32) -> Value {
  let order = next_order(step_order);

  let mut payload = Map::new();
  payload.insert("type".into(), json!(EXECUTABLE_STEP));
  payload.insert("stepId".into(), json!(order));
  payload.insert("stepOrder".into(), json!(order));
  payload.insert("stepType".into(), step_type(step.role));
  payload.insert(
    "endCondition".into(),
    json!({
      "conditionTypeId": step.condition.id(),
      "conditionTypeKey": step.condition.key(),
      "displayOrder": step.condition.id(),
      "displayable": true,
    }),
  );
  payload.insert("description".into(), json!(step.description));

  match step.condition {
    Condition::Duration { seconds } => {
      payload.insert("endConditionValue".into(), json!(seconds));
    }
    Condition::Distance { meters, unit } => {
      payload.insert("endConditionValue".into(), json!(meters));
      payload.insert(
        "preferredEndConditionUnit".into(),
        json!({ "unitKey": unit.unit_key() }),
      );
    }
  }

  let target_type = step.target.target_type();
  payload.insert(
    "targetType".into(),
    json!({
      "workoutTargetTypeId": target_type.id(),
      "workoutTargetTypeKey": target_type.key(),
      "displayOrder": target_type.id(),
    }),
  );
  if let Some((low, high)) = step.target.values() {
    payload.insert("targetValueOne".into(), json!(low));
    payload.insert("targetValueTwo".into(), json!(high));
  }

  Value::Object(payload)
}

fn serialize_repeat(repeat: &RepeatedStep, step_order: &mut u32) -> Value {
  let order = next_order(step_order);
  let steps = serialize_steps(&repeat.steps, step_order);

  json!({
    "type": REPEAT_GROUP,
    "stepId": order,
    "stepOrder": order,
    "stepType": step_type(repeat.role()),
    "numberOfIterations": repeat.iterations,
    "smartRepeat": false,
    "endCondition": {
      "conditionTypeId": ITERATIONS_CONDITION_ID,
      "conditionTypeKey": ITERATIONS_CONDITION_KEY,
      "displayOrder": ITERATIONS_CONDITION_ID,
      "displayable": false,
    },
    "endConditionValue": repeat.iterations,
    "workoutSteps": steps,
  })
}

fn next_order(step_order: &mut u32) -> u32 {
  let order = *step_order;
  *step_order += 1;
  order
}

fn sport_type(sport: SportType) -> Value {
  json!({
    "sportTypeId": sport.id(),
    "sportTypeKey": sport.key(),
    "displayOrder": sport.id(),
  })
}

fn step_type(role: StepRole) -> Value {
  json!({
    "stepTypeId": role.id(),
    "stepTypeKey": role.key(),
    "displayOrder": role.id(),
  })
}

/// ---------------------------------------------------------------------------
/// Estimates
/// ---------------------------------------------------------------------------

/// Total seconds of time-based steps, repeat groups multiplied out
pub fn estimated_duration(steps: &[WorkoutStep]) -> u64 {
  steps
    .iter()
    .map(|step| match step {
      WorkoutStep::Single(Step {
        condition: Condition::Duration { seconds },
        ..
      }) => *seconds,
      WorkoutStep::Single(_) => 0,
      WorkoutStep::Repeat(repeat) => {
        u64::from(repeat.iterations).saturating_mul(estimated_duration(&repeat.steps))
      }
    })
    .fold(0, u64::saturating_add)
}

/// Total meters of distance-based steps, repeat groups multiplied out
pub fn estimated_distance(steps: &[WorkoutStep]) -> f64 {
  steps
    .iter()
    .map(|step| match step {
      WorkoutStep::Single(Step {
        condition: Condition::Distance { meters, .. },
        ..
      }) => *meters,
      WorkoutStep::Single(_) => 0.0,
      WorkoutStep::Repeat(repeat) => f64::from(repeat.iterations) * estimated_distance(&repeat.steps),
    })
    .sum()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
