//! RunFun notation
//!
//! ```text
//! 10' zr + 5x (400m ze + 1' zr) + 15' zr
//! ```
//!
//! Three token shapes are understood:
//! - `N'zone`: N minutes in a heart-rate zone
//! - `D(km|m)`: a distance, optionally followed by `ritmo de prova Dkm`
//!   (race pace) and a zone
//! - `Nx(...)`: the `+`-separated body repeated N times
//!
//! Step roles come from position: the first top-level step warms up, the
//! last cools down; inside a repeat group the last step is the recovery.

use super::tokenizer::{normalize_zones, split_sequence, tokenize};
use super::{ParseError, WorkoutParser};
use crate::models::{
  Condition, DistanceUnit, RepeatedStep, Step, StepRole, Target, Workout, WorkoutStep,
};
use crate::zones::HeartRateZone;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// ---------------------------------------------------------------------------
/// Token Shapes
/// ---------------------------------------------------------------------------

static REPEAT_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\d+x\(").unwrap());

static REPEAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)^(\d+)x\((.*)\)$").unwrap());

// mi and yd are lexed so they can be rejected as units rather than as garbage
static DISTANCE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(
    r"(?i)^(\d+(?:,\d+)?)(km|mi|m|yd)(?:ritmodeprova(\d+(?:,\d+)?)(km|mi|m|yd))?(?:'([a-z]+))?$",
  )
  .unwrap()
});

static DURATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(\d+)'([a-z]+)$").unwrap());

/// Deepest repeat group accepted; anything below it is malformed
pub const MAX_REPEAT_DEPTH: usize = 32;

/// ---------------------------------------------------------------------------
/// Parser
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct RunFunParser;

impl WorkoutParser for RunFunParser {
  fn name(&self) -> &'static str {
    "runfun"
  }

  fn parse(&self, expression: &str) -> Result<Workout, ParseError> {
    let normalized = normalize_zones(expression);
    let tokens = tokenize(&normalized);
    tracing::debug!(tokens = ?tokens, "Tokenized workout expression");

    let mut workout = Workout::new(normalized.to_string());
    for step in parse_sequence(&tokens, 0)? {
      workout.add_step(step);
    }

    Ok(workout)
  }
}

/// Parse a sequence found `depth` repeat groups deep (0 is the top level)
fn parse_sequence<S: AsRef<str>>(tokens: &[S], depth: usize) -> Result<Vec<WorkoutStep>, ParseError> {
  let total = tokens.len();
  tokens
    .iter()
    .enumerate()
    .map(|(position, token)| {
      let role = step_role(position, total, depth > 0);
      parse_token(token.as_ref(), role, depth)
    })
    .collect()
}

/// Role of the step at `position` in a sequence of `total` steps.
///
/// Position 0 is checked first, so a one-step sequence is a warm-up at the
/// top level and an interval inside a repeat group.
pub fn step_role(position: usize, total: usize, nested: bool) -> StepRole {
  let last = total.saturating_sub(1);
  match (nested, position) {
    (false, 0) => StepRole::WarmUp,
    (true, 0) => StepRole::Interval,
    (false, p) if p == last => StepRole::CoolDown,
    (true, p) if p == last => StepRole::Recovery,
    _ => StepRole::Interval,
  }
}

fn parse_token(token: &str, role: StepRole, depth: usize) -> Result<WorkoutStep, ParseError> {
  if REPEAT_PREFIX.is_match(token) {
    return expand_repeat(token, depth + 1).map(WorkoutStep::from);
  }
  if let Some(caps) = DISTANCE.captures(token) {
    return distance_step(token, &caps, role).map(WorkoutStep::from);
  }
  if let Some(caps) = DURATION.captures(token) {
    return duration_step(token, &caps, role).map(WorkoutStep::from);
  }
  Err(ParseError::UnrecognizedToken(token.to_string()))
}

/// ---------------------------------------------------------------------------
/// Step Builders
/// ---------------------------------------------------------------------------

fn distance_step(token: &str, caps: &Captures<'_>, role: StepRole) -> Result<Step, ParseError> {
  let amount = &caps[1];
  let unit_text = &caps[2];
  let unit: DistanceUnit = unit_text.parse().map_err(ParseError::UnsupportedUnit)?;

  let race_pace = match (caps.get(3), caps.get(4)) {
    (Some(pace), Some(pace_unit)) => {
      let pace_unit: DistanceUnit = pace_unit.as_str().parse().map_err(ParseError::UnsupportedUnit)?;
      Some(format!("{}{}", pace.as_str(), pace_unit.symbol()))
    }
    _ => None,
  };

  let target = match caps.get(5) {
    Some(zone) => resolve_zone(zone.as_str())?,
    None => Target::None,
  };

  let meters = distance_in_meters(amount, unit)
    .ok_or_else(|| ParseError::UnrecognizedToken(token.to_string()))?;

  let mut description = format!("Run {} {}", amount, unit.symbol());
  if let Some(pace) = &race_pace {
    description.push_str(&format!(" at {} race pace", pace));
  }
  if let Some(zone) = caps.get(5) {
    description.push_str(&format!(" in {} zone", zone.as_str()));
  }

  Ok(Step {
    name: format!("{}{}", amount, unit_text),
    description,
    role,
    condition: Condition::Distance { meters, unit },
    target,
  })
}

fn duration_step(token: &str, caps: &Captures<'_>, role: StepRole) -> Result<Step, ParseError> {
  let unrecognized = || ParseError::UnrecognizedToken(token.to_string());

  let minutes: u64 = caps[1].parse().map_err(|_| unrecognized())?;
  if minutes == 0 {
    return Err(unrecognized());
  }
  let condition = Condition::minutes(minutes).ok_or_else(unrecognized)?;

  let zone = &caps[2];
  let target = resolve_zone(zone)?;

  Ok(Step {
    name: format!("{}' {}", minutes, zone),
    description: format!("Run for {} minutes in {} zone", minutes, zone),
    role,
    condition,
    target,
  })
}

fn expand_repeat(token: &str, depth: usize) -> Result<RepeatedStep, ParseError> {
  let malformed = || ParseError::MalformedRepeatGroup(token.to_string());

  if depth > MAX_REPEAT_DEPTH {
    tracing::warn!(depth, "Repeat groups nested too deeply");
    return Err(malformed());
  }

  let caps = REPEAT.captures(token).ok_or_else(malformed)?;
  let iterations: u32 = caps[1]
    .parse()
    .ok()
    .filter(|count| *count > 0)
    .ok_or_else(malformed)?;

  let inner = split_sequence(caps.get(2).map_or("", |body| body.as_str()));
  if inner.is_empty() {
    return Err(malformed());
  }

  Ok(RepeatedStep {
    iterations,
    steps: parse_sequence(&inner, depth)?,
  })
}

fn resolve_zone(code: &str) -> Result<Target, ParseError> {
  code
    .parse::<HeartRateZone>()
    .map(Target::heart_rate)
    .map_err(ParseError::UnknownHeartRateZone)
}

/// ---------------------------------------------------------------------------
/// Distance Arithmetic
/// ---------------------------------------------------------------------------

/// Convert a notation amount (comma as decimal point) to meters.
///
/// Kilometers scale by 1000. A meter amount is read as thousandths of a
/// kilometer: `400m` is 0.400 km.
fn distance_in_meters(amount: &str, unit: DistanceUnit) -> Option<f64> {
  let (whole, fraction) = amount.split_once(',').unwrap_or((amount, ""));
  let meters = match unit {
    DistanceUnit::Kilometers => {
      let whole: f64 = whole.parse().ok()?;
      whole * 1000.0 + thousandths(fraction)?
    }
    DistanceUnit::Meters => thousandths(&format!("{}{}", whole, fraction))?,
  };
  Some(meters).filter(|meters| meters.is_finite())
}

/// Meters in `0.<digits>` km, scaled by exact powers of ten
fn thousandths(digits: &str) -> Option<f64> {
  if digits.is_empty() {
    return Some(0.0);
  }
  let value: f64 = digits.parse().ok()?;
  let places = i32::try_from(digits.len()).ok()?;
  if places <= 3 {
    Some(value * 10f64.powi(3 - places))
  } else {
    Some(value / 10f64.powi(places - 3))
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::*;

  fn parse(expression: &str) -> Result<Workout, ParseError> {
    RunFunParser.parse(expression)
  }

  #[test]
  fn test_parse_simple_duration() {
    let workout = parse("50' zr").unwrap();

    assert_eq!(workout.steps.len(), 1);
    let step = single(&workout.steps[0]);
    assert_eq!(step.condition, Condition::Duration { seconds: 3000 });
    assert_eq!(step.target, Target::heart_rate(HeartRateZone::ZR));
    assert_eq!(step.target.values(), Some((157, 167)));
  }

  #[test]
  fn test_parse_with_repetitions() {
    let workout = parse("15' zr + 2x (8' zm + 5' zr) + 10' zr").unwrap();

    assert_eq!(workout.steps.len(), 3);

    let warm_up = single(&workout.steps[0]);
    assert_duration(warm_up, 900, HeartRateZone::ZR);
    assert_eq!(warm_up.role, StepRole::WarmUp);

    let repeat = repeat(&workout.steps[1]);
    assert_eq!(repeat.iterations, 2);
    assert_eq!(repeat.steps.len(), 2);
    assert_eq!(repeat.role(), StepRole::Repeat);

    let work = single(&repeat.steps[0]);
    assert_duration(work, 480, HeartRateZone::ZM);
    assert_eq!(work.role, StepRole::Interval);

    let rest = single(&repeat.steps[1]);
    assert_duration(rest, 300, HeartRateZone::ZR);
    assert_eq!(rest.role, StepRole::Recovery);

    let cool_down = single(&workout.steps[2]);
    assert_duration(cool_down, 600, HeartRateZone::ZR);
    assert_eq!(cool_down.role, StepRole::CoolDown);
  }

  #[test]
  fn test_parse_with_distance_and_race_pace() {
    let workout = parse("20' zr + 1,5km ritmo de prova 5km + 10' zr").unwrap();

    assert_eq!(workout.steps.len(), 3);
    assert_duration(single(&workout.steps[0]), 1200, HeartRateZone::ZR);

    let distance = single(&workout.steps[1]);
    assert_eq!(
      distance.condition,
      Condition::Distance {
        meters: 1500.0,
        unit: DistanceUnit::Kilometers
      }
    );
    assert_eq!(distance.target, Target::None);
    assert_eq!(distance.role, StepRole::Interval);
    assert_eq!(distance.description, "Run 1,5 km at 5km race pace");

    assert_duration(single(&workout.steps[2]), 600, HeartRateZone::ZR);
  }

  #[test]
  fn test_parse_repeat_with_distance_and_zone() {
    let workout = parse("10' zr + 5x (400m ze + 1' zr) + 15' zr").unwrap();

    let repeat = repeat(&workout.steps[1]);
    assert_eq!(repeat.iterations, 5);
    assert_eq!(repeat.steps.len(), 2);

    let effort = single(&repeat.steps[0]);
    assert_eq!(effort.condition.value(), 400.0);
    assert_eq!(effort.target, Target::heart_rate(HeartRateZone::ZE));
    assert_eq!(effort.role, StepRole::Interval);

    assert_duration(single(&repeat.steps[1]), 60, HeartRateZone::ZR);
  }

  #[test]
  fn test_unknown_zone_inside_repeat() {
    let result = parse("10' zr + 5x (400m ze + 1' ra) + 15' zr");
    assert_eq!(result, Err(ParseError::UnknownHeartRateZone("ra".into())));
  }

  #[test]
  fn test_unknown_zone_at_top_level() {
    assert_eq!(
      parse("10' zx"),
      Err(ParseError::UnknownHeartRateZone("zx".into()))
    );
  }

  #[test]
  fn test_unrecognized_token() {
    assert_eq!(
      parse("10minutes"),
      Err(ParseError::UnrecognizedToken("10minutes".into()))
    );
  }

  #[test]
  fn test_zero_minutes_is_unrecognized() {
    assert_eq!(
      parse("0' zr"),
      Err(ParseError::UnrecognizedToken("0'zr".into()))
    );
  }

  #[test]
  fn test_unsupported_units() {
    assert_eq!(parse("3mi"), Err(ParseError::UnsupportedUnit("mi".into())));
    assert_eq!(
      parse("1km ritmo de prova 10yd"),
      Err(ParseError::UnsupportedUnit("yd".into()))
    );
  }

  #[test]
  fn test_malformed_repeat_groups() {
    assert_eq!(
      parse("5x(400m ze"),
      Err(ParseError::MalformedRepeatGroup("5x(400m'ze".into()))
    );
    assert_eq!(
      parse("0x(1' zr)"),
      Err(ParseError::MalformedRepeatGroup("0x(1'zr)".into()))
    );
    assert_eq!(
      parse("3x()"),
      Err(ParseError::MalformedRepeatGroup("3x()".into()))
    );
  }

  #[test]
  fn test_distances() {
    let km = |s: &str| distance_in_meters(s, DistanceUnit::Kilometers);
    let m = |s: &str| distance_in_meters(s, DistanceUnit::Meters);

    for (amount, meters) in [("1,5", 1500.0), ("2", 2000.0), ("0,4", 400.0), ("10,25", 10250.0)] {
      crate::assert_approx_eq!(km(amount).unwrap(), meters);
    }
    for (amount, meters) in [("400", 400.0), ("800", 800.0), ("1200", 120.0)] {
      crate::assert_approx_eq!(m(amount).unwrap(), meters);
    }
  }

  #[test]
  fn test_oversized_distances_are_rejected() {
    let meters = format!("{}m", "9".repeat(400));
    assert_eq!(parse(&meters), Err(ParseError::UnrecognizedToken(meters.clone())));

    let kilometers = format!("{}km", "9".repeat(320));
    assert_eq!(
      parse(&kilometers),
      Err(ParseError::UnrecognizedToken(kilometers.clone()))
    );
  }

  #[test]
  fn test_repeat_nesting_limit() {
    let nested = |depth: usize| format!("{}1' zr{}", "1x(".repeat(depth), ")".repeat(depth));

    let workout = parse(&nested(MAX_REPEAT_DEPTH)).unwrap();
    assert_eq!(workout.steps.len(), 1);

    assert!(matches!(
      parse(&nested(MAX_REPEAT_DEPTH + 1)),
      Err(ParseError::MalformedRepeatGroup(_))
    ));
    assert!(matches!(
      parse(&nested(5000)),
      Err(ParseError::MalformedRepeatGroup(_))
    ));
  }

  #[test]
  fn test_parse_distance_units() {
    let workout = parse("2km + 400m + 1,5km").unwrap();
    let values: Vec<f64> = workout
      .steps
      .iter()
      .map(|step| single(step).condition.value())
      .collect();
    assert_eq!(values.len(), 3);
    for (value, expected) in values.into_iter().zip([2000.0, 400.0, 1500.0]) {
      crate::assert_approx_eq!(value, expected);
    }
  }

  #[test]
  fn test_single_step_takes_first_position_role() {
    assert_eq!(step_role(0, 1, false), StepRole::WarmUp);
    assert_eq!(step_role(0, 1, true), StepRole::Interval);

    let workout = parse("3x(1' zt)").unwrap();
    let inner = single(&repeat(&workout.steps[0]).steps[0]);
    assert_eq!(inner.role, StepRole::Interval);
  }

  #[test]
  fn test_step_roles() {
    let top: Vec<StepRole> = (0..4).map(|p| step_role(p, 4, false)).collect();
    assert_eq!(
      top,
      vec![
        StepRole::WarmUp,
        StepRole::Interval,
        StepRole::Interval,
        StepRole::CoolDown
      ]
    );

    let nested: Vec<StepRole> = (0..3).map(|p| step_role(p, 3, true)).collect();
    assert_eq!(
      nested,
      vec![StepRole::Interval, StepRole::Interval, StepRole::Recovery]
    );
  }

  #[test]
  fn test_nested_repeat_groups() {
    let workout = parse("10' zr + 2x (3x (1' zt + 1' zr) + 5' zr) + 10' zr").unwrap();

    let outer = repeat(&workout.steps[1]);
    assert_eq!(outer.iterations, 2);
    assert_eq!(outer.steps.len(), 2);

    let inner = repeat(&outer.steps[0]);
    assert_eq!(inner.iterations, 3);
    assert_eq!(single(&inner.steps[0]).role, StepRole::Interval);
    assert_eq!(single(&inner.steps[1]).role, StepRole::Recovery);
    assert_eq!(single(&outer.steps[1]).role, StepRole::Recovery);
  }

  #[test]
  fn test_workout_name_is_normalized_expression() {
    let workout = parse("15 zr + 2x (8' zm + 5' zr)").unwrap();
    assert_eq!(workout.name, "15 'zr + 2x (8 'zm + 5 'zr)");
  }

  #[test]
  fn test_zone_codes_are_case_insensitive() {
    let workout = parse("10' ZR + 5' Zm").unwrap();
    assert_duration(single(&workout.steps[0]), 600, HeartRateZone::ZR);
    assert_duration(single(&workout.steps[1]), 300, HeartRateZone::ZM);
  }

  #[test]
  fn test_empty_expression_yields_empty_workout() {
    let workout = parse("  ").unwrap();
    assert!(workout.steps.is_empty());
  }
}
