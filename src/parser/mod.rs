//! Workout notation parsers
//!
//! A parser turns a coach's shorthand (`15' zr + 2x (8' zm + 5' zr) + 10' zr`)
//! into a structured [`Workout`]. Parsers are pure and hold no state, so a
//! single static instance serves every request.

pub mod runfun;
pub mod tokenizer;

use crate::models::Workout;
use thiserror::Error;

pub use runfun::RunFunParser;

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
  #[error("The token {0} could not be recognized")]
  UnrecognizedToken(String),

  #[error("Unsupported unit: {0}")]
  UnsupportedUnit(String),

  #[error("Unknown heart rate zone: {0}")]
  UnknownHeartRateZone(String),

  #[error("Malformed repeat group: {0}")]
  MalformedRepeatGroup(String),
}

/// ---------------------------------------------------------------------------
/// Parser Interface
/// ---------------------------------------------------------------------------

pub trait WorkoutParser: Send + Sync {
  /// Name used to select this parser on the HTTP surface
  fn name(&self) -> &'static str;

  fn parse(&self, expression: &str) -> Result<Workout, ParseError>;
}

static PARSERS: &[&dyn WorkoutParser] = &[&RunFunParser];

/// Look up a registered parser by name, ignoring case
pub fn parser_for(name: &str) -> Option<&'static dyn WorkoutParser> {
  PARSERS
    .iter()
    .copied()
    .find(|parser| parser.name().eq_ignore_ascii_case(name))
}
