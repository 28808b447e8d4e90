//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Mock Garmin collaborators
//! - Workout fixtures
//! - Helper assertions

use crate::garmin::{
  GarminAuthorization, GarminError, TokenAuthenticator, WorkoutService,
};
use crate::models::{Condition, RepeatedStep, Step, Target, Workout, WorkoutStep};
use crate::parser::{RunFunParser, WorkoutParser};
use crate::state::AppState;
use crate::zones::HeartRateZone;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use std::sync::{Arc, Mutex};

/// ---------------------------------------------------------------------------
/// Workout Fixtures
/// ---------------------------------------------------------------------------

/// Parse an expression with the default notation, panicking on error
pub fn parse_workout(expression: &str) -> Workout {
  RunFunParser
    .parse(expression)
    .unwrap_or_else(|e| panic!("Failed to parse {:?}: {}", expression, e))
}

pub fn single(step: &WorkoutStep) -> &Step {
  step
    .as_step()
    .unwrap_or_else(|| panic!("Expected a single step, got {:?}", step))
}

pub fn repeat(step: &WorkoutStep) -> &RepeatedStep {
  step
    .as_repeat()
    .unwrap_or_else(|| panic!("Expected a repeat group, got {:?}", step))
}

/// Assert a step runs for `seconds` with the bpm target of `zone`
pub fn assert_duration(step: &Step, seconds: u64, zone: HeartRateZone) {
  assert_eq!(step.condition, Condition::Duration { seconds });
  assert_eq!(step.target, Target::heart_rate(zone));
}

/// ---------------------------------------------------------------------------
/// Garmin Mocks
/// ---------------------------------------------------------------------------

/// A fresh one-hour token with a session cookie
pub fn mock_authorization() -> GarminAuthorization {
  let mut auth = GarminAuthorization::new("test-token", 3600);
  auth.cookies = vec![("SESSIONID".to_string(), "abc".to_string())];
  auth
}

/// Records every call and answers with a fixed workout id
pub struct MockWorkoutService {
  workout_id: Option<i64>,
  failure: Mutex<Option<GarminError>>,
  created: Mutex<Vec<Workout>>,
  scheduled: Mutex<Vec<(i64, NaiveDate)>>,
}

impl Default for MockWorkoutService {
  fn default() -> Self {
    Self::returning(1)
  }
}

impl MockWorkoutService {
  pub fn returning(workout_id: i64) -> Self {
    Self {
      workout_id: Some(workout_id),
      failure: Mutex::new(None),
      created: Mutex::new(Vec::new()),
      scheduled: Mutex::new(Vec::new()),
    }
  }

  /// Fail the next creation with `error`
  pub fn failing(error: GarminError) -> Self {
    let service = Self::default();
    *service.failure.lock().unwrap() = Some(error);
    service
  }

  pub fn created(&self) -> Vec<Workout> {
    self.created.lock().unwrap().clone()
  }

  pub fn scheduled(&self) -> Vec<(i64, NaiveDate)> {
    self.scheduled.lock().unwrap().clone()
  }
}

#[async_trait]
impl WorkoutService for MockWorkoutService {
  async fn create_workout(
    &self,
    _auth: &GarminAuthorization,
    workout: &Workout,
  ) -> Result<i64, GarminError> {
    if let Some(error) = self.failure.lock().unwrap().take() {
      return Err(error);
    }
    self.created.lock().unwrap().push(workout.clone());
    self.workout_id.ok_or(GarminError::MissingWorkoutId)
  }

  async fn schedule_workout(
    &self,
    _auth: &GarminAuthorization,
    workout_id: i64,
    date: NaiveDate,
  ) -> Result<(), GarminError> {
    self.scheduled.lock().unwrap().push((workout_id, date));
    Ok(())
  }
}

/// Handler state with a valid token and the given service
pub fn mock_state(service: MockWorkoutService) -> (AppState, Arc<MockWorkoutService>) {
  let service = Arc::new(service);
  let state = AppState::new(
    Arc::new(TokenAuthenticator::new(mock_authorization())),
    service.clone(),
  );
  (state, service)
}

/// Handler state whose token expired an hour ago
pub fn expired_state(service: MockWorkoutService) -> (AppState, Arc<MockWorkoutService>) {
  let mut authorization = mock_authorization();
  authorization.logged_in = Utc::now() - Duration::hours(2);

  let service = Arc::new(service);
  let state = AppState::new(Arc::new(TokenAuthenticator::new(authorization)), service.clone());
  (state, service)
}

/// ---------------------------------------------------------------------------
/// HTTP Helpers
/// ---------------------------------------------------------------------------

pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .expect("Failed to read response body");
  serde_json::from_slice(&bytes).expect("Response body is not JSON")
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two distances (or any f64s) agree within a tolerance, default 1e-9
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr) => {
    $crate::assert_approx_eq!($left, $right, 1e-9)
  };
  ($left:expr, $right:expr, $tolerance:expr) => {{
    let (left, right): (f64, f64) = ($left, $right);
    let diff = (left - right).abs();
    assert!(
      diff < $tolerance,
      "{} is not within {} of {} (diff: {})",
      left,
      $tolerance,
      right,
      diff
    );
  }};
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mock_authorization_is_fresh() {
    let auth = mock_authorization();
    assert!(!auth.is_token_expired());
    assert_eq!(auth.cookie_header().as_deref(), Some("SESSIONID=abc"));
  }

  #[tokio::test]
  async fn test_mock_service_records_calls() {
    let service = MockWorkoutService::returning(9);
    let workout = parse_workout("50' zr");
    let auth = mock_authorization();

    assert_eq!(service.create_workout(&auth, &workout).await.unwrap(), 9);
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    service.schedule_workout(&auth, 9, date).await.unwrap();

    assert_eq!(service.created(), vec![workout]);
    assert_eq!(service.scheduled(), vec![(9, date)]);
  }

  #[tokio::test]
  async fn test_failing_service_fails_once() {
    let service = MockWorkoutService::failing(GarminError::TokenExpired);
    let workout = parse_workout("50' zr");
    let auth = mock_authorization();

    assert!(service.create_workout(&auth, &workout).await.is_err());
    assert!(service.create_workout(&auth, &workout).await.is_ok());
  }

  #[test]
  fn test_assert_approx_eq_macro() {
    assert_approx_eq!(1.0, 1.0001, 0.001);
    assert_approx_eq!(0.1 + 0.2, 0.3);
  }

  #[test]
  #[should_panic(expected = "is not within")]
  fn test_assert_approx_eq_rejects_distant_values() {
    assert_approx_eq!(400.0, 40.0);
  }
}
