use crate::error::AppError;
use crate::parser::parser_for;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ParserQuery {
  #[serde(default)]
  pub workout_parser: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkoutRequest {
  pub workout_expr: String,
  #[serde(default)]
  pub workout_schedule: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct CreateWorkoutResponse {
  pub workout_id: i64,
  pub scheduled: bool,
}

/// Parse a workout expression, create it in Garmin Connect and optionally
/// put it on the calendar.
///
/// `POST /api/v1/workout/parse/create?workout_parser=runfun`
///
/// Nothing reaches Garmin unless the expression parses.
pub async fn parse_and_create_workout(
  State(state): State<AppState>,
  Query(query): Query<ParserQuery>,
  Json(request): Json<CreateWorkoutRequest>,
) -> Result<(StatusCode, Json<CreateWorkoutResponse>), AppError> {
  let name = query.workout_parser.unwrap_or_default();
  let parser = parser_for(&name).ok_or(AppError::InvalidParser(name))?;
  let workout = parser.parse(&request.workout_expr)?;

  tracing::info!(
    parser = parser.name(),
    name = %workout.name,
    steps = workout.steps.len(),
    "Parsed workout"
  );

  let auth = state.authenticator.authorize().await?;
  let workout_id = state.workouts.create_workout(&auth, &workout).await?;

  let scheduled = match request.workout_schedule {
    Some(date) => {
      state.workouts.schedule_workout(&auth, workout_id, date).await?;
      true
    }
    None => false,
  };

  Ok((
    StatusCode::CREATED,
    Json(CreateWorkoutResponse {
      workout_id,
      scheduled,
    }),
  ))
}
