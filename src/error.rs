//! Request-level errors and their HTTP mapping

use crate::garmin::GarminError;
use crate::parser::ParseError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error("Parser type '{0}' is not supported")]
  InvalidParser(String),

  #[error("Invalid workout format: {0}")]
  InvalidWorkout(#[from] ParseError),

  #[error(transparent)]
  Garmin(#[from] GarminError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
  error: &'static str,
  message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  detail: Option<String>,
}

impl AppError {
  pub fn status(&self) -> StatusCode {
    match self {
      AppError::InvalidParser(_) | AppError::InvalidWorkout(_) => StatusCode::BAD_REQUEST,
      AppError::Garmin(err) if is_service_failure(err) => StatusCode::SERVICE_UNAVAILABLE,
      AppError::Garmin(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  pub fn code(&self) -> &'static str {
    match self {
      AppError::InvalidParser(_) => "invalid_parser",
      AppError::InvalidWorkout(_) => "invalid_workout",
      AppError::Garmin(err) if is_service_failure(err) => "garmin_service_error",
      AppError::Garmin(_) => "internal_error",
    }
  }

  fn body(&self) -> ErrorBody {
    match self {
      AppError::InvalidParser(_) | AppError::InvalidWorkout(_) => ErrorBody {
        error: self.code(),
        message: self.to_string(),
        detail: None,
      },
      AppError::Garmin(err) if is_service_failure(err) => ErrorBody {
        error: self.code(),
        message: "Unable to create workout in Garmin Connect".into(),
        detail: Some(err.to_string()),
      },
      AppError::Garmin(err) => ErrorBody {
        error: self.code(),
        message: "An unexpected error occurred while processing the request".into(),
        detail: Some(err.to_string()),
      },
    }
  }
}

/// Failures on Garmin's side of the exchange, as opposed to our own setup
fn is_service_failure(err: &GarminError) -> bool {
  matches!(
    err,
    GarminError::MissingWorkoutId
      | GarminError::MissingScheduleId
      | GarminError::TokenExpired
      | GarminError::NotAuthenticated
      | GarminError::Api(_)
  )
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, code = self.code(), "Request failed");
    } else {
      tracing::warn!(error = %self, code = self.code(), "Rejected request");
    }
    (status, Json(self.body())).into_response()
  }
}
