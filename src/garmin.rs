//! Garmin Connect collaborators
//!
//! Two seams: an [`Authenticator`] that hands out a bearer token with its
//! session cookies, and a [`WorkoutService`] that creates and schedules
//! workouts. The login handshake itself is out of scope; tokens are issued
//! elsewhere and supplied through configuration.

use crate::models::Workout;
use crate::serializer::serialize_workout;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::env;
use url::Url;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const DEFAULT_CONNECT_URL: &str = "https://connect.garmin.com";
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;
const DI_BACKEND: &str = "connectapi.garmin.com";
const ORIGIN: &str = "https://connect.garmin.com";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
  (KHTML, like Gecko) Chrome/128.0.0.0 Safari/537.36";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum GarminError {
  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Garmin API error: {0}")]
  Api(String),

  #[error("Not authenticated with Garmin Connect")]
  NotAuthenticated,

  #[error("Garmin token expired")]
  TokenExpired,

  #[error("Workout ID not found in the response")]
  MissingWorkoutId,

  #[error("Workout schedule ID not found in the response")]
  MissingScheduleId,
}

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GarminConfig {
  pub connect_url: String,
  pub access_token: String,
  pub expires_in: i64,
  pub refresh_token: Option<String>,
  pub session_cookies: Vec<(String, String)>,
}

impl GarminConfig {
  pub fn from_env() -> Result<Self, GarminError> {
    let connect_url = env::var("GARMIN_CONNECT_URL").unwrap_or_else(|_| DEFAULT_CONNECT_URL.into());
    Url::parse(&connect_url)
      .map_err(|e| GarminError::InvalidConfig(format!("GARMIN_CONNECT_URL: {}", e)))?;

    let expires_in = match env::var("GARMIN_TOKEN_EXPIRES_IN") {
      Ok(raw) => raw
        .trim()
        .parse()
        .map_err(|_| GarminError::InvalidConfig(format!("GARMIN_TOKEN_EXPIRES_IN: {}", raw)))?,
      Err(_) => DEFAULT_TOKEN_LIFETIME_SECS,
    };

    Ok(Self {
      connect_url,
      access_token: env::var("GARMIN_ACCESS_TOKEN")
        .map_err(|_| GarminError::MissingConfig("GARMIN_ACCESS_TOKEN".into()))?,
      expires_in,
      refresh_token: env::var("GARMIN_REFRESH_TOKEN").ok(),
      session_cookies: env::var("GARMIN_SESSION_COOKIES")
        .map(|raw| parse_cookies(&raw))
        .unwrap_or_default(),
    })
  }
}

/// Parse `name=value; name=value` pairs, skipping anything without a name
pub fn parse_cookies(raw: &str) -> Vec<(String, String)> {
  raw
    .split(';')
    .filter_map(|pair| {
      let (name, value) = pair.split_once('=')?;
      let name = name.trim();
      if name.is_empty() {
        return None;
      }
      Some((name.to_string(), value.trim().to_string()))
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Authorization
/// ---------------------------------------------------------------------------

/// Bearer token plus session cookies, stamped with the time it was issued
#[derive(Debug, Clone)]
pub struct GarminAuthorization {
  pub token: String,
  pub expires_in: i64,
  pub refresh_token: Option<String>,
  pub cookies: Vec<(String, String)>,
  pub logged_in: DateTime<Utc>,
}

impl GarminAuthorization {
  pub fn new(token: impl Into<String>, expires_in: i64) -> Self {
    Self {
      token: token.into(),
      expires_in,
      refresh_token: None,
      cookies: Vec::new(),
      logged_in: Utc::now(),
    }
  }

  pub fn is_token_expired(&self) -> bool {
    self.is_token_expired_at(Utc::now())
  }

  pub fn is_token_expired_at(&self, now: DateTime<Utc>) -> bool {
    Duration::try_seconds(self.expires_in)
      .and_then(|lifetime| self.logged_in.checked_add_signed(lifetime))
      .map_or(false, |expiry| expiry < now)
  }

  pub fn cookie_header(&self) -> Option<String> {
    if self.cookies.is_empty() {
      return None;
    }
    Some(
      self
        .cookies
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; "),
    )
  }
}

#[async_trait]
pub trait Authenticator: Send + Sync {
  async fn authorize(&self) -> Result<GarminAuthorization, GarminError>;
}

/// Serves a token issued out of band until it expires
pub struct TokenAuthenticator {
  authorization: GarminAuthorization,
}

impl TokenAuthenticator {
  pub fn new(authorization: GarminAuthorization) -> Self {
    Self { authorization }
  }

  pub fn from_config(config: &GarminConfig) -> Self {
    let mut authorization = GarminAuthorization::new(config.access_token.clone(), config.expires_in);
    authorization.refresh_token = config.refresh_token.clone();
    authorization.cookies = config.session_cookies.clone();
    Self::new(authorization)
  }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
  async fn authorize(&self) -> Result<GarminAuthorization, GarminError> {
    if self.authorization.is_token_expired() {
      tracing::warn!(
        logged_in = %self.authorization.logged_in,
        expires_in = self.authorization.expires_in,
        "Configured Garmin token has expired"
      );
      return Err(GarminError::TokenExpired);
    }
    Ok(self.authorization.clone())
  }
}

/// ---------------------------------------------------------------------------
/// Workout Service
/// ---------------------------------------------------------------------------

#[async_trait]
pub trait WorkoutService: Send + Sync {
  /// Create the workout and return the id Garmin assigned to it
  async fn create_workout(
    &self,
    auth: &GarminAuthorization,
    workout: &Workout,
  ) -> Result<i64, GarminError>;

  async fn schedule_workout(
    &self,
    auth: &GarminAuthorization,
    workout_id: i64,
    date: NaiveDate,
  ) -> Result<(), GarminError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateWorkoutResponse {
  workout_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleWorkoutResponse {
  workout_schedule_id: Option<i64>,
}

pub struct GarminConnectClient {
  client: Client,
  base_url: String,
}

impl GarminConnectClient {
  pub fn new(base_url: &str) -> Self {
    Self {
      client: Client::new(),
      base_url: base_url.trim_end_matches('/').to_string(),
    }
  }

  fn authorized(&self, request: RequestBuilder, auth: &GarminAuthorization) -> RequestBuilder {
    let request = request
      .bearer_auth(&auth.token)
      .header("Di-Backend", DI_BACKEND)
      .header(header::ORIGIN, ORIGIN)
      .header(header::USER_AGENT, USER_AGENT)
      .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
      .header(header::ACCEPT, "application/json, text/plain, */*");

    match auth.cookie_header() {
      Some(cookies) => request.header(header::COOKIE, cookies),
      None => request,
    }
  }
}

async fn check_status(response: reqwest::Response, action: &str) -> Result<reqwest::Response, GarminError> {
  let status = response.status();
  if status == StatusCode::UNAUTHORIZED {
    return Err(GarminError::NotAuthenticated);
  }
  if !status.is_success() {
    let error_text = response.text().await.unwrap_or_default();
    return Err(GarminError::Api(format!(
      "{} failed with {}: {}",
      action, status, error_text
    )));
  }
  Ok(response)
}

#[async_trait]
impl WorkoutService for GarminConnectClient {
  async fn create_workout(
    &self,
    auth: &GarminAuthorization,
    workout: &Workout,
  ) -> Result<i64, GarminError> {
    let url = format!("{}/workout-service/workout", self.base_url);
    let payload = serialize_workout(workout);

    let response = self
      .authorized(self.client.post(&url), auth)
      .json(&payload)
      .send()
      .await?;
    let response = check_status(response, "Workout creation").await?;

    let body: CreateWorkoutResponse = response.json().await?;
    let workout_id = body.workout_id.ok_or(GarminError::MissingWorkoutId)?;

    tracing::info!(workout_id, name = %workout.name, "Created Garmin workout");
    Ok(workout_id)
  }

  async fn schedule_workout(
    &self,
    auth: &GarminAuthorization,
    workout_id: i64,
    date: NaiveDate,
  ) -> Result<(), GarminError> {
    let url = format!("{}/workout-service/schedule/{}", self.base_url, workout_id);
    let payload = serde_json::json!({ "date": date.format("%Y-%m-%d").to_string() });

    let response = self
      .authorized(self.client.post(&url), auth)
      .json(&payload)
      .send()
      .await?;
    let response = check_status(response, "Workout scheduling").await?;

    let body: ScheduleWorkoutResponse = response.json().await?;
    let schedule_id = body
      .workout_schedule_id
      .ok_or(GarminError::MissingScheduleId)?;

    tracing::info!(workout_id, schedule_id, %date, "Scheduled Garmin workout");
    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
