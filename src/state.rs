use crate::config::AppConfig;
use crate::garmin::{Authenticator, GarminConnectClient, TokenAuthenticator, WorkoutService};
use std::sync::Arc;

/// Shared handler state: who signs requests and where workouts go
#[derive(Clone)]
pub struct AppState {
  pub authenticator: Arc<dyn Authenticator>,
  pub workouts: Arc<dyn WorkoutService>,
}

impl AppState {
  pub fn new(authenticator: Arc<dyn Authenticator>, workouts: Arc<dyn WorkoutService>) -> Self {
    Self {
      authenticator,
      workouts,
    }
  }

  pub fn from_config(config: &AppConfig) -> Self {
    Self::new(
      Arc::new(TokenAuthenticator::from_config(&config.garmin)),
      Arc::new(GarminConnectClient::new(&config.garmin.connect_url)),
    )
  }
}
