//! Server configuration loaded from the environment

use crate::garmin::{GarminConfig, GarminError};
use std::env;
use std::net::SocketAddr;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost", "http://localhost:8000"];

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid configuration: {0}")]
  Invalid(String),

  #[error(transparent)]
  Garmin(#[from] GarminError),
}

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub bind_addr: SocketAddr,
  pub allowed_origins: Vec<String>,
  pub garmin: GarminConfig,
}

impl AppConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    let raw_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());
    let bind_addr = raw_addr
      .parse()
      .map_err(|_| ConfigError::Invalid(format!("BIND_ADDR: {}", raw_addr)))?;

    let allowed_origins = match env::var("ALLOWED_ORIGINS") {
      Ok(raw) => parse_origins(&raw),
      Err(_) => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
    };

    Ok(Self {
      bind_addr,
      allowed_origins,
      garmin: GarminConfig::from_env()?,
    })
  }
}

fn parse_origins(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|origin| !origin.is_empty())
    .map(String::from)
    .collect()
}
