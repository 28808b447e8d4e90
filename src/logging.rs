//! Structured logging setup
//!
//! `RUST_LOG` picks the filter (default `info`) and `LOG_FORMAT` the output:
//! `json`, `compact`, or anything else for the human-readable format.

use std::env;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Json,
  Pretty,
  Compact,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
  pub level: String,
  pub format: LogFormat,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: "info".into(),
      format: LogFormat::Pretty,
    }
  }
}

impl LoggingConfig {
  pub fn from_env() -> Self {
    let format = match env::var("LOG_FORMAT").as_deref() {
      Ok("json") => LogFormat::Json,
      Ok("compact") => LogFormat::Compact,
      _ => LogFormat::Pretty,
    };

    Self {
      level: env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
      format,
    }
  }

  fn env_filter(&self) -> EnvFilter {
    EnvFilter::try_new(&self.level)
      .unwrap_or_else(|_| EnvFilter::new("info"))
      .add_directive(
        "hyper=warn"
          .parse()
          .unwrap_or_else(|_| tracing::Level::WARN.into()),
      )
      .add_directive(
        "reqwest=warn"
          .parse()
          .unwrap_or_else(|_| tracing::Level::WARN.into()),
      )
  }

  /// Install the global subscriber. Fails if one is already set.
  pub fn init(&self) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(self.env_filter());

    match self.format {
      LogFormat::Json => registry.with(fmt::layer().json().with_target(true)).try_init()?,
      LogFormat::Compact => registry.with(fmt::layer().compact().with_target(false)).try_init()?,
      LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init()?,
    }

    tracing::info!(
      service.version = env!("CARGO_PKG_VERSION"),
      log.level = %self.level,
      log.format = ?self.format,
      "Logging initialized"
    );
    Ok(())
  }
}
