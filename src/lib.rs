pub mod config;
pub mod error;
pub mod garmin;
pub mod logging;
pub mod models;
pub mod parser;
pub mod routes;
pub mod serializer;
pub mod state;
pub mod zones;

#[cfg(test)]
mod test_utils;

use config::AppConfig;
use logging::LoggingConfig;
use state::AppState;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  LoggingConfig::from_env().init()?;

  let config = AppConfig::from_env()?;
  let state = AppState::from_config(&config);
  let app = routes::router(state, &config.allowed_origins);

  let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
  tracing::info!(addr = %config.bind_addr, garmin = %config.garmin.connect_url, "Server listening");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  tracing::info!("Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "Failed to listen for shutdown signal");
  }
}
