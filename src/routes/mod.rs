//! HTTP routes

pub mod workout;

use crate::state::AppState;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
  let api = Router::new()
    .route("/health", get(health))
    .route(
      "/v1/workout/parse/create",
      post(workout::parse_and_create_workout),
    );

  Router::new()
    .nest("/api", api)
    .layer(cors_layer(allowed_origins))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
  let origins: Vec<HeaderValue> = allowed_origins
    .iter()
    .filter_map(|origin| match HeaderValue::from_str(origin) {
      Ok(value) => Some(value),
      Err(_) => {
        tracing::warn!(%origin, "Ignoring invalid CORS origin");
        None
      }
    })
    .collect();

  CorsLayer::new()
    .allow_origin(AllowOrigin::list(origins))
    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
    .allow_credentials(true)
}

async fn health() -> Json<Value> {
  Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
