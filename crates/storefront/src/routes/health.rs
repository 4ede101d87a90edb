//! Health check route handlers.

use axum::{extract::State, http::StatusCode};
use serde_json::json;

use crate::state::AppState;

/// Liveness check.
pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(json!({ "status": "ok" }))
}

/// Readiness check. Verifies the database answers a trivial query.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, axum::Json<serde_json::Value>) {
    match sqlx::query("SELECT 1").execute(state.pool()).await {
        Ok(_) => (StatusCode::OK, axum::Json(json!({ "status": "ready" }))),
        Err(e) => {
            tracing::error!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                axum::Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
