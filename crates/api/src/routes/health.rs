use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/ping", get(ping))
}

/// Full health check: verifies the message inbox is reachable.
async fn health_check(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state
        .inbox()
        .ping()
        .await
        .map_err(|e| ApiError::Internal(format!("inbox health check failed: {e}")))?;

    let version = state.content().read().await.document().version;

    Ok(Json(json!({
        "status": "ok",
        "inbox": "connected",
        "contentVersion": version,
        "subscribers": state.event_bus().subscriber_count(),
    })))
}

/// Lightweight ping, no backend checks.
async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
