//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use core_kernel::HealthCheckResult;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<HealthCheckResult>,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: None,
    })
}

/// Readiness check (includes the record store)
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let store = state.store.health_check().await;
    let (status, label) = if store.is_available() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            store: Some(store),
        }),
    )
}
