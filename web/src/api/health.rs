//! Health and readiness probes.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: &'static str,
}

/// Liveness probe; never touches the database.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Readiness probe: verifies the database answers.
///
/// # Errors
///
/// Returns 503 when the database cannot be reached.
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    sqlx::query("SELECT 1")
        .execute(&state.pool)
        .await
        .map_err(|e| AppError::unavailable(format!("database unreachable: {e}")))?;
    Ok(Json(HealthResponse { status: "ok" }))
}
