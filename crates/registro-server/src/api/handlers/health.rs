use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::error::{AppError, Result};
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

impl HealthResponse {
    fn new(status: &'static str) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Liveness: the process is up and serving.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::new("ok"))
}

/// Readiness: the registry database answers a trivial query.
pub async fn ready(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>> {
    sqlx::query("SELECT 1")
        .execute(&state.db)
        .await
        .map_err(|err| {
            error!(error = %err, "registry database unreachable");
            AppError::Unavailable("registry database unreachable".into())
        })?;

    Ok(Json(HealthResponse::new("ready")))
}
