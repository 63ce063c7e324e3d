use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::domain::EstablishmentResponse;
use crate::error::Result;
use crate::intake::Submission;
use crate::AppState;

pub async fn receive(
    State(state): State<Arc<AppState>>,
    submission: Submission,
) -> Result<impl IntoResponse> {
    let establishment = state.pipeline.ingest(submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(EstablishmentResponse::from(establishment)),
    ))
}
