use axum::{Json, body::Bytes, extract::State};
use sonar_core::{PullBody, PushPayload};
use tracing::{info, warn};

use super::error::ApiError;
use super::models::StatusResponse;
use crate::AppState;

// Current value of every channel
pub async fn pull(State(state): State<AppState>) -> Json<PullBody> {
    let snapshot = state.store.snapshot().await;
    Json(PullBody::from(&snapshot))
}

// Merge readings pushed by the relay node
pub async fn push(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, ApiError> {
    let payload = PushPayload::parse(&body).map_err(|e| {
        warn!(error = %e, "Rejected push");
        ApiError::from(e)
    })?;

    let written = state.store.apply_push(&payload).await;
    info!(written, ?payload, "Push accepted");

    Ok(Json(StatusResponse::accepted("Data updated")))
}

pub async fn health() -> &'static str {
    "OK"
}
