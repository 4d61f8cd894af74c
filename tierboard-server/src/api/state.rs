//! Snapshot endpoints
//!
//! `GET /state` returns the stored snapshot (or `{"_pool": []}` if nothing was
//! saved yet). `POST /save` overwrites it with the request body; there is no
//! merging with what was stored before.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tierboard_common::api::StatusResponse;
use tierboard_common::Snapshot;
use tracing::{debug, error};

use crate::error::ApiResult;
use crate::AppState;

/// GET /state
pub async fn get_state(State(state): State<AppState>) -> ApiResult<Json<Snapshot>> {
    let snapshot = state.gateway.load().await.map_err(|e| {
        error!("Error loading state: {}", e);
        e
    })?;
    Ok(Json(snapshot))
}

/// POST /save
pub async fn save_state(
    State(state): State<AppState>,
    body: Result<Json<Snapshot>, JsonRejection>,
) -> ApiResult<Json<StatusResponse>> {
    let Json(snapshot) = body?;
    let revision = state.gateway.save(&snapshot).await.map_err(|e| {
        error!("Error saving state: {}", e);
        e
    })?;
    debug!("State saved (revision {}, {} items)", revision, snapshot.len());
    Ok(Json(StatusResponse::ok("State saved successfully.")))
}
