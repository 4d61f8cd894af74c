//! Reset and reconciliation endpoints

use axum::{extract::State, Json};
use tierboard_common::api::{ReconcileResponse, StatusResponse};
use tracing::{error, info};

use crate::error::{ApiError, ApiResult};
use crate::store::reconcile;
use crate::AppState;

/// POST /reset-all
///
/// Clears the snapshot first, then deletes every stored image. Each file is
/// attempted independently; any failures are listed in a 500 response, but
/// the reset is not rolled back.
pub async fn reset_all(State(state): State<AppState>) -> ApiResult<Json<StatusResponse>> {
    state.gateway.reset().await.map_err(|e| {
        error!("Error clearing state file: {}", e);
        e
    })?;

    let report = state.assets.purge().await.map_err(|e| {
        error!("Error reading images directory for reset: {}", e);
        e
    })?;

    if !report.is_complete() {
        return Err(ApiError::PartialReset(report.failed));
    }

    info!("All images and state have been reset");
    let message = if report.deleted.is_empty() {
        "Reset complete. No files to delete."
    } else {
        "Reset complete."
    };
    Ok(Json(StatusResponse::ok(message)))
}

/// POST /reconcile
///
/// Appends orphaned images to the pool and drops entries whose image is gone.
pub async fn reconcile_now(State(state): State<AppState>) -> ApiResult<Json<ReconcileResponse>> {
    let report = reconcile(&state.gateway, &state.assets, true).await?;
    let applied = !report.is_clean();
    Ok(Json(ReconcileResponse {
        orphans: report.orphans,
        dangling: report.dangling,
        applied,
    }))
}
