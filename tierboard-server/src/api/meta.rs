//! Liveness and build identification

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tierboard_common::api::HealthResponse;
use tracing::warn;

use crate::AppState;

const MODULE: &str = "tierboard-server";

/// Stamp recorded by build.rs
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
}

pub const BUILD: BuildInfo = BuildInfo {
    version: env!("CARGO_PKG_VERSION"),
    git_hash: env!("GIT_HASH"),
    build_timestamp: env!("BUILD_TIMESTAMP"),
    build_profile: env!("BUILD_PROFILE"),
};

impl BuildInfo {
    /// One-line startup banner
    pub fn banner(&self) -> String {
        format!(
            "{} v{} [{}] built {} ({})",
            MODULE, self.version, self.git_hash, self.build_timestamp, self.build_profile
        )
    }
}

/// GET /health
///
/// 503 with status `degraded` when the images directory is unreachable.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let reachable = match tokio::fs::metadata(state.assets.dir()).await {
        Ok(meta) => meta.is_dir(),
        Err(e) => {
            warn!("Images directory {} unavailable: {}", state.assets.dir().display(), e);
            false
        }
    };
    let (code, status) = if reachable {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            module: MODULE.to_string(),
            version: BUILD.version.to_string(),
        }),
    )
}

/// GET /build_info
pub async fn get_build_info() -> Json<BuildInfo> {
    Json(BUILD)
}
