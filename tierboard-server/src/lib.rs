//! tierboard-server library
//!
//! HTTP service behind the tier list UI: stores uploaded images, persists the
//! snapshot of bucket contents, and serves the browser client.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tierboard_common::api::IMAGES_ROUTE;
use tierboard_common::config::{DataLayout, TomlConfig};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod store;

pub use error::{ApiError, ApiResult};
use store::{AssetStore, SnapshotGateway};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The persisted snapshot
    pub gateway: Arc<SnapshotGateway>,
    /// Uploaded images
    pub assets: Arc<AssetStore>,
    /// Largest accepted upload request body, in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create new application state
    pub fn new(gateway: SnapshotGateway, assets: AssetStore, max_upload_bytes: usize) -> Self {
        Self {
            gateway: Arc::new(gateway),
            assets: Arc::new(assets),
            max_upload_bytes,
        }
    }

    /// State for the files under `layout`, limits from `config`
    pub fn from_config(layout: &DataLayout, config: &TomlConfig) -> Self {
        Self::new(
            SnapshotGateway::new(&layout.state_file),
            AssetStore::new(&layout.images_dir, config.max_upload_files),
            config.max_upload_bytes,
        )
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let images = ServeDir::new(state.assets.dir());

    let routes = Router::new()
        .route("/state", get(api::get_state))
        .route("/save", post(api::save_state))
        .route(
            "/upload",
            post(api::upload_images).layer(DefaultBodyLimit::max(state.max_upload_bytes)),
        )
        .route("/delete", post(api::delete_image))
        .route("/reset-all", post(api::reset_all))
        .route("/reconcile", post(api::reconcile_now))
        .route("/build_info", get(api::get_build_info))
        .route("/health", get(api::health_check));

    let ui = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js));

    Router::new()
        .merge(routes)
        .merge(ui)
        .nest_service(IMAGES_ROUTE, images)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
