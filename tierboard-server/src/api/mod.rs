//! HTTP API handlers for tierboard-server

pub mod assets;
pub mod maintenance;
pub mod meta;
pub mod state;
pub mod ui;

pub use assets::{delete_image, upload_images};
pub use maintenance::{reconcile_now, reset_all};
pub use meta::{get_build_info, health_check, BUILD};
pub use state::{get_state, save_state};
pub use ui::{serve_app_js, serve_index};
