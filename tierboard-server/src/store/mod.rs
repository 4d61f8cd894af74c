//! Server-side storage
//!
//! - [`SnapshotGateway`]: the single persisted snapshot (`data/state.json`)
//! - [`AssetStore`]: uploaded image files (`images/`)
//! - [`reconcile`]: bring the two back in line when they drift apart

pub mod assets;
pub mod gateway;
pub mod reconcile;

pub use assets::{AssetStore, DeleteOutcome, PurgeReport, UploadedFile};
pub use gateway::SnapshotGateway;
pub use reconcile::{reconcile, Reconciliation};
