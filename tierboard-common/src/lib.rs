//! # Tierboard Common Library
//!
//! Shared code for the tierboard server and its clients:
//! - Position model (buckets, snapshots, move primitive)
//! - Input session (selection, drag-and-drop, delete staging)
//! - Board controller tying gestures to model mutations
//! - Snapshot persistence seam and ordered save queue
//! - API request/response types
//! - Configuration loading

pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod sync;

pub use board::Board;
pub use error::{Error, Result};
pub use model::{Bucket, Direction, GridGeometry, Snapshot};
pub use session::{InteractionMode, Session};
