//! Position model
//!
//! An ordered mapping from bucket name to the ordered identifiers it holds.
//! Every gesture in the UI is reduced to [`Snapshot::move_item`] (or a
//! directional move built on top of it) before anything is persisted.

pub mod bucket;
pub mod motion;
pub mod snapshot;

pub use bucket::Bucket;
pub use motion::{target_index, Direction, GridGeometry};
pub use snapshot::Snapshot;

/// Extract the identifier from an image path returned by the server
///
/// Upload responses carry `/images/<identifier>`; buckets store only the
/// identifier. Bare identifiers pass through unchanged.
pub fn identifier_from_path(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
