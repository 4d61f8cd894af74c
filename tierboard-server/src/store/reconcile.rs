//! Reconciliation between stored images and the snapshot
//!
//! The two can drift: an upload whose follow-up save failed leaves a file no
//! bucket references (an orphan), and a hand-edited or stale snapshot can
//! reference files that no longer exist (dangling). Applying a reconciliation
//! appends orphans to the pool tail and drops dangling entries.

use super::{AssetStore, SnapshotGateway};
use std::collections::HashSet;
use tierboard_common::{Result, Snapshot};
use tracing::{info, warn};

/// Differences between the image directory and the snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Stored, but in no bucket
    pub orphans: Vec<String>,
    /// In a bucket, but not stored
    pub dangling: Vec<String>,
}

impl Reconciliation {
    /// Compare `snapshot` against the identifiers actually stored
    pub fn compute(snapshot: &Snapshot, stored: &[String]) -> Self {
        let stored_set: HashSet<&str> = stored.iter().map(String::as_str).collect();
        let referenced: HashSet<&str> = snapshot.identifiers().collect();

        let orphans = stored
            .iter()
            .filter(|id| !referenced.contains(id.as_str()))
            .cloned()
            .collect();
        let dangling = snapshot
            .identifiers()
            .filter(|id| !stored_set.contains(id))
            .map(String::from)
            .collect();

        Self { orphans, dangling }
    }

    pub fn is_clean(&self) -> bool {
        self.orphans.is_empty() && self.dangling.is_empty()
    }

    /// Fix `snapshot` in place; returns whether anything changed
    pub fn apply(&self, snapshot: &mut Snapshot) -> bool {
        let removed = self
            .dangling
            .iter()
            .filter(|id| snapshot.remove(id).is_some())
            .count();
        let added = snapshot.add_to_pool(self.orphans.iter().cloned());
        removed + added > 0
    }
}

/// Compare the stored snapshot with the image directory, optionally fixing it
///
/// The directory listing, the comparison and any rewrite all happen under the
/// gateway's write lock, so a concurrent save cannot be undone by a stale
/// listing.
pub async fn reconcile(
    gateway: &SnapshotGateway,
    assets: &AssetStore,
    apply: bool,
) -> Result<Reconciliation> {
    let (report, images) = gateway
        .update_with(assets.list(), |snapshot, stored| {
            let report = Reconciliation::compute(snapshot, &stored);
            let changed = apply && report.apply(snapshot);
            ((report, stored.len()), changed)
        })
        .await?;

    if report.is_clean() {
        info!("Snapshot and image directory agree ({} images)", images);
    } else {
        warn!(
            "{} orphaned images, {} dangling entries{}",
            report.orphans.len(),
            report.dangling.len(),
            if apply { " (fixed)" } else { "" }
        );
    }
    Ok(report)
}
