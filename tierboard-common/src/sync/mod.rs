//! Snapshot persistence from the client side
//!
//! The board is the source of truth; the server copy is a best-effort mirror.
//! [`SaveQueue`] pushes every submitted snapshot to a [`SnapshotStore`] on a
//! single background task, so saves from one session never overlap or land
//! out of order. The caller is never blocked and failures are only reported.

pub mod http;

pub use http::HttpStore;

use crate::model::Snapshot;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Durable home of the snapshot
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Stored snapshot, or the empty snapshot if none exists yet
    async fn load(&self) -> Result<Snapshot>;

    /// Overwrite the stored snapshot
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

/// Result of the most recent save attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing saved yet
    Idle,
    Saved,
    Failed(String),
}

/// Progress of a [`SaveQueue`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    /// Generation of the last processed snapshot (0 before the first)
    pub generation: u64,
    pub outcome: SaveOutcome,
}

impl SyncStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, SaveOutcome::Failed(_))
    }
}

/// Ordered, fire-and-forget snapshot writer
pub struct SaveQueue {
    tx: mpsc::UnboundedSender<(u64, Snapshot)>,
    status: watch::Receiver<SyncStatus>,
    next_generation: AtomicU64,
    worker: JoinHandle<()>,
}

impl SaveQueue {
    /// Start the writer task on the current tokio runtime
    pub fn spawn(store: Arc<dyn SnapshotStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<(u64, Snapshot)>();
        let (status_tx, status) = watch::channel(SyncStatus {
            generation: 0,
            outcome: SaveOutcome::Idle,
        });

        let worker = tokio::spawn(async move {
            while let Some((generation, snapshot)) = rx.recv().await {
                let outcome = match store.save(&snapshot).await {
                    Ok(()) => {
                        debug!("Saved snapshot generation {} ({} items)", generation, snapshot.len());
                        SaveOutcome::Saved
                    }
                    Err(e) => {
                        warn!("Could not save snapshot generation {}: {}", generation, e);
                        SaveOutcome::Failed(e.to_string())
                    }
                };
                status_tx.send_replace(SyncStatus { generation, outcome });
            }
            debug!("Save queue drained");
        });

        Self {
            tx,
            status,
            next_generation: AtomicU64::new(1),
            worker,
        }
    }

    /// Queue `snapshot` for saving; returns its generation
    pub fn submit(&self, snapshot: Snapshot) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        if self.tx.send((generation, snapshot)).is_err() {
            warn!("Save queue worker has stopped; snapshot generation {} dropped", generation);
        }
        generation
    }

    /// Watch save results as they complete
    pub fn status(&self) -> watch::Receiver<SyncStatus> {
        self.status.clone()
    }

    /// Stop accepting snapshots, wait for queued saves, return the final status
    pub async fn flush(self) -> Result<SyncStatus> {
        let SaveQueue {
            tx, status, worker, ..
        } = self;
        drop(tx);
        worker
            .await
            .map_err(|e| Error::Internal(format!("save queue worker failed: {}", e)))?;
        let last = status.borrow().clone();
        Ok(last)
    }
}
