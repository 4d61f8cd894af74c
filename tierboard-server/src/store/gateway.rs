//! Persistence gateway
//!
//! Serializes the whole snapshot to one JSON file and restores it. Writes go
//! to a temporary sibling that is then renamed over the real file, and are
//! serialized by a mutex so overlapping requests cannot interleave. The last
//! writer wins; every successful write bumps an in-memory revision counter.

use async_trait::async_trait;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tierboard_common::sync::SnapshotStore;
use tierboard_common::{Error, Result, Snapshot};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Owner of the durable snapshot
#[derive(Debug)]
pub struct SnapshotGateway {
    path: PathBuf,
    write_lock: Mutex<()>,
    revision: AtomicU64,
}

impl SnapshotGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            revision: AtomicU64::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes completed since startup
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Stored snapshot, or the empty snapshot if nothing was saved yet
    pub async fn load(&self) -> Result<Snapshot> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No snapshot at {}, returning empty state", self.path.display());
                Ok(Snapshot::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the stored snapshot; returns the new revision
    pub async fn save(&self, snapshot: &Snapshot) -> Result<u64> {
        let _guard = self.write_lock.lock().await;
        self.write(snapshot).await
    }

    /// Replace the stored snapshot with the empty one
    pub async fn reset(&self) -> Result<u64> {
        info!("Clearing snapshot at {}", self.path.display());
        self.save(&Snapshot::default()).await
    }

    /// Load, modify and store under the write lock
    ///
    /// `f` returns its result and whether it changed the snapshot; unchanged
    /// snapshots are not rewritten.
    pub async fn update<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Snapshot) -> (T, bool),
    {
        self.update_with(async { Ok::<(), Error>(()) }, |snapshot, ()| f(snapshot))
            .await
    }

    /// Like [`SnapshotGateway::update`], with an input gathered under the lock
    ///
    /// `prepare` is awaited only once the write lock is held, so no save can
    /// land between reading the input and writing the result.
    pub async fn update_with<P, Fut, F, T>(&self, prepare: Fut, f: F) -> Result<T>
    where
        Fut: Future<Output = Result<P>>,
        F: FnOnce(&mut Snapshot, P) -> (T, bool),
    {
        let _guard = self.write_lock.lock().await;
        let input = prepare.await?;
        let mut snapshot = self.load().await?;
        let (result, changed) = f(&mut snapshot, input);
        if changed {
            self.write(&snapshot).await?;
        }
        Ok(result)
    }

    async fn write(&self, snapshot: &Snapshot) -> Result<u64> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Saved snapshot revision {} ({} items)", revision, snapshot.len());
        Ok(revision)
    }
}

#[async_trait]
impl SnapshotStore for SnapshotGateway {
    async fn load(&self) -> Result<Snapshot> {
        SnapshotGateway::load(self).await
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        SnapshotGateway::save(self, snapshot).await.map(|_| ())
    }
}
