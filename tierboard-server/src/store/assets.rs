//! Asset store
//!
//! Uploaded images live as flat files in one directory. Identifiers double as
//! file names and are minted here at upload time:
//!
//! `tierImage-<unix millis>-<random suffix><.ext>`
//!
//! The store knows nothing about buckets. Callers that delete an image are
//! responsible for removing it from the snapshot as well.

use rand::Rng;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tierboard_common::api::UPLOAD_FIELD;
use tierboard_common::{Error, Result};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

/// Collision retries before giving up on minting a fresh identifier
const MINT_ATTEMPTS: usize = 3;

/// One file received in an upload request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Name supplied by the browser; only its extension is kept
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// Result of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Nothing to delete; still a success
    AlreadyAbsent,
}

/// Result of clearing every stored image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub deleted: Vec<String>,
    pub failed: Vec<String>,
}

impl PurgeReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Directory of uploaded images
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
    max_batch: usize,
}

impl AssetStore {
    pub fn new(dir: impl Into<PathBuf>, max_batch: usize) -> Self {
        Self {
            dir: dir.into(),
            max_batch: max_batch.max(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Most files accepted by one [`AssetStore::store_batch`] call
    pub fn max_batch(&self) -> usize {
        self.max_batch
    }

    /// Fresh identifier preserving the extension of `original_name`
    pub fn mint_identifier(original_name: &str) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
        format!("{}-{}-{}{}", UPLOAD_FIELD, millis, suffix, extension_of(original_name))
    }

    /// Reject identifiers that could escape the images directory
    pub fn validate_identifier(id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(Error::InvalidInput("Filename not provided.".to_string()));
        }
        if id.contains("..") || id.contains('/') || id.contains('\\') || Path::new(id).is_absolute() {
            return Err(Error::InvalidInput("Invalid filename.".to_string()));
        }
        Ok(())
    }

    /// Path of the file backing `id`
    pub fn path_of(&self, id: &str) -> Result<PathBuf> {
        Self::validate_identifier(id)?;
        Ok(self.dir.join(id))
    }

    /// Persist one upload; returns its new identifier
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        for _ in 0..MINT_ATTEMPTS {
            let id = Self::mint_identifier(original_name);
            let path = self.dir.join(&id);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("Identifier collision on {}, minting another", id);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            file.write_all(bytes).await?;
            file.flush().await?;
            info!("Stored {} ({} bytes) from {:?}", id, bytes.len(), original_name);
            return Ok(id);
        }

        Err(Error::Internal(format!(
            "could not mint a unique identifier for {:?}",
            original_name
        )))
    }

    /// Persist up to [`AssetStore::max_batch`] uploads, in order
    pub async fn store_batch(&self, files: Vec<UploadedFile>) -> Result<Vec<String>> {
        if files.is_empty() {
            return Err(Error::InvalidInput("No files uploaded.".to_string()));
        }
        if files.len() > self.max_batch {
            return Err(Error::InvalidInput(format!(
                "Too many files: {} (at most {} per upload)",
                files.len(),
                self.max_batch
            )));
        }

        let mut ids = Vec::with_capacity(files.len());
        for file in files {
            ids.push(self.store(&file.original_name, &file.bytes).await?);
        }
        Ok(ids)
    }

    /// Remove the file backing `id`; an already-missing file counts as success
    pub async fn delete(&self, id: &str) -> Result<DeleteOutcome> {
        let path = self.path_of(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted image {}", id);
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Image {} already absent", id);
                Ok(DeleteOutcome::AlreadyAbsent)
            }
            Err(e) => {
                error!("Error deleting image {}: {}", path.display(), e);
                Err(e.into())
            }
        }
    }

    /// Identifiers of every stored file, sorted
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ids),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => ids.push(name),
                Err(name) => warn!("Skipping non-UTF-8 file name {:?}", name),
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Delete every directory entry, attempting each independently
    ///
    /// Entries that are not regular files cannot be deleted as images and
    /// are reported as failures, as are names that are not valid UTF-8.
    pub async fn purge(&self) -> Result<PurgeReport> {
        let mut report = PurgeReport::default();
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(report),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_file = match entry.file_type().await {
                Ok(kind) => kind.is_file(),
                Err(e) => {
                    error!("Cannot inspect {} during reset: {}", name, e);
                    report.failed.push(name);
                    continue;
                }
            };
            if !is_file {
                warn!("Not deleting {}: not a regular file", name);
                report.failed.push(name);
                continue;
            }

            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => report.deleted.push(name),
                Err(e) if e.kind() == ErrorKind::NotFound => report.deleted.push(name),
                Err(e) => {
                    error!("Error deleting {} during reset: {}", name, e);
                    report.failed.push(name);
                }
            }
        }
        report.deleted.sort();
        report.failed.sort();

        if report.is_complete() {
            info!("Purged {} images", report.deleted.len());
        } else {
            warn!(
                "Purged {} images, {} could not be deleted",
                report.deleted.len(),
                report.failed.len()
            );
        }
        Ok(report)
    }
}

/// `.ext` of `name` if it is a plain alphanumeric extension, else empty
fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 16 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}
