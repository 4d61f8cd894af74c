//! HTTP client for the tierboard server

use super::SnapshotStore;
use crate::api::{DeleteRequest, UploadResponse, UPLOAD_FIELD};
use crate::model::Snapshot;
use crate::Result;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

/// Talks to a running tierboard server
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    /// `base_url` like `http://127.0.0.1:3000`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Upload images; each entry is `(original file name, bytes)`
    pub async fn upload(&self, files: Vec<(String, Vec<u8>)>) -> Result<UploadResponse> {
        let form = files.into_iter().fold(Form::new(), |form, (name, bytes)| {
            form.part(UPLOAD_FIELD, Part::bytes(bytes).file_name(name))
        });

        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;
        let body: UploadResponse = response.json().await?;
        debug!("Uploaded {} images", body.file_paths.len());
        Ok(body)
    }

    /// Delete one stored image (idempotent on the server)
    pub async fn delete(&self, identifier: &str) -> Result<()> {
        self.client
            .post(self.url("/delete"))
            .json(&DeleteRequest::new(identifier))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Clear the snapshot and every stored image
    pub async fn reset_all(&self) -> Result<()> {
        self.client
            .post(self.url("/reset-all"))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for HttpStore {
    async fn load(&self) -> Result<Snapshot> {
        let snapshot = self
            .client
            .get(self.url("/state"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(snapshot)
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.client
            .post(self.url("/save"))
            .json(snapshot)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
