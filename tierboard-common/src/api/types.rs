//! Shared API request/response types

use serde::{Deserialize, Serialize};

/// Multipart field carrying uploaded images
pub const UPLOAD_FIELD: &str = "tierImage";

/// URL prefix under which stored images are served
pub const IMAGES_ROUTE: &str = "/images";

/// Response to `POST /upload`
///
/// Each path is `/images/<identifier>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "filePaths")]
    pub file_paths: Vec<String>,
}

/// Body of `POST /delete`
///
/// `filename` is optional on the wire so that a missing field is reported as
/// a validation failure rather than a body parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub filename: Option<String>,
}

impl DeleteRequest {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
        }
    }
}

/// Generic success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: Some(message.into()),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// Response to `POST /reconcile`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileResponse {
    /// Stored images no bucket referenced (now appended to the pool)
    pub orphans: Vec<String>,
    /// Bucket entries without a stored image (now removed)
    pub dangling: Vec<String>,
    /// Whether the snapshot was rewritten
    pub applied: bool,
}

/// Error body for every failed request
///
/// ```json
/// {"error": {"code": "BAD_REQUEST", "message": "Invalid filename."}}
/// ```
///
/// A partial reset also lists the files it could not delete next to the
/// error: `{"error": {...}, "failed": ["a.png"]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
