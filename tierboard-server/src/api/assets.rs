//! Image upload and delete endpoints
//!
//! Neither endpoint touches the snapshot: the client places new uploads in
//! the pool, removes deleted ones from their bucket, and saves.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use tierboard_common::api::{DeleteRequest, StatusResponse, UploadResponse, IMAGES_ROUTE, UPLOAD_FIELD};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::store::{DeleteOutcome, UploadedFile};
use crate::AppState;

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(err.body_text())
    }
}

/// POST /upload
///
/// Multipart body with one or more `tierImage` file fields.
pub async fn upload_images(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadResponse>> {
    let mut multipart = multipart?;
    let max = state.assets.max_batch();
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }
        if files.len() == max {
            return Err(ApiError::BadRequest(format!(
                "Too many files (at most {} per upload).",
                max
            )));
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        files.push(UploadedFile {
            original_name,
            bytes: bytes.to_vec(),
        });
    }

    let ids = state.assets.store_batch(files).await?;
    info!("Uploaded {} images", ids.len());

    Ok(Json(UploadResponse {
        file_paths: ids
            .iter()
            .map(|id| format!("{}/{}", IMAGES_ROUTE, id))
            .collect(),
    }))
}

/// POST /delete
///
/// Body `{"filename": "<identifier>"}`. A `/images/` prefix is accepted.
/// Deleting an image that does not exist succeeds.
pub async fn delete_image(
    State(state): State<AppState>,
    body: Result<Json<DeleteRequest>, JsonRejection>,
) -> ApiResult<Json<StatusResponse>> {
    let Json(request) = body?;
    let filename = request
        .filename
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Filename not provided.".to_string()))?;

    let prefix = format!("{}/", IMAGES_ROUTE);
    let id = filename.strip_prefix(prefix.as_str()).unwrap_or(filename);

    let message = match state.assets.delete(id).await? {
        DeleteOutcome::Deleted => "File deleted successfully.",
        DeleteOutcome::AlreadyAbsent => "File already deleted.",
    };
    Ok(Json(StatusResponse::ok(message)))
}
