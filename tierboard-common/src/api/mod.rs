//! Shared HTTP API types
//!
//! Request and response bodies exchanged between the tierboard server and
//! its clients. No HTTP framework dependencies live here.

pub mod types;

pub use types::{
    DeleteRequest, ErrorBody, ErrorDetail, HealthResponse, ReconcileResponse, StatusResponse,
    UploadResponse, IMAGES_ROUTE, UPLOAD_FIELD,
};
