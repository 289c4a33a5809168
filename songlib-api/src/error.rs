//! HTTP error responses
//!
//! Every failure is rendered as `{"error": <code>, "message": <text>}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::enrichment::EnrichmentError;
use crate::pagination::PaginationError;
use crate::service::ServiceError;

/// Message returned instead of raw storage error text
const STORAGE_FAILURE_MESSAGE: &str = "database operation failed";

/// Client-facing text for a failed lookup; upstream bodies stay in the logs
fn upstream_message(err: &EnrichmentError) -> String {
    match err {
        EnrichmentError::Status(code, _) => {
            format!("song-info lookup failed: upstream returned status {}", code)
        }
        EnrichmentError::Network(_) => "song-info lookup failed: upstream unreachable".to_string(),
        EnrichmentError::Parse(_) => {
            "song-info lookup failed: invalid upstream response".to_string()
        }
        EnrichmentError::Config(_) => "song-info lookup failed".to_string(),
    }
}

/// Error envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable code, e.g. `not_found`
    pub error: String,
    pub message: String,
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed path, query or body (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(err) => match err {
                ServiceError::Validation(_)
                | ServiceError::OffsetOutOfRange(_)
                | ServiceError::NoFieldsToUpdate
                | ServiceError::InvalidDateFormat(_) => StatusCode::BAD_REQUEST,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Upstream(_) => StatusCode::BAD_GATEWAY,
                ServiceError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "validation_error",
            ApiError::Service(err) => match err {
                ServiceError::Validation(_) => "validation_error",
                ServiceError::NotFound(_) => "not_found",
                ServiceError::OffsetOutOfRange(_) => "offset_out_of_range",
                ServiceError::NoFieldsToUpdate => "no_fields_to_update",
                ServiceError::InvalidDateFormat(_) => "invalid_date_format",
                ServiceError::Upstream(_) => "upstream_error",
                ServiceError::Storage { .. } => "storage_error",
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Service(ServiceError::Storage { .. }) => STORAGE_FAILURE_MESSAGE.to_string(),
            ApiError::Service(ServiceError::Upstream(err)) => upstream_message(err),
            ApiError::Service(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: self.error_code().to_string(),
            message: self.message(),
        });

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
