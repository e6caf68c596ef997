//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::cache::{CacheError, DeltaError};
use crate::flags::FlagStoreError;
use crate::vendor::VendorError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Vendor API operation failed.
    #[error("Vendor error: {0}")]
    Vendor(#[from] VendorError),

    /// Product cache operation failed.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Inventory delta batch failed.
    #[error("Delta error: {0}")]
    Delta(#[from] DeltaError),

    /// Flag store operation failed.
    #[error("Flag store error: {0}")]
    Flags(#[from] FlagStoreError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Vendor(_) => StatusCode::BAD_GATEWAY,
            Self::Cache(err) => cache_status(err),
            Self::Delta(err) => match err {
                DeltaError::EmptyBatch => StatusCode::BAD_REQUEST,
                DeltaError::Cache(cache) => cache_status(cache),
                DeltaError::Vendor(_) => StatusCode::BAD_GATEWAY,
            },
            Self::Flags(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Vendor(_) | Self::Delta(DeltaError::Vendor(_)) => {
                "Vendor platform error".to_string()
            }
            Self::Cache(CacheError::NoData) | Self::Delta(DeltaError::Cache(CacheError::NoData)) => {
                "No product data available yet".to_string()
            }
            Self::Cache(_) | Self::Delta(DeltaError::Cache(_)) => {
                "Vendor platform error".to_string()
            }
            Self::Flags(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Delta(DeltaError::EmptyBatch) | Self::BadRequest(_) => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl AppError {
    /// Whether this error is the server's fault (and worth a Sentry event)
    /// rather than bad client input.
    fn is_server_error(&self) -> bool {
        !matches!(
            self,
            Self::BadRequest(_) | Self::Delta(DeltaError::EmptyBatch)
        )
    }
}

const fn cache_status(err: &CacheError) -> StatusCode {
    match err {
        // Degraded reads serve stale data; only total absence surfaces,
        // and it means the vendor has never been reachable.
        CacheError::NoData => StatusCode::SERVICE_UNAVAILABLE,
        CacheError::Vendor(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("cart is empty".to_string());
        assert_eq!(err.to_string(), "Bad request: cart is empty");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Cache(CacheError::NoData)),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::Delta(DeltaError::EmptyBatch)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Vendor(VendorError::RateLimited(5))),
            StatusCode::BAD_GATEWAY
        );
    }
}
