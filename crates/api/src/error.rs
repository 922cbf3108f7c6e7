//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use meetsync_domain::SyncError;

/// Wrapper turning a [`SyncError`] into an HTTP response.
///
/// Most pipeline failures never reach this: the orchestrators degrade to
/// data. What does reach it is authentication state and request validation.
pub struct ApiError(pub SyncError);

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SyncError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            SyncError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SyncError::NotFound(_) => StatusCode::NOT_FOUND,
            SyncError::Auth(_) => StatusCode::FORBIDDEN,
            SyncError::Database(_)
            | SyncError::Config(_)
            | SyncError::Network(_)
            | SyncError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
