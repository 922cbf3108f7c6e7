//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for MeetSync
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SyncError {
    #[error("Not connected: {0}")]
    Unauthenticated(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for MeetSync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Structured failure reported by an upstream service (calendar provider or
/// LLM).
///
/// Carried as a value rather than propagated through `Result`, so the
/// classifier can label it and the orchestrators can degrade instead of
/// failing the request.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct UpstreamError {
    /// HTTP status code, when the failure came from an HTTP response.
    pub status: Option<u16>,
    /// Provider-specific error code (e.g. `insufficient_quota`).
    pub code: Option<String>,
    /// Set when the provider reported the requested action does not exist.
    pub resource_not_found: bool,
    pub message: String,
}

impl UpstreamError {
    /// Failure derived from an HTTP error status.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self { status: Some(status), message: message.into(), ..Self::default() }
    }

    /// Attach a provider error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Failure indicating the requested provider action does not exist.
    pub fn action_missing(message: impl Into<String>) -> Self {
        Self { resource_not_found: true, message: message.into(), ..Self::default() }
    }

    /// Transport-level failure with no HTTP status.
    pub fn network(message: impl Into<String>) -> Self {
        Self { message: message.into(), ..Self::default() }
    }
}

/// Label assigned to an upstream failure by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackCategory {
    ActionNotFound,
    AuthFailed,
    AccessForbidden,
    QuotaExceeded,
    RateLimitExceeded,
    GenericError,
}

impl FallbackCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ActionNotFound => "action_not_found",
            Self::AuthFailed => "auth_failed",
            Self::AccessForbidden => "access_forbidden",
            Self::QuotaExceeded => "quota_exceeded",
            Self::RateLimitExceeded => "rate_limit_exceeded",
            Self::GenericError => "generic_error",
        }
    }
}

/// Classification attached to a degraded response.
///
/// Every category carries `fallback = true`: the classifier labels failures,
/// the call sites decide to degrade unconditionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackInfo {
    #[serde(rename = "type")]
    pub category: FallbackCategory,
    pub message: String,
    pub fallback: bool,
}

impl FallbackInfo {
    pub fn new(category: FallbackCategory, message: impl Into<String>) -> Self {
        Self { category, message: message.into(), fallback: true }
    }
}
