//! Upstream failure classification.
//!
//! The classifier maps an [`UpstreamError`] to a [`FallbackInfo`] label. It
//! never decides whether to degrade; every label carries `fallback = true`
//! and the orchestrators fall back unconditionally.

use meetsync_domain::{FallbackCategory, FallbackInfo, UpstreamError};
use tracing::debug;

/// Classify an upstream failure.
///
/// Precedence: a missing provider action wins over any HTTP status, then the
/// status/code table applies, then everything else is generic.
pub fn classify(error: &UpstreamError) -> FallbackInfo {
    let info = if error.resource_not_found {
        FallbackInfo::new(
            FallbackCategory::ActionNotFound,
            "Calendar action not available - using fallback data",
        )
    } else {
        match (error.status, error.code.as_deref()) {
            (Some(401), _) => FallbackInfo::new(
                FallbackCategory::AuthFailed,
                "Authentication failed - using fallback data",
            ),
            (Some(403), _) => FallbackInfo::new(
                FallbackCategory::AccessForbidden,
                "Access forbidden - using fallback data",
            ),
            (Some(429), Some("insufficient_quota")) => FallbackInfo::new(
                FallbackCategory::QuotaExceeded,
                "API quota exceeded - using fallback data",
            ),
            (Some(429), Some("rate_limit_exceeded")) => FallbackInfo::new(
                FallbackCategory::RateLimitExceeded,
                "Rate limit exceeded - using fallback data",
            ),
            _ => FallbackInfo::new(
                FallbackCategory::GenericError,
                "Service temporarily unavailable - using fallback data",
            ),
        }
    };

    debug!(
        category = info.category.as_str(),
        status = ?error.status,
        code = ?error.code,
        error = %error.message,
        "classified upstream failure"
    );
    info
}
