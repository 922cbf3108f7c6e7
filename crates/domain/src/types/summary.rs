//! Meeting summary types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::FallbackInfo;

/// Persisted summary row. At most one per `(meeting_id, user_id)`, immutable
/// once written: later requests are served from this record without
/// regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    pub meeting_id: String,
    pub user_id: String,
    pub summary_text: String,
    pub is_mock: bool,
    pub created_at: DateTime<Utc>,
}

/// Text returned by the LLM provider together with its token usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmCompletion {
    pub text: String,
    pub tokens_used: u32,
}

/// Response body for the summarize endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPayload {
    pub summary: String,
    pub is_mock: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FallbackInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SummaryPayload {
    /// Summary generated by the LLM provider.
    pub fn generated(text: impl Into<String>, tokens_used: u32) -> Self {
        Self {
            summary: text.into(),
            is_mock: false,
            cached: false,
            tokens_used: Some(tokens_used),
            error: None,
            message: None,
        }
    }

    /// Synthetic summary (no LLM configured, or the call failed).
    pub fn mock(text: impl Into<String>) -> Self {
        Self {
            summary: text.into(),
            is_mock: true,
            cached: false,
            tokens_used: None,
            error: None,
            message: None,
        }
    }

    /// Summary served from a persisted record.
    pub fn from_record(record: &SummaryRecord) -> Self {
        Self {
            summary: record.summary_text.clone(),
            is_mock: record.is_mock,
            cached: true,
            tokens_used: None,
            error: None,
            message: None,
        }
    }

    /// Attach the classification of the failure that forced the fallback.
    pub fn with_error(mut self, info: FallbackInfo) -> Self {
        self.message = Some(info.message.clone());
        self.error = Some(info);
        self
    }
}
