//! Port traits implemented by the infrastructure layer.
//!
//! Services in this crate hold trait objects only; swapping an adapter (or
//! running without one, in degraded mode) never touches orchestration code.

use async_trait::async_trait;

use meetsync_domain::{
    AnalyticsEvent, AuthorizationRequest, CachedMeetings, ConnectionRecord, EventQuery,
    LlmCompletion, MeetingKind, RawEvent, Result, SummaryRecord, UpstreamError, UserProfile,
    WatchSubscription,
};

/// Calendar provider integration.
///
/// `execute` returns [`UpstreamError`] as data rather than a [`SyncError`]:
/// the fetch orchestrator treats individual action failures as cascade input,
/// not as request failures.
///
/// [`SyncError`]: meetsync_domain::SyncError
#[async_trait]
pub trait CalendarActions: Send + Sync {
    /// Run a named provider action for the given entity.
    async fn execute(
        &self,
        entity_id: &str,
        action: &str,
        query: &EventQuery,
    ) -> std::result::Result<Vec<RawEvent>, UpstreamError>;

    /// Ask the provider for an OAuth authorization URL for the entity.
    async fn create_auth_url(
        &self,
        entity_id: &str,
        redirect_url: &str,
    ) -> Result<AuthorizationRequest>;

    /// Hand the OAuth authorization code back to the provider.
    async fn complete_auth(
        &self,
        entity_id: &str,
        code: &str,
        connection_id: Option<&str>,
    ) -> Result<()>;

    /// Register a named watch action delivering calendar changes to
    /// `webhook_url`. Failures are cascade input, like `execute`.
    async fn create_watch(
        &self,
        entity_id: &str,
        action: &str,
        webhook_url: &str,
        user_id: &str,
    ) -> std::result::Result<WatchSubscription, UpstreamError>;

    /// Check the provider still knows the entity.
    async fn verify_entity(&self, entity_id: &str) -> std::result::Result<(), UpstreamError>;
}

/// LLM completion provider.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> std::result::Result<LlmCompletion, UpstreamError>;
}

/// Durable storage for user/provider bindings.
#[async_trait]
pub trait ConnectionStore: Send + Sync {
    /// Active connection for the user, if any.
    async fn get_connection(&self, user_id: &str) -> Result<Option<ConnectionRecord>>;

    /// Create or refresh the user row.
    async fn upsert_user(&self, user_id: &str, profile: &UserProfile, entity_id: &str)
        -> Result<()>;

    /// Create or replace the connection row for `(user_id, app_name)`.
    async fn save_connection(&self, record: &ConnectionRecord) -> Result<()>;
}

/// Durable storage for cached meeting lists.
#[async_trait]
pub trait MeetingCacheStore: Send + Sync {
    async fn get_entry(&self, user_id: &str, kind: MeetingKind) -> Result<Option<CachedMeetings>>;

    async fn upsert_entry(
        &self,
        user_id: &str,
        kind: MeetingKind,
        entry: &CachedMeetings,
    ) -> Result<()>;

    /// Drop all cached lists for the user. Returns the number removed.
    async fn delete_entries(&self, user_id: &str) -> Result<usize>;
}

/// Durable storage for generated summaries.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    async fn get_summary(&self, meeting_id: &str, user_id: &str) -> Result<Option<SummaryRecord>>;

    async fn save_summary(&self, record: &SummaryRecord) -> Result<()>;
}

/// Append-only analytics sink.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    async fn append(&self, event: &AnalyticsEvent) -> Result<()>;
}
