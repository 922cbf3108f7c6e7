//! Domain types shared across the MeetSync workspace.
//!
//! This crate holds the canonical data model (meetings, connections,
//! summaries, analytics events), the error taxonomy, configuration types,
//! and the constants that govern fetch windows and cache lifetimes. It has
//! no I/O dependencies.

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

pub use config::{Config, DatabaseConfig, LlmConfig, ProviderConfig, ServerConfig};
pub use constants::{
    CALENDAR_APP_NAME, DEFAULT_CACHE_TTL_MS, EVENT_ACTION_CASCADE, FETCH_WINDOW_DAYS,
    MAX_EVENT_RESULTS, NO_TITLE_PLACEHOLDER, PROMPT_ATTENDEE_LIMIT, PROMPT_DESCRIPTION_LIMIT,
    WATCH_ACTION_CASCADE,
};
pub use errors::{FallbackCategory, FallbackInfo, Result, SyncError, UpstreamError};
pub use types::connection::{AuthorizationRequest, ConnectionRecord, ConnectionStatus, UserProfile};
pub use types::events::{AnalyticsEvent, PushMessage, WatchSubscription, WebhookEvent};
pub use types::meeting::{
    Attendee, CachedMeetings, EventQuery, EventTime, Meeting, MeetingKind, MeetingsPayload,
    Organizer, RawAttendee, RawEvent,
};
pub use types::summary::{LlmCompletion, SummaryPayload, SummaryRecord};
