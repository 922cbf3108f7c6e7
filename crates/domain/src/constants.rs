//! Shared constants for fetch windows, cache lifetimes, and provider actions.

/// Default time-to-live for cached meeting lists (5 minutes).
pub const DEFAULT_CACHE_TTL_MS: u64 = 300_000;

/// Meetings are fetched in a 30-day window forward or backward from now.
pub const FETCH_WINDOW_DAYS: i64 = 30;

/// Maximum number of events requested from the provider per fetch.
pub const MAX_EVENT_RESULTS: u32 = 5;

/// Application name used when binding provider connections.
pub const CALENDAR_APP_NAME: &str = "googlecalendar";

/// Ordered list of provider action identifiers tried when listing events.
///
/// The provider's capability surface is unstable across integrations; the
/// cascade tries each synonym until one succeeds.
pub const EVENT_ACTION_CASCADE: [&str; 4] = [
    "GOOGLECALENDAR_LIST_EVENTS",
    "GOOGLECALENDAR_GET_EVENTS",
    "GOOGLECALENDAR_LIST_CALENDAR_EVENTS",
    "GOOGLECALENDAR_GET_CALENDAR_EVENTS",
];

/// Ordered list of provider action identifiers tried when registering an
/// event watch for webhook delivery. Same synonym situation as the event
/// cascade.
pub const WATCH_ACTION_CASCADE: [&str; 4] = [
    "GOOGLECALENDAR_EVENTS_WATCH",
    "GOOGLECALENDAR_WATCH_EVENTS",
    "GOOGLECALENDAR_SUBSCRIBE_EVENTS",
    "GOOGLECALENDAR_CREATE_WATCH",
];

/// Placeholder title for events the provider returns without a summary.
pub const NO_TITLE_PLACEHOLDER: &str = "No Title";

/// Descriptions are truncated to this length when prompting the LLM.
pub const PROMPT_DESCRIPTION_LIMIT: usize = 300;

/// At most this many attendee names are listed in an LLM prompt.
pub const PROMPT_ATTENDEE_LIMIT: usize = 5;
