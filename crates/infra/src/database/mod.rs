//! SQLite-backed implementations of the core storage ports.

mod analytics_repository;
mod cache_repository;
mod connection_repository;
mod manager;
mod summary_repository;

pub use analytics_repository::SqliteAnalyticsStore;
pub use cache_repository::SqliteCacheStore;
pub use connection_repository::SqliteConnectionStore;
pub use manager::{DbManager, SqliteConn, SqlitePool};
pub use summary_repository::SqliteSummaryStore;

use chrono::{DateTime, TimeZone, Utc};

/// Timestamps are stored as unix milliseconds.
pub(crate) fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

pub(crate) fn from_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).single().unwrap_or_else(Utc::now)
}
