//! Orchestration layer: port traits plus the services that implement the
//! sync pipeline (identity resolution, cascading fetch, caching, summary
//! generation, and push notifications).
//!
//! Everything here depends only on port traits; concrete adapters live in
//! `meetsync-infra` and are wired in by the API crate.

pub mod analytics;
pub mod cache;
pub mod classify;
pub mod fetch;
pub mod hub;
pub mod ports;
pub mod resolver;
pub mod summary;
pub mod synthetic;
pub mod watch;

pub use analytics::EventLog;
pub use cache::MeetingCache;
pub use classify::classify;
pub use fetch::FetchOrchestrator;
pub use hub::NotificationHub;
pub use ports::{
    AnalyticsStore, CalendarActions, ConnectionStore, LlmClient, MeetingCacheStore, SummaryStore,
};
pub use resolver::ConnectionResolver;
pub use summary::SummaryPipeline;
pub use watch::{WatchOutcome, WatchRegistrar};
