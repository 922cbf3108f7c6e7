//! # MeetSync Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - SQLite-backed repositories (connections, meeting cache, summaries,
//!   analytics)
//! - HTTP client with retry support
//! - External service integrations (calendar provider, OpenAI)
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `meetsync-core`
//! - Depends on `meetsync-domain` and `meetsync-core`
//! - Contains all "impure" code (I/O, network, filesystem)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;

pub use database::{
    DbManager, SqliteAnalyticsStore, SqliteCacheStore, SqliteConnectionStore, SqliteSummaryStore,
};
pub use errors::InfraError;
pub use http::HttpClient;
pub use integrations::{ComposioClient, OpenAiClient};
