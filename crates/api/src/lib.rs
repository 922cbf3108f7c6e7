//! # MeetSync API
//!
//! HTTP and WebSocket surface of the sync orchestrator.
//!
//! This crate wires the infrastructure adapters into the core services
//! ([`AppContext`]) and exposes them as an axum router: connection
//! management, meeting fetch, summary generation, webhook intake, and the
//! push channel.

pub mod context;
pub mod error;
pub mod routes;

pub use context::AppContext;
pub use error::ApiError;
