//! Composio calendar provider integration.

mod client;

pub use client::ComposioClient;
