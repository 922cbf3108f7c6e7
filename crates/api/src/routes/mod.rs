//! Route table and shared request types.

use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::context::SharedContext;

pub mod connection;
pub mod meetings;
pub mod meta;
pub mod webhook;
pub mod ws;

/// User id assumed when a request does not carry one.
pub(crate) const DEFAULT_USER_ID: &str = "default-user";

/// Build the full application router.
pub fn router(context: SharedContext) -> Router {
    Router::new()
        .route("/", get(meta::root))
        .route("/api/health", get(meta::health))
        .route("/api/status", get(meta::status))
        .route("/api/connection/status", get(connection::status))
        .route("/api/connection/initiate", post(connection::initiate))
        .route("/api/connection/callback", post(connection::callback))
        .route("/api/meetings/upcoming", get(meetings::upcoming))
        .route("/api/meetings/past", get(meetings::past))
        .route("/api/meetings/summarize", post(meetings::summarize))
        .route("/api/webhook/calendar", post(webhook::calendar))
        .route("/api/webhook/setup", post(webhook::setup))
        .route("/ws", get(ws::upgrade))
        .with_state(context)
}

/// `?userId=` query parameter shared by several endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct UserQuery {
    #[serde(default, rename = "userId")]
    user_id: Option<String>,
}

impl UserQuery {
    pub(crate) fn user_id(&self) -> String {
        self.user_id.clone().unwrap_or_else(|| DEFAULT_USER_ID.to_owned())
    }
}
