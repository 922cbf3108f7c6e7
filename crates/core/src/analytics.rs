//! Fire-and-forget analytics event log.

use std::sync::Arc;

use tracing::{debug, warn};

use meetsync_domain::AnalyticsEvent;

use crate::ports::AnalyticsStore;

/// Best-effort event sink. Without a store it drops events; with one it
/// appends and swallows write failures, since analytics must never affect a
/// request outcome.
#[derive(Clone)]
pub struct EventLog {
    store: Option<Arc<dyn AnalyticsStore>>,
}

impl EventLog {
    pub fn new(store: Option<Arc<dyn AnalyticsStore>>) -> Self {
        Self { store }
    }

    /// Sink that discards everything. Used in degraded mode and in tests.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    pub async fn log(&self, user_id: &str, event_type: &str, event_data: serde_json::Value) {
        let Some(store) = &self.store else {
            debug!(user_id, event_type, "analytics store not configured, dropping event");
            return;
        };
        let event = AnalyticsEvent::now(user_id, event_type, event_data);
        if let Err(err) = store.append(&event).await {
            warn!(user_id, event_type, error = %err, "failed to record analytics event");
        }
    }
}
