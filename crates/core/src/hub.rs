//! Live client registry and webhook fan-in.
//!
//! One push channel per user, last registration wins. Sends are
//! fire-and-forget: a missing or closed channel is not an error, the client
//! will catch up on its next fetch.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use meetsync_domain::{PushMessage, WebhookEvent};

use crate::analytics::EventLog;
use crate::cache::MeetingCache;

pub struct NotificationHub {
    clients: DashMap<String, UnboundedSender<PushMessage>>,
    cache: Arc<MeetingCache>,
    events: EventLog,
}

impl NotificationHub {
    pub fn new(cache: Arc<MeetingCache>, events: EventLog) -> Self {
        Self { clients: DashMap::new(), cache, events }
    }

    /// Register a push channel for the user, replacing any existing one.
    pub fn register(&self, user_id: &str, sender: UnboundedSender<PushMessage>) {
        if self.clients.insert(user_id.to_owned(), sender).is_some() {
            debug!(user_id, "replaced existing push channel");
        }
        info!(user_id, connected = self.clients.len(), "client identified");
    }

    /// Drop the user's push channel.
    pub fn unregister(&self, user_id: &str) {
        self.clients.remove(user_id);
        debug!(user_id, connected = self.clients.len(), "client disconnected");
    }

    /// Push an event to the user. Returns whether a live channel accepted it.
    pub fn send(&self, user_id: &str, event: &str, data: serde_json::Value) -> bool {
        let Some(sender) = self.clients.get(user_id) else {
            return false;
        };
        match sender.send(PushMessage::new(event, data)) {
            Ok(()) => true,
            Err(err) => {
                warn!(user_id, error = %err, "push channel closed, dropping registration");
                drop(sender);
                self.clients.remove(user_id);
                false
            }
        }
    }

    /// Users with a live push channel.
    pub fn connected_users(&self) -> Vec<String> {
        self.clients.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Process a provider webhook: invalidate the owner's cache, notify them,
    /// and record the event. Webhooks without a resolvable owner are logged
    /// under `system`.
    pub async fn handle_webhook(&self, event: &WebhookEvent) -> bool {
        let notified = match event.owner() {
            Some(user_id) => {
                let user_id = user_id.to_owned();
                self.cache.invalidate(&user_id).await;
                let notified = self.send(
                    &user_id,
                    "calendar_changed",
                    serde_json::json!({
                        "eventType": event.event_type,
                        "message": "Your calendar has been updated. Refresh to see changes.",
                        "timestamp": Utc::now().to_rfc3339(),
                    }),
                );
                if notified {
                    info!(user_id, "notified client of calendar change");
                }
                notified
            }
            None => {
                debug!("webhook without a resolvable owner");
                false
            }
        };

        let owner = event.owner().unwrap_or("system").to_owned();
        let data = serde_json::to_value(event).unwrap_or_default();
        self.events.log(&owner, "webhook_received", data).await;
        notified
    }
}
