//! Webhook watch registration.
//!
//! Providers expose the calendar watch operation under shifting action
//! names, so registration walks a synonym list just like the event fetch.
//! Total failure is a working state: clients still get live updates through
//! the push channel, the provider just never calls back.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use meetsync_domain::{Result, SyncError, WatchSubscription, WATCH_ACTION_CASCADE};

use crate::analytics::EventLog;
use crate::ports::{CalendarActions, ConnectionStore};
use crate::resolver::ConnectionResolver;

/// What a registration attempt produced. No subscription means the client
/// stays on push-channel refreshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOutcome {
    pub subscription: Option<WatchSubscription>,
    pub webhook_url: String,
}

impl WatchOutcome {
    /// True when the provider will deliver changes itself.
    pub fn live(&self) -> bool {
        self.subscription.is_some()
    }
}

pub struct WatchRegistrar {
    provider: Option<Arc<dyn CalendarActions>>,
    connections: Option<Arc<dyn ConnectionStore>>,
    resolver: Arc<ConnectionResolver>,
    events: EventLog,
}

impl WatchRegistrar {
    pub fn new(
        provider: Option<Arc<dyn CalendarActions>>,
        connections: Option<Arc<dyn ConnectionStore>>,
        resolver: Arc<ConnectionResolver>,
        events: EventLog,
    ) -> Self {
        Self { provider, connections, resolver, events }
    }

    /// Register a provider watch delivering to `webhook_url`.
    ///
    /// Requires a bound entity; past that nothing fails hard. An exhausted
    /// synonym cascade or a missing provider yields an outcome without a
    /// subscription, and the connection row keeps whatever metadata it had.
    pub async fn register(&self, user_id: &str, webhook_url: &str) -> Result<WatchOutcome> {
        let Some(entity_id) = self.resolver.resolve_entity(user_id).await else {
            return Err(SyncError::Unauthenticated("Not connected to Google Calendar".into()));
        };

        let subscription = match &self.provider {
            Some(provider) => {
                self.run_cascade(provider.as_ref(), &entity_id, webhook_url, user_id).await
            }
            None => {
                debug!("calendar provider not configured");
                None
            }
        };

        match &subscription {
            Some(sub) => {
                info!(user_id, action = %sub.action, channel = ?sub.id, "watch registered");
                self.save_metadata(user_id, webhook_url, sub).await;
            }
            None => {
                debug!(user_id, "no watch action available, clients refresh over the push channel");
            }
        }

        self.events
            .log(
                user_id,
                "webhook_setup",
                json!({
                    "success": subscription.is_some(),
                    "webhookUrl": webhook_url,
                    "method": if subscription.is_some() { "provider_watch" } else { "websocket_polling" },
                }),
            )
            .await;

        Ok(WatchOutcome { subscription, webhook_url: webhook_url.to_owned() })
    }

    /// Try each watch synonym in order; first acceptance wins.
    async fn run_cascade(
        &self,
        provider: &dyn CalendarActions,
        entity_id: &str,
        webhook_url: &str,
        user_id: &str,
    ) -> Option<WatchSubscription> {
        for action in WATCH_ACTION_CASCADE {
            match provider.create_watch(entity_id, action, webhook_url, user_id).await {
                Ok(subscription) => return Some(subscription),
                Err(err) => {
                    debug!(action, error = %err, "watch action unavailable, trying next");
                }
            }
        }
        None
    }

    /// Fold the watch details into the connection row's metadata. Best
    /// effort: a missing row or store failure only warns.
    async fn save_metadata(&self, user_id: &str, webhook_url: &str, sub: &WatchSubscription) {
        let Some(store) = &self.connections else { return };
        match store.get_connection(user_id).await {
            Ok(Some(mut record)) => {
                let mut metadata = record.metadata.as_object().cloned().unwrap_or_default();
                metadata.insert("webhookUrl".into(), json!(webhook_url));
                metadata.insert("webhookId".into(), json!(sub.id));
                metadata.insert("webhookSetupAt".into(), json!(Utc::now().to_rfc3339()));
                record.metadata = Value::Object(metadata);
                record.updated_at = Utc::now();
                if let Err(err) = store.save_connection(&record).await {
                    warn!(user_id, error = %err, "failed to persist watch metadata");
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!(user_id, error = %err, "connection lookup failed while saving watch");
            }
        }
    }
}
