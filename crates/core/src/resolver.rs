//! User to provider-entity resolution.
//!
//! Bindings are written to the durable store and mirrored in an in-process
//! map, so identity survives a store outage (for the life of the process) and
//! a restart (when the store is configured).

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, warn};

use meetsync_domain::{
    ConnectionRecord, ConnectionStatus, UserProfile, CALENDAR_APP_NAME,
};

use crate::ports::ConnectionStore;

pub struct ConnectionResolver {
    store: Option<Arc<dyn ConnectionStore>>,
    fallback: DashMap<String, String>,
}

impl ConnectionResolver {
    pub fn new(store: Option<Arc<dyn ConnectionStore>>) -> Self {
        Self { store, fallback: DashMap::new() }
    }

    /// Entity id bound to the user: durable store first, then the in-process
    /// map. Store failures degrade to the map rather than erroring.
    pub async fn resolve_entity(&self, user_id: &str) -> Option<String> {
        if let Some(store) = &self.store {
            match store.get_connection(user_id).await {
                Ok(Some(record)) => return Some(record.entity_id),
                Ok(None) => {}
                Err(err) => {
                    warn!(user_id, error = %err, "connection lookup failed, using in-process map");
                }
            }
        }
        self.fallback.get(user_id).map(|e| e.clone())
    }

    /// Bind the user to a provider entity. Rebinding replaces the previous
    /// binding in both tiers; store write failures leave the in-process
    /// binding in place.
    pub async fn bind_entity(&self, user_id: &str, entity_id: &str, profile: &UserProfile) {
        if let Some(store) = &self.store {
            if let Err(err) = store.upsert_user(user_id, profile, entity_id).await {
                warn!(user_id, error = %err, "user upsert failed");
            }
            let now = Utc::now();
            let record = ConnectionRecord {
                user_id: user_id.to_owned(),
                entity_id: entity_id.to_owned(),
                app_name: CALENDAR_APP_NAME.to_owned(),
                status: ConnectionStatus::Active,
                metadata: serde_json::json!({}),
                created_at: now,
                updated_at: now,
            };
            if let Err(err) = store.save_connection(&record).await {
                warn!(user_id, error = %err, "connection upsert failed");
            }
        }
        self.fallback.insert(user_id.to_owned(), entity_id.to_owned());
        debug!(user_id, entity_id, "bound provider entity");
    }

    /// Drop the binding after the provider reports the entity gone.
    ///
    /// The durable row is never deleted; its status flips to revoked so the
    /// next resolve misses it.
    pub async fn mark_revoked(&self, user_id: &str) {
        if let Some(store) = &self.store {
            match store.get_connection(user_id).await {
                Ok(Some(mut record)) => {
                    record.status = ConnectionStatus::Revoked;
                    record.updated_at = Utc::now();
                    if let Err(err) = store.save_connection(&record).await {
                        warn!(user_id, error = %err, "failed to mark connection revoked");
                    }
                }
                Ok(None) => {}
                Err(err) => warn!(user_id, error = %err, "connection lookup failed during revoke"),
            }
        }
        self.fallback.remove(user_id);
        debug!(user_id, "dropped provider binding");
    }
}
