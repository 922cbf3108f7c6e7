//! TTL cache for meeting lists.
//!
//! Two tiers share one policy: a durable store when one is configured, and an
//! in-process map otherwise. Invalidation is lazy. Entries are not evicted on
//! expiry, they are ignored on read and overwritten on the next write.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use dashmap::DashMap;
use tracing::{debug, warn};

use meetsync_domain::{CachedMeetings, Meeting, MeetingKind, DEFAULT_CACHE_TTL_MS};

use crate::ports::MeetingCacheStore;

pub struct MeetingCache {
    store: Option<Arc<dyn MeetingCacheStore>>,
    fallback: DashMap<(String, MeetingKind), CachedMeetings>,
    ttl: Duration,
}

impl MeetingCache {
    pub fn new(store: Option<Arc<dyn MeetingCacheStore>>, ttl: StdDuration) -> Self {
        let ttl = Duration::from_std(ttl).unwrap_or_else(|_| Duration::milliseconds(
            i64::try_from(DEFAULT_CACHE_TTL_MS).unwrap_or(i64::MAX),
        ));
        Self { store, fallback: DashMap::new(), ttl }
    }

    /// Cache with the default 5-minute TTL.
    pub fn with_default_ttl(store: Option<Arc<dyn MeetingCacheStore>>) -> Self {
        Self::new(store, StdDuration::from_millis(DEFAULT_CACHE_TTL_MS))
    }

    /// Fresh entry for the user and kind, or `None` when absent or stale.
    ///
    /// Store read failures degrade to a miss rather than failing the fetch.
    pub async fn get(&self, user_id: &str, kind: MeetingKind) -> Option<Vec<Meeting>> {
        let entry = match &self.store {
            Some(store) => match store.get_entry(user_id, kind).await {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(user_id, kind = kind.as_str(), error = %err, "cache read failed");
                    None
                }
            },
            None => self.fallback.get(&(user_id.to_owned(), kind)).map(|e| e.clone()),
        };

        let entry = entry?;
        let now = Utc::now();
        let age = now - entry.cached_at;
        if self.is_fresh(entry.cached_at, now) {
            debug!(user_id, kind = kind.as_str(), age_ms = age.num_milliseconds(), "cache hit");
            Some(entry.payload)
        } else {
            debug!(user_id, kind = kind.as_str(), age_ms = age.num_milliseconds(), "cache stale");
            None
        }
    }

    /// An entry is stale only once its age exceeds the TTL; at exactly the
    /// TTL it still serves.
    fn is_fresh(&self, cached_at: chrono::DateTime<Utc>, now: chrono::DateTime<Utc>) -> bool {
        now - cached_at <= self.ttl
    }

    /// Replace the cached list for the user and kind.
    pub async fn put(&self, user_id: &str, kind: MeetingKind, meetings: Vec<Meeting>) {
        let entry = CachedMeetings { payload: meetings, cached_at: Utc::now() };
        match &self.store {
            Some(store) => {
                if let Err(err) = store.upsert_entry(user_id, kind, &entry).await {
                    warn!(user_id, kind = kind.as_str(), error = %err, "cache write failed");
                }
            }
            None => {
                self.fallback.insert((user_id.to_owned(), kind), entry);
            }
        }
    }

    /// Drop every cached list for the user.
    ///
    /// Only the durable tier supports invalidation; without a store the
    /// in-process entries simply age out.
    pub async fn invalidate(&self, user_id: &str) {
        let Some(store) = &self.store else {
            debug!(user_id, "no durable cache configured, skipping invalidation");
            return;
        };
        match store.delete_entries(user_id).await {
            Ok(removed) => debug!(user_id, removed, "invalidated cached meetings"),
            Err(err) => warn!(user_id, error = %err, "cache invalidation failed"),
        }
    }
}
