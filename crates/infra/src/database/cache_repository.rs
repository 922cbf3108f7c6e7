//! SQLite implementation of the MeetingCacheStore port.

use async_trait::async_trait;
use meetsync_core::ports::MeetingCacheStore;
use meetsync_domain::{CachedMeetings, MeetingKind, Result};
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{from_millis, to_millis, SqlitePool};
use crate::errors::InfraError;

pub struct SqliteCacheStore {
    pool: SqlitePool,
}

impl SqliteCacheStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MeetingCacheStore for SqliteCacheStore {
    async fn get_entry(&self, user_id: &str, kind: MeetingKind) -> Result<Option<CachedMeetings>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let row = conn
            .query_row(
                "SELECT data, cached_at FROM meetings_cache
                 WHERE user_id = ?1 AND meeting_type = ?2",
                params![user_id, kind.as_str()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()
            .map_err(InfraError::from)?;

        let Some((data, cached_at)) = row else { return Ok(None) };
        Ok(Some(CachedMeetings {
            payload: serde_json::from_str(&data).map_err(InfraError::from)?,
            cached_at: from_millis(cached_at),
        }))
    }

    async fn upsert_entry(
        &self,
        user_id: &str,
        kind: MeetingKind,
        entry: &CachedMeetings,
    ) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let data = serde_json::to_string(&entry.payload).map_err(InfraError::from)?;
        conn.execute(
            "INSERT INTO meetings_cache (user_id, meeting_type, data, cached_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id, meeting_type) DO UPDATE SET
                 data = excluded.data,
                 cached_at = excluded.cached_at",
            params![user_id, kind.as_str(), data, to_millis(entry.cached_at)],
        )
        .map_err(InfraError::from)?;
        debug!(user_id, kind = kind.as_str(), count = entry.payload.len(), "meetings cached");
        Ok(())
    }

    async fn delete_entries(&self, user_id: &str) -> Result<usize> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let removed = conn
            .execute("DELETE FROM meetings_cache WHERE user_id = ?1", params![user_id])
            .map_err(InfraError::from)?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DbManager;
    use chrono::Utc;
    use meetsync_domain::Meeting;
    use tempfile::TempDir;

    fn store() -> (TempDir, SqliteCacheStore) {
        let dir = TempDir::new().expect("temp dir");
        let manager = DbManager::new(dir.path().join("test.db"), 2).expect("manager");
        manager.run_migrations().expect("migrations");
        (dir, SqliteCacheStore::new(manager.pool()))
    }

    fn entry(ids: &[&str]) -> CachedMeetings {
        CachedMeetings {
            payload: ids
                .iter()
                .map(|id| Meeting {
                    id: (*id).into(),
                    title: "Standup".into(),
                    start: Utc::now(),
                    end: Utc::now(),
                    description: String::new(),
                    attendees: vec![],
                    location: String::new(),
                    meet_link: String::new(),
                    organizer: None,
                })
                .collect(),
            cached_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn upsert_replaces_existing_entry() {
        let (_dir, store) = store();
        store.upsert_entry("u1", MeetingKind::Upcoming, &entry(&["m1"])).await.expect("write");
        store
            .upsert_entry("u1", MeetingKind::Upcoming, &entry(&["m2", "m3"]))
            .await
            .expect("write");

        let fetched =
            store.get_entry("u1", MeetingKind::Upcoming).await.expect("query").expect("entry");
        assert_eq!(fetched.payload.len(), 2);
        assert_eq!(fetched.payload[0].id, "m2");
    }

    #[tokio::test]
    async fn kinds_are_stored_independently() {
        let (_dir, store) = store();
        store.upsert_entry("u1", MeetingKind::Upcoming, &entry(&["m1"])).await.expect("write");
        assert!(store.get_entry("u1", MeetingKind::Past).await.expect("query").is_none());
    }

    #[tokio::test]
    async fn delete_removes_all_kinds_for_user() {
        let (_dir, store) = store();
        store.upsert_entry("u1", MeetingKind::Upcoming, &entry(&["m1"])).await.expect("write");
        store.upsert_entry("u1", MeetingKind::Past, &entry(&["m2"])).await.expect("write");
        store.upsert_entry("u2", MeetingKind::Past, &entry(&["m3"])).await.expect("write");

        let removed = store.delete_entries("u1").await.expect("delete");
        assert_eq!(removed, 2);
        assert!(store.get_entry("u1", MeetingKind::Upcoming).await.expect("query").is_none());
        assert!(store.get_entry("u2", MeetingKind::Past).await.expect("query").is_some());
    }
}
