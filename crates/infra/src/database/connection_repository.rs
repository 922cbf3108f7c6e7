//! SQLite implementation of the ConnectionStore port.

use async_trait::async_trait;
use chrono::Utc;
use meetsync_core::ports::ConnectionStore;
use meetsync_domain::{ConnectionRecord, Result, SyncError, UserProfile};
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{from_millis, to_millis, SqlitePool};
use crate::errors::InfraError;

pub struct SqliteConnectionStore {
    pool: SqlitePool,
}

impl SqliteConnectionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConnectionStore for SqliteConnectionStore {
    async fn get_connection(&self, user_id: &str) -> Result<Option<ConnectionRecord>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let row = conn
            .query_row(
                "SELECT user_id, app_name, entity_id, status, metadata, created_at, updated_at
                 FROM connections
                 WHERE user_id = ?1 AND status = 'active'
                 LIMIT 1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, i64>(5)?,
                        row.get::<_, i64>(6)?,
                    ))
                },
            )
            .optional()
            .map_err(InfraError::from)?;

        let Some((user_id, app_name, entity_id, status, metadata, created_at, updated_at)) = row
        else {
            return Ok(None);
        };

        Ok(Some(ConnectionRecord {
            user_id,
            app_name,
            entity_id,
            status: status
                .parse()
                .map_err(|e: String| SyncError::Database(format!("bad status column: {e}")))?,
            metadata: serde_json::from_str(&metadata).map_err(InfraError::from)?,
            created_at: from_millis(created_at),
            updated_at: from_millis(updated_at),
        }))
    }

    async fn upsert_user(
        &self,
        user_id: &str,
        profile: &UserProfile,
        entity_id: &str,
    ) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let now = to_millis(Utc::now());
        conn.execute(
            "INSERT INTO users (id, name, email, entity_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 email = excluded.email,
                 entity_id = excluded.entity_id,
                 updated_at = excluded.updated_at",
            params![user_id, profile.name, profile.email, entity_id, now],
        )
        .map_err(InfraError::from)?;
        debug!(user_id, "user upserted");
        Ok(())
    }

    async fn save_connection(&self, record: &ConnectionRecord) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let metadata = serde_json::to_string(&record.metadata).map_err(InfraError::from)?;
        conn.execute(
            "INSERT INTO connections
                 (user_id, app_name, entity_id, status, metadata, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(user_id, app_name) DO UPDATE SET
                 entity_id = excluded.entity_id,
                 status = excluded.status,
                 metadata = excluded.metadata,
                 updated_at = excluded.updated_at",
            params![
                record.user_id,
                record.app_name,
                record.entity_id,
                record.status.as_str(),
                metadata,
                to_millis(record.created_at),
                to_millis(record.updated_at),
            ],
        )
        .map_err(InfraError::from)?;
        debug!(user_id = %record.user_id, entity_id = %record.entity_id, "connection saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DbManager;
    use meetsync_domain::{ConnectionStatus, CALENDAR_APP_NAME};
    use tempfile::TempDir;

    fn store() -> (TempDir, SqliteConnectionStore) {
        let dir = TempDir::new().expect("temp dir");
        let manager = DbManager::new(dir.path().join("test.db"), 2).expect("manager");
        manager.run_migrations().expect("migrations");
        (dir, SqliteConnectionStore::new(manager.pool()))
    }

    fn record(user_id: &str, entity_id: &str, status: ConnectionStatus) -> ConnectionRecord {
        let now = Utc::now();
        ConnectionRecord {
            user_id: user_id.into(),
            entity_id: entity_id.into(),
            app_name: CALENDAR_APP_NAME.into(),
            status,
            metadata: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn save_and_fetch_round_trip() {
        let (_dir, store) = store();
        store
            .save_connection(&record("u1", "entity-1", ConnectionStatus::Active))
            .await
            .expect("saved");

        let fetched = store.get_connection("u1").await.expect("query").expect("row");
        assert_eq!(fetched.entity_id, "entity-1");
        assert_eq!(fetched.status, ConnectionStatus::Active);
        assert!(store.get_connection("u2").await.expect("query").is_none());
    }

    #[tokio::test]
    async fn rebinding_replaces_instead_of_duplicating() {
        let (_dir, store) = store();
        store
            .save_connection(&record("u1", "entity-1", ConnectionStatus::Active))
            .await
            .expect("saved");
        store
            .save_connection(&record("u1", "entity-2", ConnectionStatus::Active))
            .await
            .expect("saved");

        let fetched = store.get_connection("u1").await.expect("query").expect("row");
        assert_eq!(fetched.entity_id, "entity-2");
    }

    #[tokio::test]
    async fn revoked_connections_are_not_returned() {
        let (_dir, store) = store();
        store
            .save_connection(&record("u1", "entity-1", ConnectionStatus::Revoked))
            .await
            .expect("saved");
        assert!(store.get_connection("u1").await.expect("query").is_none());
    }

    #[tokio::test]
    async fn upsert_user_is_idempotent() {
        let (_dir, store) = store();
        let profile =
            UserProfile { name: Some("Sam".into()), email: Some("sam@example.com".into()) };
        store.upsert_user("u1", &profile, "entity-1").await.expect("upserted");
        store.upsert_user("u1", &profile, "entity-2").await.expect("upserted again");
    }
}
