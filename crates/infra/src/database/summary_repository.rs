//! SQLite implementation of the SummaryStore port.

use async_trait::async_trait;
use meetsync_core::ports::SummaryStore;
use meetsync_domain::{Result, SummaryRecord};
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{from_millis, to_millis, SqlitePool};
use crate::errors::InfraError;

pub struct SqliteSummaryStore {
    pool: SqlitePool,
}

impl SqliteSummaryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SummaryStore for SqliteSummaryStore {
    async fn get_summary(&self, meeting_id: &str, user_id: &str) -> Result<Option<SummaryRecord>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let row = conn
            .query_row(
                "SELECT meeting_id, user_id, summary_text, is_mock, created_at
                 FROM ai_summaries
                 WHERE meeting_id = ?1 AND user_id = ?2",
                params![meeting_id, user_id],
                |row| {
                    Ok(SummaryRecord {
                        meeting_id: row.get(0)?,
                        user_id: row.get(1)?,
                        summary_text: row.get(2)?,
                        is_mock: row.get(3)?,
                        created_at: from_millis(row.get(4)?),
                    })
                },
            )
            .optional()
            .map_err(InfraError::from)?;
        Ok(row)
    }

    async fn save_summary(&self, record: &SummaryRecord) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        conn.execute(
            "INSERT INTO ai_summaries (meeting_id, user_id, summary_text, is_mock, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(meeting_id, user_id) DO UPDATE SET
                 summary_text = excluded.summary_text,
                 is_mock = excluded.is_mock",
            params![
                record.meeting_id,
                record.user_id,
                record.summary_text,
                record.is_mock,
                to_millis(record.created_at),
            ],
        )
        .map_err(InfraError::from)?;
        debug!(meeting_id = %record.meeting_id, user_id = %record.user_id, "summary saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DbManager;
    use chrono::Utc;
    use tempfile::TempDir;

    fn store() -> (TempDir, SqliteSummaryStore) {
        let dir = TempDir::new().expect("temp dir");
        let manager = DbManager::new(dir.path().join("test.db"), 2).expect("manager");
        manager.run_migrations().expect("migrations");
        (dir, SqliteSummaryStore::new(manager.pool()))
    }

    fn record(meeting_id: &str, user_id: &str, text: &str) -> SummaryRecord {
        SummaryRecord {
            meeting_id: meeting_id.into(),
            user_id: user_id.into(),
            summary_text: text.into(),
            is_mock: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn save_and_fetch_round_trip() {
        let (_dir, store) = store();
        store.save_summary(&record("m1", "u1", "A short sync.")).await.expect("saved");

        let fetched = store.get_summary("m1", "u1").await.expect("query").expect("row");
        assert_eq!(fetched.summary_text, "A short sync.");
        assert!(!fetched.is_mock);
        assert!(store.get_summary("m1", "u2").await.expect("query").is_none());
    }

    #[tokio::test]
    async fn summaries_are_scoped_per_user() {
        let (_dir, store) = store();
        store.save_summary(&record("m1", "u1", "For u1.")).await.expect("saved");
        store.save_summary(&record("m1", "u2", "For u2.")).await.expect("saved");

        let u1 = store.get_summary("m1", "u1").await.expect("query").expect("row");
        let u2 = store.get_summary("m1", "u2").await.expect("query").expect("row");
        assert_ne!(u1.summary_text, u2.summary_text);
    }
}
