//! SQLite implementation of the AnalyticsStore port.

use async_trait::async_trait;
use meetsync_core::ports::AnalyticsStore;
use meetsync_domain::{AnalyticsEvent, Result};
use rusqlite::params;

use super::{to_millis, SqlitePool};
use crate::errors::InfraError;

pub struct SqliteAnalyticsStore {
    pool: SqlitePool,
}

impl SqliteAnalyticsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsStore for SqliteAnalyticsStore {
    async fn append(&self, event: &AnalyticsEvent) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let data = serde_json::to_string(&event.event_data).map_err(InfraError::from)?;
        conn.execute(
            "INSERT INTO analytics_events (user_id, event_type, event_data, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![event.user_id, event.event_type, data, to_millis(event.created_at)],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }
}
