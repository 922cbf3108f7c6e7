//! Shared in-memory adapters for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use meetsync_core::ports::{
    AnalyticsStore, CalendarActions, ConnectionStore, LlmClient, MeetingCacheStore, SummaryStore,
};
use meetsync_domain::{
    AnalyticsEvent, AuthorizationRequest, CachedMeetings, ConnectionRecord, ConnectionStatus,
    EventQuery, EventTime, LlmCompletion, MeetingKind, RawEvent, Result, SummaryRecord,
    SyncError, UpstreamError, UserProfile, WatchSubscription,
};

/// Calendar provider that fails every action before `succeed_on`.
pub struct FlakyProvider {
    pub succeed_on: Option<&'static str>,
    pub calls: Mutex<Vec<String>>,
}

impl FlakyProvider {
    pub fn new(succeed_on: Option<&'static str>) -> Self {
        Self { succeed_on, calls: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl CalendarActions for FlakyProvider {
    async fn execute(
        &self,
        _entity_id: &str,
        action: &str,
        _query: &EventQuery,
    ) -> std::result::Result<Vec<RawEvent>, UpstreamError> {
        self.calls.lock().expect("lock").push(action.to_owned());
        if self.succeed_on == Some(action) {
            Ok(vec![RawEvent {
                id: "evt-1".into(),
                summary: Some("Standup".into()),
                start: Some(EventTime::at(Utc::now() + Duration::hours(1))),
                end: Some(EventTime::at(Utc::now() + Duration::hours(2))),
                ..RawEvent::default()
            }])
        } else {
            Err(UpstreamError::action_missing(format!("{action} does not exist")))
        }
    }

    async fn create_auth_url(
        &self,
        _entity_id: &str,
        redirect_url: &str,
    ) -> Result<AuthorizationRequest> {
        Ok(AuthorizationRequest {
            redirect_url: redirect_url.to_owned(),
            connection_id: "conn-1".into(),
        })
    }

    async fn complete_auth(
        &self,
        _entity_id: &str,
        _code: &str,
        _connection_id: Option<&str>,
    ) -> Result<()> {
        Ok(())
    }

    async fn create_watch(
        &self,
        _entity_id: &str,
        action: &str,
        _webhook_url: &str,
        _user_id: &str,
    ) -> std::result::Result<WatchSubscription, UpstreamError> {
        self.calls.lock().expect("lock").push(action.to_owned());
        if self.succeed_on == Some(action) {
            Ok(WatchSubscription { id: Some("chan-1".into()), action: action.to_owned() })
        } else {
            Err(UpstreamError::action_missing(format!("{action} does not exist")))
        }
    }

    async fn verify_entity(&self, _entity_id: &str) -> std::result::Result<(), UpstreamError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryConnectionStore {
    pub rows: Mutex<Vec<ConnectionRecord>>,
}

#[async_trait]
impl ConnectionStore for MemoryConnectionStore {
    async fn get_connection(&self, user_id: &str) -> Result<Option<ConnectionRecord>> {
        Ok(self
            .rows
            .lock()
            .expect("lock")
            .iter()
            .find(|r| r.user_id == user_id && r.status == ConnectionStatus::Active)
            .cloned())
    }

    async fn upsert_user(
        &self,
        _user_id: &str,
        _profile: &UserProfile,
        _entity_id: &str,
    ) -> Result<()> {
        Ok(())
    }

    async fn save_connection(&self, record: &ConnectionRecord) -> Result<()> {
        let mut rows = self.rows.lock().expect("lock");
        rows.retain(|r| !(r.user_id == record.user_id && r.app_name == record.app_name));
        rows.push(record.clone());
        Ok(())
    }
}

/// Cache store with switchable failure mode, counting reads and writes.
#[derive(Default)]
pub struct MemoryCacheStore {
    pub entries: Mutex<Vec<(String, MeetingKind, CachedMeetings)>>,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
    pub failing: std::sync::atomic::AtomicBool,
}

#[async_trait]
impl MeetingCacheStore for MemoryCacheStore {
    async fn get_entry(&self, user_id: &str, kind: MeetingKind) -> Result<Option<CachedMeetings>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(SyncError::Database("store offline".into()));
        }
        Ok(self
            .entries
            .lock()
            .expect("lock")
            .iter()
            .find(|(u, k, _)| u == user_id && *k == kind)
            .map(|(_, _, entry)| entry.clone()))
    }

    async fn upsert_entry(
        &self,
        user_id: &str,
        kind: MeetingKind,
        entry: &CachedMeetings,
    ) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(SyncError::Database("store offline".into()));
        }
        let mut entries = self.entries.lock().expect("lock");
        entries.retain(|(u, k, _)| !(u == user_id && *k == kind));
        entries.push((user_id.to_owned(), kind, entry.clone()));
        Ok(())
    }

    async fn delete_entries(&self, user_id: &str) -> Result<usize> {
        let mut entries = self.entries.lock().expect("lock");
        let before = entries.len();
        entries.retain(|(u, _, _)| u != user_id);
        Ok(before - entries.len())
    }
}

#[derive(Default)]
pub struct MemorySummaryStore {
    pub rows: Mutex<Vec<SummaryRecord>>,
}

#[async_trait]
impl SummaryStore for MemorySummaryStore {
    async fn get_summary(&self, meeting_id: &str, user_id: &str) -> Result<Option<SummaryRecord>> {
        Ok(self
            .rows
            .lock()
            .expect("lock")
            .iter()
            .find(|r| r.meeting_id == meeting_id && r.user_id == user_id)
            .cloned())
    }

    async fn save_summary(&self, record: &SummaryRecord) -> Result<()> {
        self.rows.lock().expect("lock").push(record.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryAnalyticsStore {
    pub events: Mutex<Vec<AnalyticsEvent>>,
}

impl MemoryAnalyticsStore {
    pub fn event_types(&self) -> Vec<String> {
        self.events.lock().expect("lock").iter().map(|e| e.event_type.clone()).collect()
    }
}

#[async_trait]
impl AnalyticsStore for MemoryAnalyticsStore {
    async fn append(&self, event: &AnalyticsEvent) -> Result<()> {
        self.events.lock().expect("lock").push(event.clone());
        Ok(())
    }
}

/// LLM stub with a counter, so generate-once can be asserted.
#[derive(Default)]
pub struct CountingLlm {
    pub calls: AtomicUsize,
}

#[async_trait]
impl LlmClient for CountingLlm {
    async fn complete(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> std::result::Result<LlmCompletion, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(LlmCompletion { text: "The team aligned on priorities.".into(), tokens_used: 57 })
    }
}
