//! Application context - dependency injection container.
//!
//! Wires concrete adapters from `meetsync-infra` into the services from
//! `meetsync-core`, following the configuration: every unconfigured
//! collaborator leaves its slot as `None` and the corresponding service runs
//! in its degraded mode instead of failing startup.

use std::sync::Arc;

use tracing::info;

use meetsync_core::ports::{
    AnalyticsStore, CalendarActions, ConnectionStore, LlmClient, MeetingCacheStore, SummaryStore,
};
use meetsync_core::{
    ConnectionResolver, EventLog, FetchOrchestrator, MeetingCache, NotificationHub,
    SummaryPipeline, WatchRegistrar,
};
use meetsync_domain::{Config, Result};
use meetsync_infra::{
    ComposioClient, DbManager, HttpClient, OpenAiClient, SqliteAnalyticsStore, SqliteCacheStore,
    SqliteConnectionStore, SqliteSummaryStore,
};

/// Shared handle passed to every route handler.
pub type SharedContext = Arc<AppContext>;

/// Container holding the wired service graph for the lifetime of the
/// process.
pub struct AppContext {
    pub config: Config,
    pub db: Option<Arc<DbManager>>,
    pub connections: Option<Arc<dyn ConnectionStore>>,
    pub provider: Option<Arc<dyn CalendarActions>>,
    pub resolver: Arc<ConnectionResolver>,
    pub cache: Arc<MeetingCache>,
    pub fetch: Arc<FetchOrchestrator>,
    pub summaries: Arc<SummaryPipeline>,
    pub hub: Arc<NotificationHub>,
    pub watch: Arc<WatchRegistrar>,
    pub events: EventLog,
}

impl AppContext {
    /// Build the full service graph from configuration.
    ///
    /// # Errors
    /// Fails only on a configured-but-broken collaborator: an unreachable
    /// database file or an HTTP client that cannot be constructed. Missing
    /// keys are not errors.
    pub fn new(config: Config) -> Result<Self> {
        let db = match &config.database.path {
            Some(path) => {
                let manager = DbManager::new(path, config.database.pool_size)?;
                manager.run_migrations()?;
                Some(Arc::new(manager))
            }
            None => {
                info!("database path not configured, running with in-process state only");
                None
            }
        };

        let connections: Option<Arc<dyn ConnectionStore>> = db
            .as_ref()
            .map(|db| Arc::new(SqliteConnectionStore::new(db.pool())) as Arc<dyn ConnectionStore>);
        let cache_store: Option<Arc<dyn MeetingCacheStore>> = db
            .as_ref()
            .map(|db| Arc::new(SqliteCacheStore::new(db.pool())) as Arc<dyn MeetingCacheStore>);
        let summary_store: Option<Arc<dyn SummaryStore>> = db
            .as_ref()
            .map(|db| Arc::new(SqliteSummaryStore::new(db.pool())) as Arc<dyn SummaryStore>);
        let analytics_store: Option<Arc<dyn AnalyticsStore>> = db
            .as_ref()
            .map(|db| Arc::new(SqliteAnalyticsStore::new(db.pool())) as Arc<dyn AnalyticsStore>);

        let http_client = HttpClient::new()?;

        let provider: Option<Arc<dyn CalendarActions>> = config.provider.api_key.clone().map(|key| {
            Arc::new(
                ComposioClient::new(key, http_client.clone())
                    .with_base_url(&config.provider.base_url),
            ) as Arc<dyn CalendarActions>
        });
        if provider.is_none() {
            info!("calendar provider key not configured, meetings will use sample data");
        }

        let llm: Option<Arc<dyn LlmClient>> = config.llm.api_key.clone().map(|key| {
            Arc::new(
                OpenAiClient::new(key, http_client)
                    .with_model(&config.llm.model)
                    .with_base_url(&config.llm.base_url),
            ) as Arc<dyn LlmClient>
        });
        if llm.is_none() {
            info!("LLM key not configured, summaries will be synthetic");
        }

        let events = EventLog::new(analytics_store);
        let cache = Arc::new(MeetingCache::with_default_ttl(cache_store));
        let resolver = Arc::new(ConnectionResolver::new(connections.clone()));
        let fetch = Arc::new(FetchOrchestrator::new(
            provider.clone(),
            Arc::clone(&cache),
            Arc::clone(&resolver),
            events.clone(),
        ));
        let summaries = Arc::new(SummaryPipeline::new(summary_store, llm, events.clone()));
        let hub = Arc::new(NotificationHub::new(Arc::clone(&cache), events.clone()));
        let watch = Arc::new(WatchRegistrar::new(
            provider.clone(),
            connections.clone(),
            Arc::clone(&resolver),
            events.clone(),
        ));

        Ok(Self {
            config,
            db,
            connections,
            provider,
            resolver,
            cache,
            fetch,
            summaries,
            hub,
            watch,
            events,
        })
    }
}
