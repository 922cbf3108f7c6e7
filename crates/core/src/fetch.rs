//! Meeting fetch orchestration.
//!
//! The pipeline per request: cache probe, identity resolution, provider
//! action cascade, normalization, cache write. Every failure mode past
//! authentication degrades to data: synthetic meetings plus a classification,
//! never an error response.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use meetsync_domain::{
    EventQuery, Meeting, MeetingKind, MeetingsPayload, RawEvent, Result, SyncError,
    UpstreamError, MAX_EVENT_RESULTS, NO_TITLE_PLACEHOLDER,
};

use crate::analytics::EventLog;
use crate::cache::MeetingCache;
use crate::classify::classify;
use crate::ports::CalendarActions;
use crate::resolver::ConnectionResolver;
use crate::synthetic;

pub struct FetchOrchestrator {
    provider: Option<Arc<dyn CalendarActions>>,
    cache: Arc<MeetingCache>,
    resolver: Arc<ConnectionResolver>,
    events: EventLog,
}

impl FetchOrchestrator {
    pub fn new(
        provider: Option<Arc<dyn CalendarActions>>,
        cache: Arc<MeetingCache>,
        resolver: Arc<ConnectionResolver>,
        events: EventLog,
    ) -> Self {
        Self { provider, cache, resolver, events }
    }

    /// Fetch the user's meeting list for one window.
    ///
    /// The only errors this returns are [`SyncError::Unauthenticated`] (no
    /// provider binding); anything else that goes wrong inside the pipeline
    /// is converted to a degraded payload.
    pub async fn fetch_meetings(
        &self,
        user_id: &str,
        kind: MeetingKind,
    ) -> Result<MeetingsPayload> {
        match self.pipeline(user_id, kind).await {
            Ok(payload) => Ok(payload),
            Err(err @ SyncError::Unauthenticated(_)) => Err(err),
            Err(err) => {
                warn!(user_id, kind = kind.as_str(), error = %err, "fetch pipeline failed");
                let info = classify(&UpstreamError::network(err.to_string()));
                let meetings = synthetic::sample_meetings(kind, Utc::now());
                Ok(MeetingsPayload::degraded(meetings, info))
            }
        }
    }

    async fn pipeline(&self, user_id: &str, kind: MeetingKind) -> Result<MeetingsPayload> {
        if let Some(hit) = self.cache.get(user_id, kind).await {
            debug!(user_id, kind = kind.as_str(), "serving meetings from cache");
            return Ok(MeetingsPayload::from_cache(hit));
        }

        let Some(entity_id) = self.resolver.resolve_entity(user_id).await else {
            return Err(SyncError::Unauthenticated(
                "Not connected to Google Calendar".into(),
            ));
        };

        let (time_min, time_max) = kind.window(Utc::now());
        let query = EventQuery {
            time_min,
            time_max,
            max_results: MAX_EVENT_RESULTS,
            order_by: "startTime".into(),
            single_events: true,
        };

        let raw = match &self.provider {
            Some(provider) => self.run_cascade(provider.as_ref(), &entity_id, &query).await,
            None => {
                debug!("calendar provider not configured");
                None
            }
        };

        let payload = match raw {
            Some(events) => {
                let meetings = normalize_events(events, kind);
                self.cache.put(user_id, kind, meetings.clone()).await;
                self.events
                    .log(
                        user_id,
                        "meetings_fetched",
                        serde_json::json!({ "type": kind.as_str(), "count": meetings.len() }),
                    )
                    .await;
                MeetingsPayload::fresh(meetings)
            }
            None => {
                debug!(user_id, kind = kind.as_str(), "cascade exhausted, using sample data");
                let meetings = synthetic::sample_meetings(kind, Utc::now());
                self.cache.put(user_id, kind, meetings.clone()).await;
                self.events
                    .log(
                        user_id,
                        "meetings_fetched",
                        serde_json::json!({
                            "type": kind.as_str(),
                            "count": meetings.len(),
                            "fallback": true,
                        }),
                    )
                    .await;
                MeetingsPayload::fallback(meetings, "Using sample data - calendar actions unavailable")
            }
        };
        Ok(payload)
    }

    /// Try each action synonym in order; first success wins.
    async fn run_cascade(
        &self,
        provider: &dyn CalendarActions,
        entity_id: &str,
        query: &EventQuery,
    ) -> Option<Vec<RawEvent>> {
        for action in meetsync_domain::EVENT_ACTION_CASCADE {
            match provider.execute(entity_id, action, query).await {
                Ok(events) => {
                    debug!(action, count = events.len(), "provider action succeeded");
                    return Some(events);
                }
                Err(err) => {
                    debug!(action, error = %err, "provider action unavailable, trying next");
                }
            }
        }
        None
    }
}

/// Normalize raw provider events into the canonical meeting shape.
///
/// Events without a resolvable start or end are dropped. Past lists are
/// reversed so the most recent meeting comes first.
pub fn normalize_events(events: Vec<RawEvent>, kind: MeetingKind) -> Vec<Meeting> {
    let mut meetings: Vec<Meeting> = events
        .into_iter()
        .filter_map(|event| {
            let start = event.start.as_ref().and_then(|t| t.resolve());
            let end = event.end.as_ref().and_then(|t| t.resolve());
            let (Some(start), Some(end)) = (start, end) else {
                warn!(event_id = %event.id, "dropping event without resolvable start/end");
                return None;
            };
            Some(Meeting {
                id: event.id,
                title: event
                    .summary
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| NO_TITLE_PLACEHOLDER.into()),
                start,
                end,
                description: event.description.unwrap_or_default(),
                attendees: event
                    .attendees
                    .unwrap_or_default()
                    .into_iter()
                    .map(|a| meetsync_domain::Attendee {
                        name: a
                            .display_name
                            .filter(|n| !n.is_empty())
                            .unwrap_or_else(|| a.email.clone()),
                        email: a.email,
                        response_status: a.response_status,
                    })
                    .collect(),
                location: event.location.unwrap_or_default(),
                meet_link: event.hangout_link.unwrap_or_default(),
                organizer: event.organizer,
            })
        })
        .collect();

    if kind == MeetingKind::Past {
        meetings.reverse();
    }
    meetings
}
