//! Meeting types: the normalized canonical shape, the raw provider shape it
//! is derived from, and the cache/transport wrappers around it.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::FETCH_WINDOW_DAYS;
use crate::errors::FallbackInfo;

/// Which direction the fetch window points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingKind {
    Upcoming,
    Past,
}

impl MeetingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Past => "past",
        }
    }

    /// 30-day window `[t0, t1)` relative to `now`: forward for upcoming,
    /// backward for past.
    pub fn window(self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        match self {
            Self::Upcoming => (now, now + Duration::days(FETCH_WINDOW_DAYS)),
            Self::Past => (now - Duration::days(FETCH_WINDOW_DAYS), now),
        }
    }
}

impl std::str::FromStr for MeetingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "past" => Ok(Self::Past),
            other => Err(format!("unknown meeting kind: {other}")),
        }
    }
}

/// Meeting attendee, normalized: `name` falls back to the email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
}

/// Meeting organizer as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organizer {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "displayName")]
    pub name: Option<String>,
}

/// Canonical meeting shape produced by normalization.
///
/// Always replaced wholesale per fetch, never partially updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub meet_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<Organizer>,
}

/// Event start/end as returned by the provider: either a timestamp or an
/// all-day date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl EventTime {
    pub fn at(ts: DateTime<Utc>) -> Self {
        Self { date_time: Some(ts), date: None }
    }

    /// Resolve to a concrete timestamp; all-day dates resolve to midnight.
    pub fn resolve(&self) -> Option<DateTime<Utc>> {
        self.date_time.or_else(|| {
            self.date.and_then(|d| d.and_hms_opt(0, 0, 0)).map(|naive| naive.and_utc())
        })
    }
}

/// Attendee in the provider's shape, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttendee {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
}

/// Calendar event in the provider's shape.
///
/// Provider responses are deserialized into this at the integration
/// boundary; untyped shapes never flow past the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<RawAttendee>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hangout_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<Organizer>,
}

/// Query parameters sent with every list-events action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    pub max_results: u32,
    pub order_by: String,
    pub single_events: bool,
}

/// Cached meeting list together with its write timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedMeetings {
    pub payload: Vec<Meeting>,
    pub cached_at: DateTime<Utc>,
}

/// Response body for the meetings endpoints.
///
/// Upstream failures never surface as error statuses here; they show up as
/// `fallback`/`mock` markers with an attached classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingsPayload {
    pub meetings: Vec<Meeting>,
    pub cached: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub mock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FallbackInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MeetingsPayload {
    /// Fresh result straight from the provider cascade.
    pub fn fresh(meetings: Vec<Meeting>) -> Self {
        Self { meetings, cached: false, fallback: false, mock: false, error: None, message: None }
    }

    /// Result served from the cache.
    pub fn from_cache(meetings: Vec<Meeting>) -> Self {
        Self { cached: true, ..Self::fresh(meetings) }
    }

    /// Synthetic result after the whole cascade was exhausted.
    pub fn fallback(meetings: Vec<Meeting>, message: impl Into<String>) -> Self {
        Self { fallback: true, message: Some(message.into()), ..Self::fresh(meetings) }
    }

    /// Synthetic result after an unexpected pipeline failure, with the
    /// classification attached.
    pub fn degraded(meetings: Vec<Meeting>, info: FallbackInfo) -> Self {
        Self {
            mock: true,
            message: Some(info.message.clone()),
            error: Some(info),
            ..Self::fresh(meetings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_points_forward_for_upcoming() {
        let now = Utc::now();
        let (t0, t1) = MeetingKind::Upcoming.window(now);
        assert_eq!(t0, now);
        assert_eq!(t1 - t0, Duration::days(FETCH_WINDOW_DAYS));
    }

    #[test]
    fn window_points_backward_for_past() {
        let now = Utc::now();
        let (t0, t1) = MeetingKind::Past.window(now);
        assert_eq!(t1, now);
        assert_eq!(t1 - t0, Duration::days(FETCH_WINDOW_DAYS));
    }

    #[test]
    fn event_time_resolves_all_day_dates() {
        let all_day = EventTime {
            date_time: None,
            date: Some(NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")),
        };
        let resolved = all_day.resolve().expect("resolves");
        assert_eq!(resolved.to_rfc3339(), "2025-06-01T00:00:00+00:00");
    }

    #[test]
    fn payload_markers_are_omitted_when_clean() {
        let payload = MeetingsPayload::fresh(vec![]);
        let json = serde_json::to_value(&payload).expect("serializes");
        assert!(json.get("fallback").is_none());
        assert!(json.get("mock").is_none());
        assert!(json.get("error").is_none());
        assert_eq!(json["cached"], false);
    }

    #[test]
    fn meeting_serializes_camel_case() {
        let meeting = Meeting {
            id: "m1".into(),
            title: "Standup".into(),
            start: Utc::now(),
            end: Utc::now(),
            description: String::new(),
            attendees: vec![],
            location: String::new(),
            meet_link: "https://meet.example.com/m1".into(),
            organizer: None,
        };
        let json = serde_json::to_value(&meeting).expect("serializes");
        assert!(json.get("meetLink").is_some());
        assert!(json.get("meet_link").is_none());
    }
}
