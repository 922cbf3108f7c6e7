//! Analytics, webhook, and push-channel event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only analytics row. Write-only from this subsystem's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub user_id: String,
    pub event_type: String,
    pub event_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn now(
        user_id: impl Into<String>,
        event_type: impl Into<String>,
        event_data: serde_json::Value,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            event_type: event_type.into(),
            event_data,
            created_at: Utc::now(),
        }
    }
}

/// Provider-originated webhook payload.
///
/// The owning user id may arrive in any of three places depending on the
/// integration; [`WebhookEvent::owner`] resolves them in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, rename = "entity_id", skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<WebhookMetadata>,
}

/// Metadata envelope some provider webhooks nest the user id under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl WebhookEvent {
    /// Resolve the owning user id: top-level, then metadata, then entity id.
    pub fn owner(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .or_else(|| self.metadata.as_ref().and_then(|m| m.user_id.as_deref()))
            .or(self.entity_id.as_deref())
    }
}

/// Provider-side watch channel registered for webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchSubscription {
    /// Channel identifier, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Action synonym that accepted the registration.
    pub action: String,
}

/// Event delivered to a live client over its push channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    pub event: String,
    pub data: serde_json::Value,
}

impl PushMessage {
    pub fn new(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self { event: event.into(), data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_prefers_top_level_user_id() {
        let event = WebhookEvent {
            user_id: Some("u1".into()),
            entity_id: Some("e9".into()),
            metadata: Some(WebhookMetadata { user_id: Some("u2".into()) }),
            ..WebhookEvent::default()
        };
        assert_eq!(event.owner(), Some("u1"));
    }

    #[test]
    fn owner_falls_back_to_metadata_then_entity() {
        let from_metadata = WebhookEvent {
            metadata: Some(WebhookMetadata { user_id: Some("u2".into()) }),
            entity_id: Some("e9".into()),
            ..WebhookEvent::default()
        };
        assert_eq!(from_metadata.owner(), Some("u2"));

        let from_entity =
            WebhookEvent { entity_id: Some("e9".into()), ..WebhookEvent::default() };
        assert_eq!(from_entity.owner(), Some("e9"));

        assert_eq!(WebhookEvent::default().owner(), None);
    }
}
