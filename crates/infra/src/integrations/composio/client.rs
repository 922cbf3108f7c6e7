//! Composio API client implementing the [`CalendarActions`] port.
//!
//! Action execution reports failures as [`UpstreamError`] values so the
//! orchestrator can walk its action cascade; only the OAuth endpoints return
//! domain errors directly.

use async_trait::async_trait;
use meetsync_core::ports::CalendarActions;
use meetsync_domain::{
    AuthorizationRequest, EventQuery, RawEvent, Result, SyncError, UpstreamError,
    WatchSubscription, CALENDAR_APP_NAME,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::http::HttpClient;

const DEFAULT_BASE_URL: &str = "https://backend.composio.dev";

pub struct ComposioClient {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
}

impl ComposioClient {
    pub fn new(api_key: String, http_client: HttpClient) -> Self {
        Self { http_client, api_key, base_url: DEFAULT_BASE_URL.to_string() }
    }

    /// Override the API base URL (configuration or tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let mut base = url.into();
        while base.ends_with('/') {
            base.pop();
        }
        self.base_url = base;
        self
    }

    fn auth_header(&self) -> [(&str, &str); 1] {
        [("X-API-Key", self.api_key.as_str())]
    }
}

#[async_trait]
impl CalendarActions for ComposioClient {
    async fn execute(
        &self,
        entity_id: &str,
        action: &str,
        query: &EventQuery,
    ) -> std::result::Result<Vec<RawEvent>, UpstreamError> {
        let url = format!("{}/api/v2/actions/{action}/execute", self.base_url);
        let body = json!({
            "entityId": entity_id,
            "appName": CALENDAR_APP_NAME,
            "input": {
                "timeMin": query.time_min.to_rfc3339(),
                "timeMax": query.time_max.to_rfc3339(),
                "maxResults": query.max_results,
                "orderBy": query.order_by,
                "singleEvents": query.single_events,
            },
        });

        let response = self
            .http_client
            .post_json(&url, &self.auth_header(), &body)
            .await
            .map_err(|err| UpstreamError::network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(action_error(status.as_u16(), response).await);
        }

        let parsed: ExecuteResponse = response
            .json()
            .await
            .map_err(|err| UpstreamError::network(format!("invalid provider response: {err}")))?;
        let items = parsed.data.map(|d| d.items).unwrap_or_default();
        debug!(action, count = items.len(), "provider action executed");
        Ok(items)
    }

    async fn create_auth_url(
        &self,
        entity_id: &str,
        redirect_url: &str,
    ) -> Result<AuthorizationRequest> {
        let url = format!("{}/api/v1/connectedAccounts", self.base_url);
        let body = json!({
            "entityId": entity_id,
            "appName": CALENDAR_APP_NAME,
            "redirectUri": redirect_url,
        });

        let response = self.http_client.post_json(&url, &self.auth_header(), &body).await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "unknown error".into());
            warn!(status = status.as_u16(), "authorization request rejected");
            return Err(match status.as_u16() {
                401 | 403 => SyncError::Auth(format!("provider rejected API key: {message}")),
                _ => SyncError::Network(format!(
                    "authorization request failed (status {status}): {message}"
                )),
            });
        }

        let parsed: InitiateResponse = response
            .json()
            .await
            .map_err(|err| SyncError::Network(format!("invalid provider response: {err}")))?;
        Ok(AuthorizationRequest {
            redirect_url: parsed.redirect_url,
            connection_id: parsed.connected_account_id,
        })
    }

    async fn complete_auth(
        &self,
        entity_id: &str,
        code: &str,
        connection_id: Option<&str>,
    ) -> Result<()> {
        let url = format!("{}/api/v1/connectedAccounts/complete", self.base_url);
        let body = json!({
            "entityId": entity_id,
            "appName": CALENDAR_APP_NAME,
            "code": code,
            "connectionId": connection_id,
        });

        let response = self.http_client.post_json(&url, &self.auth_header(), &body).await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "unknown error".into());
            warn!(status = status.as_u16(), entity_id, "authorization completion rejected");
            return Err(match status.as_u16() {
                401 | 403 => SyncError::Auth(format!("provider rejected credentials: {message}")),
                _ => SyncError::Network(format!(
                    "authorization completion failed (status {status}): {message}"
                )),
            });
        }
        debug!(entity_id, "authorization completed");
        Ok(())
    }

    async fn create_watch(
        &self,
        entity_id: &str,
        action: &str,
        webhook_url: &str,
        user_id: &str,
    ) -> std::result::Result<WatchSubscription, UpstreamError> {
        let url = format!("{}/api/v2/actions/{action}/execute", self.base_url);
        let body = json!({
            "entityId": entity_id,
            "appName": CALENDAR_APP_NAME,
            "input": {
                "webhookUrl": webhook_url,
                "metadata": { "userId": user_id },
            },
        });

        let response = self
            .http_client
            .post_json(&url, &self.auth_header(), &body)
            .await
            .map_err(|err| UpstreamError::network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(action_error(status.as_u16(), response).await);
        }

        let parsed: WatchResponse = response
            .json()
            .await
            .map_err(|err| UpstreamError::network(format!("invalid provider response: {err}")))?;
        let id = parsed.data.and_then(|d| d.id.or(d.channel_id));
        debug!(action, entity_id, channel = ?id, "watch registered");
        Ok(WatchSubscription { id, action: action.to_owned() })
    }

    async fn verify_entity(&self, entity_id: &str) -> std::result::Result<(), UpstreamError> {
        let url = format!("{}/api/v2/entities/{entity_id}", self.base_url);
        let response = self
            .http_client
            .get(&url, &self.auth_header())
            .await
            .map_err(|err| UpstreamError::network(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(action_error(status.as_u16(), response).await)
        }
    }
}

/// Map an error response to an [`UpstreamError`], flagging missing actions.
async fn action_error(status: u16, response: reqwest::Response) -> UpstreamError {
    let body = response.text().await.unwrap_or_default();
    let parsed: Option<ErrorEnvelope> = serde_json::from_str(&body).ok();
    let (code, message) = match parsed.and_then(|e| e.error) {
        Some(detail) => (detail.code, detail.message.unwrap_or_else(|| body.clone())),
        None => (None, if body.is_empty() { format!("status {status}") } else { body }),
    };

    let lower = message.to_ascii_lowercase();
    let missing = status == 404
        || code.as_deref() == Some("resource_not_found")
        || lower.contains("not found")
        || lower.contains("does not exist");

    let mut err = UpstreamError::http(status, message);
    if let Some(code) = code {
        err = err.with_code(code);
    }
    err.resource_not_found = missing;
    err
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    #[serde(default)]
    data: Option<ExecuteData>,
}

#[derive(Debug, Deserialize)]
struct ExecuteData {
    #[serde(default)]
    items: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct WatchResponse {
    #[serde(default)]
    data: Option<WatchData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WatchData {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitiateResponse {
    redirect_url: String,
    connected_account_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}
