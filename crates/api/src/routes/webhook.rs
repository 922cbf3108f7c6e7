//! Provider webhook intake and subscription setup.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use meetsync_domain::{SyncError, WebhookEvent};

use crate::context::SharedContext;
use crate::routes::DEFAULT_USER_ID;

/// `POST /api/webhook/calendar`
///
/// Always acknowledges: the provider retries on non-2xx, and a webhook we
/// cannot attribute is still worth recording.
pub async fn calendar(
    State(ctx): State<SharedContext>,
    Json(event): Json<WebhookEvent>,
) -> Json<Value> {
    debug!(event_type = ?event.event_type, "webhook received");
    let notified = ctx.hub.handle_webhook(&event).await;
    Json(json!({ "success": true, "notified": notified }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SetupRequest {
    #[serde(default)]
    user_id: Option<String>,
}

/// `POST /api/webhook/setup` - register a provider watch pointed at the
/// ingest endpoint.
///
/// Watch support is spotty across integrations, so an exhausted cascade is
/// still a success response: live sync continues over the WebSocket channel.
/// Only a missing binding is an error.
pub async fn setup(State(ctx): State<SharedContext>, Json(body): Json<SetupRequest>) -> Response {
    let user_id = body.user_id.unwrap_or_else(|| DEFAULT_USER_ID.to_owned());
    let base = ctx
        .config
        .server
        .webhook_url
        .clone()
        .unwrap_or_else(|| format!("http://localhost:{}", ctx.config.server.port));
    let webhook_url = format!("{}/api/webhook/calendar", base.trim_end_matches('/'));

    let outcome = match ctx.watch.register(&user_id, &webhook_url).await {
        Ok(outcome) => outcome,
        Err(SyncError::Unauthenticated(message)) => {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "error": message })))
                .into_response();
        }
        Err(err) => {
            warn!(user_id, error = %err, "webhook setup failed");
            return Json(json!({
                "success": true,
                "fallback": "websocket_polling",
                "websocketEnabled": true,
                "message": "Live sync enabled via WebSocket polling",
            }))
            .into_response();
        }
    };

    let live = outcome.live();
    Json(json!({
        "success": true,
        "webhook": outcome.subscription,
        "fallback": if live { Value::Null } else { json!("websocket_polling") },
        "websocketEnabled": true,
        "message": if live {
            "Live sync enabled via provider webhooks"
        } else {
            "Live sync enabled via WebSocket polling (provider webhooks unavailable)"
        },
    }))
    .into_response()
}
