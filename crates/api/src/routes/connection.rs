//! Provider connection lifecycle: status probe, OAuth initiation, and the
//! OAuth callback.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use meetsync_domain::{
    ConnectionRecord, ConnectionStatus, UserProfile, CALENDAR_APP_NAME,
};

use crate::context::SharedContext;
use crate::error::ApiError;
use crate::routes::{UserQuery, DEFAULT_USER_ID};

/// `GET /api/connection/status` - is the user bound to a live provider
/// entity?
///
/// When the provider reports the entity gone, the binding is revoked on the
/// spot so the client is sent back through OAuth.
pub async fn status(
    State(ctx): State<SharedContext>,
    Query(query): Query<UserQuery>,
) -> Json<serde_json::Value> {
    let user_id = query.user_id();
    let Some(entity_id) = ctx.resolver.resolve_entity(&user_id).await else {
        return Json(json!({ "connected": false, "entityId": null }));
    };

    if let Some(provider) = &ctx.provider {
        if let Err(err) = provider.verify_entity(&entity_id).await {
            warn!(user_id, entity_id, error = %err, "provider no longer knows entity, revoking");
            ctx.resolver.mark_revoked(&user_id).await;
            return Json(json!({ "connected": false, "entityId": null }));
        }
    }

    ctx.events
        .log(&user_id, "connection_status_check", json!({ "entityId": entity_id }))
        .await;
    Json(json!({ "connected": true, "entityId": entity_id }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InitiateRequest {
    #[serde(default)]
    user_id: Option<String>,
}

/// `POST /api/connection/initiate` - start the OAuth flow.
///
/// Without a provider key there is nothing to initiate; the client is told
/// to keep using fallback data.
pub async fn initiate(
    State(ctx): State<SharedContext>,
    Json(body): Json<InitiateRequest>,
) -> Response {
    let Some(provider) = &ctx.provider else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Calendar provider API key not configured",
                "message": "Add a provider API key to enable calendar integration",
                "fallback": true,
            })),
        )
            .into_response();
    };

    // The entity id mirrors the user id; anonymous requests get a
    // timestamped one.
    let entity_id = body
        .user_id
        .clone()
        .unwrap_or_else(|| format!("user-{}", Utc::now().timestamp_millis()));
    let user_id = body.user_id.unwrap_or_else(|| DEFAULT_USER_ID.to_owned());
    let redirect_url =
        format!("{}/oauth-callback?userId={user_id}", ctx.config.server.frontend_url);

    let auth = match provider.create_auth_url(&entity_id, &redirect_url).await {
        Ok(auth) => auth,
        Err(err) => return ApiError(err).into_response(),
    };

    ctx.resolver.bind_entity(&user_id, &entity_id, &UserProfile::default()).await;
    ctx.events
        .log(&user_id, "connection_initiated", json!({ "entityId": entity_id }))
        .await;
    info!(user_id, entity_id, "connection initiated");

    Json(json!({
        "connectionUrl": auth.redirect_url,
        "connectionId": auth.connection_id,
        "entityId": entity_id,
    }))
    .into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CallbackRequest {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    connection_id: Option<String>,
}

/// `POST /api/connection/callback` - finish the OAuth flow.
pub async fn callback(
    State(ctx): State<SharedContext>,
    Json(body): Json<CallbackRequest>,
) -> Response {
    let code = body.code.as_deref().unwrap_or("");
    if code.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Authorization code is required" })),
        )
            .into_response();
    }

    let user_id = body.user_id.unwrap_or_else(|| DEFAULT_USER_ID.to_owned());
    let Some(entity_id) = ctx.resolver.resolve_entity(&user_id).await else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "No connection session found. Please restart the connection process.",
            })),
        )
            .into_response();
    };

    if let Some(provider) = &ctx.provider {
        if let Err(err) = provider
            .complete_auth(&entity_id, code, body.connection_id.as_deref())
            .await
        {
            return ApiError(err).into_response();
        }
    }

    if let Some(store) = &ctx.connections {
        let now = Utc::now();
        let record = ConnectionRecord {
            user_id: user_id.clone(),
            entity_id: entity_id.clone(),
            app_name: CALENDAR_APP_NAME.to_owned(),
            status: ConnectionStatus::Active,
            metadata: json!({
                "connectionId": body.connection_id,
                "completedAt": now.to_rfc3339(),
            }),
            created_at: now,
            updated_at: now,
        };
        if let Err(err) = store.save_connection(&record).await {
            warn!(user_id, error = %err, "failed to persist completed connection");
        }
    }

    ctx.events
        .log(&user_id, "connection_completed", json!({ "entityId": entity_id }))
        .await;
    info!(user_id, entity_id, "connection completed");

    Json(json!({
        "success": true,
        "message": "Successfully connected to Google Calendar",
    }))
    .into_response()
}
