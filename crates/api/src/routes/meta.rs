//! Service metadata, health, and degradation-status endpoints.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::context::SharedContext;

/// `GET /` - API banner with the route map.
pub async fn root(State(ctx): State<SharedContext>) -> Json<Value> {
    Json(json!({
        "message": "MeetSync API Server",
        "status": "running",
        "frontendUrl": ctx.config.server.frontend_url,
        "endpoints": {
            "health": "/api/health",
            "status": "/api/status",
            "connectionStatus": "/api/connection/status",
            "connectionInitiate": "/api/connection/initiate",
            "connectionCallback": "/api/connection/callback",
            "upcomingMeetings": "/api/meetings/upcoming",
            "pastMeetings": "/api/meetings/past",
            "summarize": "/api/meetings/summarize",
            "webhook": "/api/webhook/calendar",
            "webhookSetup": "/api/webhook/setup",
            "websocket": "/ws",
        },
    }))
}

/// `GET /api/health` - liveness plus whether the durable store responds.
pub async fn health(State(ctx): State<SharedContext>) -> Json<Value> {
    let database = match &ctx.db {
        Some(db) => db.health_check().is_ok(),
        None => false,
    };
    Json(json!({
        "status": "ok",
        "message": "Server is running",
        "database": database,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// `GET /api/status` - which collaborators are configured and what the
/// service falls back to without them.
pub async fn status(State(ctx): State<SharedContext>) -> Json<Value> {
    let provider = ctx.provider.is_some();
    let llm = ctx.config.llm.api_key.is_some();
    let database = ctx.db.is_some();

    let mut recommendations: Vec<&str> = Vec::new();
    if !provider {
        recommendations.push("Set MEETSYNC_COMPOSIO_API_KEY to fetch real calendar data");
    }
    if !llm {
        recommendations.push("Set MEETSYNC_OPENAI_API_KEY to enable AI summaries");
    }
    if !database {
        recommendations.push("Set MEETSYNC_DB_PATH to persist connections and cache");
    }

    Json(json!({
        "services": {
            "composio": {
                "configured": provider,
                "status": if provider { "active" } else { "fallback_mode" },
                "message": if provider {
                    "Calendar provider connected"
                } else {
                    "Serving sample meeting data"
                },
            },
            "openai": {
                "configured": llm,
                "status": if llm { "active" } else { "fallback_mode" },
                "message": if llm {
                    "AI summaries enabled"
                } else {
                    "Serving generated mock summaries"
                },
            },
            "database": {
                "configured": database,
                "status": if database { "active" } else { "memory_only" },
                "message": if database {
                    "Durable store attached"
                } else {
                    "State is in-process only and lost on restart"
                },
            },
            "websocket": {
                "status": "active",
                "connectedClients": ctx.hub.connected_users().len(),
            },
        },
        "recommendations": recommendations,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
