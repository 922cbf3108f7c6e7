//! Meeting fetch and summary endpoints.
//!
//! Upstream trouble never turns into an error status here: the orchestrators
//! hand back fallback payloads. The only non-2xx outcomes are a missing
//! provider binding (401) and request validation (400).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use meetsync_domain::{Meeting, MeetingKind, SyncError};

use crate::context::SharedContext;
use crate::error::ApiError;
use crate::routes::{UserQuery, DEFAULT_USER_ID};

/// `GET /api/meetings/upcoming`
pub async fn upcoming(
    State(ctx): State<SharedContext>,
    Query(query): Query<UserQuery>,
) -> Response {
    fetch(&ctx, &query.user_id(), MeetingKind::Upcoming).await
}

/// `GET /api/meetings/past`
pub async fn past(State(ctx): State<SharedContext>, Query(query): Query<UserQuery>) -> Response {
    fetch(&ctx, &query.user_id(), MeetingKind::Past).await
}

async fn fetch(ctx: &SharedContext, user_id: &str, kind: MeetingKind) -> Response {
    match ctx.fetch.fetch_meetings(user_id, kind).await {
        Ok(payload) => Json(payload).into_response(),
        Err(SyncError::Unauthenticated(message)) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": message, "connected": false })),
        )
            .into_response(),
        Err(err) => ApiError(err).into_response(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SummarizeRequest {
    #[serde(default)]
    meeting: Option<Meeting>,
    #[serde(default)]
    user_id: Option<String>,
}

/// `POST /api/meetings/summarize`
pub async fn summarize(
    State(ctx): State<SharedContext>,
    Json(body): Json<SummarizeRequest>,
) -> Response {
    let Some(meeting) = body.meeting else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Meeting data is required" })),
        )
            .into_response();
    };
    let user_id = body.user_id.unwrap_or_else(|| DEFAULT_USER_ID.to_owned());
    Json(ctx.summaries.summarize(&meeting, &user_id).await).into_response()
}
