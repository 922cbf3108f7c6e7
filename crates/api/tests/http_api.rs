//! Endpoint tests against a fully degraded context: no database, no
//! calendar provider, no LLM. Every route still answers.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;

use meetsync_api::{routes, AppContext};
use meetsync_domain::{Config, UserProfile};

fn app() -> (Router, Arc<AppContext>) {
    let ctx = Arc::new(AppContext::new(Config::default()).expect("context"));
    (routes::router(Arc::clone(&ctx)), ctx)
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn health_reports_missing_database() {
    let (app, _ctx) = app();
    let response = app.oneshot(get("/api/health")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], false);
}

#[tokio::test]
async fn status_lists_unconfigured_services() {
    let (app, _ctx) = app();
    let response = app.oneshot(get("/api/status")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["services"]["composio"]["configured"], false);
    assert_eq!(body["services"]["composio"]["status"], "fallback_mode");
    assert_eq!(body["services"]["database"]["status"], "memory_only");
    assert!(!body["recommendations"].as_array().expect("array").is_empty());
}

#[tokio::test]
async fn meetings_require_a_provider_binding() {
    let (app, _ctx) = app();
    let response =
        app.oneshot(get("/api/meetings/upcoming?userId=u1")).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Not connected to Google Calendar");
    assert_eq!(body["connected"], false);
}

#[tokio::test]
async fn bound_user_gets_sample_data_without_a_provider() {
    let (app, ctx) = app();
    ctx.resolver.bind_entity("u1", "entity-1", &UserProfile::default()).await;

    let response =
        app.oneshot(get("/api/meetings/upcoming?userId=u1")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["fallback"], true);
    assert_eq!(body["meetings"].as_array().expect("array").len(), 5);
}

#[tokio::test]
async fn connection_status_for_unbound_user() {
    let (app, _ctx) = app();
    let response =
        app.oneshot(get("/api/connection/status?userId=nobody")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["connected"], false);
    assert!(body["entityId"].is_null());
}

#[tokio::test]
async fn initiate_without_provider_is_rejected() {
    let (app, _ctx) = app();
    let response = app
        .oneshot(post_json("/api/connection/initiate", serde_json::json!({ "userId": "u1" })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["fallback"], true);
}

#[tokio::test]
async fn callback_requires_an_authorization_code() {
    let (app, _ctx) = app();
    let response = app
        .oneshot(post_json("/api/connection/callback", serde_json::json!({ "userId": "u1" })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Authorization code is required");
}

#[tokio::test]
async fn callback_without_a_session_is_rejected() {
    let (app, _ctx) = app();
    let response = app
        .oneshot(post_json(
            "/api/connection/callback",
            serde_json::json!({ "userId": "u1", "code": "auth-code" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn summarize_requires_meeting_data() {
    let (app, _ctx) = app();
    let response = app
        .oneshot(post_json("/api/meetings/summarize", serde_json::json!({})))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Meeting data is required");
}

#[tokio::test]
async fn summarize_returns_a_mock_summary_without_an_llm() {
    let (app, _ctx) = app();
    let meeting = serde_json::json!({
        "id": "m1",
        "title": "Team Standup",
        "start": "2025-06-02T14:30:00Z",
        "end": "2025-06-02T15:00:00Z",
        "attendees": [{ "email": "a@example.com", "name": "Alice" }],
        "meetLink": "https://meet.google.com/abc",
    });
    let response = app
        .oneshot(post_json(
            "/api/meetings/summarize",
            serde_json::json!({ "meeting": meeting, "userId": "u1" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["isMock"], true);
    assert!(!body["summary"].as_str().expect("text").is_empty());
}

#[tokio::test]
async fn webhook_acknowledges_even_without_an_owner() {
    let (app, _ctx) = app();
    let response = app
        .oneshot(post_json("/api/webhook/calendar", serde_json::json!({ "type": "event.updated" })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["notified"], false);
}

#[tokio::test]
async fn webhook_setup_requires_a_binding() {
    let (app, _ctx) = app();
    let response = app
        .oneshot(post_json("/api/webhook/setup", serde_json::json!({})))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Not connected to Google Calendar");
}

#[tokio::test]
async fn webhook_setup_without_a_provider_falls_back_to_polling() {
    let (app, ctx) = app();
    ctx.resolver.bind_entity("u1", "entity-1", &UserProfile::default()).await;

    let response = app
        .oneshot(post_json("/api/webhook/setup", serde_json::json!({ "userId": "u1" })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["fallback"], "websocket_polling");
    assert_eq!(body["websocketEnabled"], true);
    assert!(body["webhook"].is_null());
}

#[tokio::test]
async fn webhook_invalidation_flows_through_to_the_next_fetch() {
    // Invalidation needs the durable cache tier; in-process entries only
    // age out. Run this flow against a real database file.
    let temp_dir = tempfile::TempDir::new().expect("temp dir");
    let mut config = Config::default();
    config.database.path =
        Some(temp_dir.path().join("meetsync.db").to_string_lossy().into_owned());
    let ctx = Arc::new(AppContext::new(config).expect("context"));
    let app = routes::router(Arc::clone(&ctx));
    ctx.resolver.bind_entity("u1", "entity-1", &UserProfile::default()).await;

    // Prime the cache.
    let first = app
        .clone()
        .oneshot(get("/api/meetings/upcoming?userId=u1"))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);

    let cached = app
        .clone()
        .oneshot(get("/api/meetings/upcoming?userId=u1"))
        .await
        .expect("response");
    assert_eq!(body_json(cached).await["cached"], true);

    let webhook = app
        .clone()
        .oneshot(post_json(
            "/api/webhook/calendar",
            serde_json::json!({ "type": "event.updated", "userId": "u1" }),
        ))
        .await
        .expect("response");
    assert_eq!(webhook.status(), StatusCode::OK);

    let refetched =
        app.oneshot(get("/api/meetings/upcoming?userId=u1")).await.expect("response");
    assert_eq!(body_json(refetched).await["cached"], false);
}
