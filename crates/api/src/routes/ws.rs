//! Push channel endpoint.
//!
//! Protocol, all frames JSON text:
//! - client `{"type":"identify","userId":...}` registers the socket with the
//!   hub and is answered with `identified`
//! - client `{"type":"request_refresh"}` is answered with `refresh_meetings`
//! - server-initiated frames are `{"type":<event>,"data":<payload>}`, fed
//!   from the hub (e.g. `calendar_changed` after a webhook)

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use meetsync_domain::PushMessage;

use crate::context::SharedContext;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    Identify {
        #[serde(rename = "userId")]
        user_id: String,
    },
    RequestRefresh,
}

/// `GET /ws`
pub async fn upgrade(State(ctx): State<SharedContext>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, ctx))
}

async fn handle_socket(mut socket: WebSocket, ctx: SharedContext) {
    let (tx, mut rx) = mpsc::unbounded_channel::<PushMessage>();
    let mut identity: Option<String> = None;

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                let Some(Ok(message)) = incoming else { break };
                match message {
                    Message::Text(text) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(ClientMessage::Identify { user_id }) => {
                                ctx.hub.register(&user_id, tx.clone());
                                let reply = json!({
                                    "type": "identified",
                                    "userId": user_id,
                                    "timestamp": Utc::now().to_rfc3339(),
                                });
                                identity = Some(user_id);
                                if send_json(&mut socket, &reply).await.is_err() {
                                    break;
                                }
                            }
                            Ok(ClientMessage::RequestRefresh) => {
                                let reply = json!({
                                    "type": "refresh_meetings",
                                    "timestamp": Utc::now().to_rfc3339(),
                                });
                                if send_json(&mut socket, &reply).await.is_err() {
                                    break;
                                }
                            }
                            Err(err) => {
                                debug!(error = %err, "unparseable client frame dropped");
                            }
                        }
                    }
                    Message::Close(_) => break,
                    // Ping/pong handled by axum, binary frames ignored.
                    _ => {}
                }
            }
            pushed = rx.recv() => {
                let Some(push) = pushed else { break };
                let frame = json!({ "type": push.event, "data": push.data });
                if send_json(&mut socket, &frame).await.is_err() {
                    warn!(user_id = ?identity, "push delivery failed, closing socket");
                    break;
                }
            }
        }
    }

    if let Some(user_id) = identity {
        ctx.hub.unregister(&user_id);
    }
}

async fn send_json(
    socket: &mut WebSocket,
    value: &serde_json::Value,
) -> Result<(), axum::Error> {
    socket.send(Message::Text(value.to_string().into())).await
}
