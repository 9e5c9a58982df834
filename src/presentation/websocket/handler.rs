//! WebSocket Connection Handler
//!
//! Upgrades `/ws?userId=..&userName=..` requests and runs one task pair per
//! connection: a reader feeding the dispatcher and a writer draining the
//! connection's outbound queue.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use validator::Validate;

use super::dispatcher::SessionEvent;
use super::messages::ServerEvent;
use super::session::SessionState;
use crate::domain::ConnectionId;
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// Identity supplied in the handshake query string
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HandshakeQuery {
    #[serde(default)]
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 64, message = "userName must be 1-64 characters"))]
    pub user_name: String,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<HandshakeQuery>,
) -> Result<Response, AppError> {
    query.validate().map_err(validation_error)?;

    let ws = ws
        .max_message_size(state.settings.websocket.max_message_size)
        .max_frame_size(state.settings.websocket.max_frame_size);

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, query)))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState, query: HandshakeQuery) {
    let connection_id = ConnectionId::new();
    let mut session = SessionState::new(query.user_id.clone());

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    state.gateway.register(connection_id, tx);
    state.dispatcher.dispatch(
        connection_id,
        SessionEvent::Connect {
            user_id: query.user_id,
            user_name: query.user_name,
        },
    );
    metrics::WEBSOCKET_CONNECTIONS_ACTIVE.inc();

    tracing::info!(
        connection_id = %connection_id,
        user_id = %session.user_id,
        "User connected"
    );

    // Forward queued events to the socket
    let mut sender_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let result = state.dispatcher.handle_frame(connection_id, text.as_str());
                        session.record_frame(result.is_ok());
                        if let Err(e) = result {
                            tracing::debug!(
                                connection_id = %connection_id,
                                error = %e,
                                "Rejected frame"
                            );
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(connection_id = %connection_id, "Connection closed");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::debug!(connection_id = %connection_id, error = %e, "WebSocket error");
                        break;
                    }
                    // Pings are answered by axum; binary frames are ignored
                    _ => {}
                }
            }

            _ = &mut sender_task => {
                tracing::debug!(connection_id = %connection_id, "Writer stopped");
                break;
            }
        }
    }

    // Cleanup
    state.dispatcher.dispatch(connection_id, SessionEvent::Disconnect);
    state.gateway.unregister(&connection_id);
    sender_task.abort();
    metrics::WEBSOCKET_CONNECTIONS_ACTIVE.dec();

    tracing::info!(
        connection_id = %connection_id,
        user_id = %session.user_id,
        frames = session.frames_received,
        rejected = session.frames_rejected,
        uptime_secs = session.uptime().as_secs(),
        "User disconnected"
    );
}
