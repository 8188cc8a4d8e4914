//! WebSocket session lifecycle
//!
//! `GET /ws?userId=<id>` upgrades to a WebSocket. The connection is
//! registered on upgrade and unregistered when the socket closes.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc::unbounded_channel;

use crate::state::AppState;

/// Handshake query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    /// Client-supplied and unvalidated
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<ConnectParams>,
) -> impl IntoResponse {
    let user_id = params.user_id.unwrap_or_default();
    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}

/// Drive one established connection until it closes
async fn handle_socket(socket: WebSocket, state: AppState, user_id: String) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = unbounded_channel::<String>();

    let handle = state.registry.register(user_id, outbound_tx);
    match serde_json::to_string(handle.session()) {
        Ok(session) => tracing::info!("WS client connected {}", session),
        Err(_) => tracing::info!(connection_id = %handle.connection_id(), "WS client connected"),
    }

    let reason = loop {
        tokio::select! {
            Some(payload) = outbound_rx.recv() => {
                if let Err(e) = sender.send(Message::Text(payload.into())).await {
                    break format!("send failed: {}", e);
                }
            }
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(frame))) => {
                    break match frame {
                        Some(frame) => format!("client closed ({})", frame.code),
                        None => "client closed".to_string(),
                    };
                }
                Some(Ok(Message::Text(text))) => {
                    tracing::debug!(
                        connection_id = %handle.connection_id(),
                        "Ignoring inbound message: {}",
                        text.as_str()
                    );
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => break format!("transport error: {}", e),
                None => break "stream ended".to_string(),
            },
        }
    };

    let connection_id = handle.connection_id().to_string();
    let session_secs = state
        .registry
        .unregister(handle)
        .map(|connected_at| (Utc::now() - connected_at).num_seconds());
    tracing::info!(?session_secs, "disconnect {} due to {}", connection_id, reason);
}
