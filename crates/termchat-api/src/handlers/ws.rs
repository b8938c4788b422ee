//! WebSocket upgrade handler.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, error, info, warn};

use termchat_core::error::AppError;
use termchat_realtime::OutboundFrame;

use crate::error::ApiError;
use crate::state::RelayState;

/// GET / or /ws: WebSocket upgrade. Clients authenticate in-band.
pub async fn ws_handler(
    State(state): State<RelayState>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    if !state.engine.is_running() {
        return Err(AppError::service_unavailable("Relay is shutting down").into());
    }

    Ok(ws.on_upgrade(move |socket| handle_ws_connection(state, socket)))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(state: RelayState, socket: WebSocket) {
    let (link, mut outbound) = match state.engine.connect().await {
        Ok(pair) => pair,
        Err(e) => {
            error!(error = %e, "Failed to register WebSocket connection");
            return;
        }
    };
    let conn_id = link.id();
    let (mut ws_tx, mut ws_rx) = socket.split();

    info!(conn_id = %conn_id, "WebSocket connection established");

    // Spawn outbound frame forwarder
    let mut outbound_task = tokio::spawn(async move {
        while let Some(frame) = outbound.next().await {
            match frame {
                OutboundFrame::Text(text) => {
                    if ws_tx.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                OutboundFrame::Close => {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    // Process inbound frames
    let inbound = async {
        while let Some(result) = ws_rx.next().await {
            let text = match result {
                Ok(Message::Text(text)) => text.as_str().to_owned(),
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => text,
                    Err(_) => {
                        debug!(conn_id = %conn_id, "Non UTF-8 binary frame ignored");
                        continue;
                    }
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => continue,
                Err(e) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            };
            if !link.inbound(text).await {
                break;
            }
        }
    };

    // Either side finishing ends the connection.
    tokio::select! {
        _ = inbound => outbound_task.abort(),
        _ = &mut outbound_task => {}
    }

    link.close().await;

    info!(conn_id = %conn_id, "WebSocket connection closed");
}
