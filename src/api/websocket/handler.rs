//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::broadcast;

use crate::broadcast::{ConnectionRegistry, StreamEvent};

/// WebSocket upgrade handler for `/ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(registry): State<Arc<ConnectionRegistry>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, registry))
}

/// Handle an individual WebSocket connection
async fn handle_socket(mut socket: WebSocket, registry: Arc<ConnectionRegistry>) {
    let mut session = registry.attach();
    eprintln!("[Ws] client {} connected", session.id());

    // Snapshot goes out before anything a later tick broadcasts
    let snapshot = StreamEvent::Temperature(session.snapshot().to_string());
    if let Ok(json) = serde_json::to_string(&snapshot) {
        if socket.send(Message::Text(json)).await.is_err() {
            return; // client disconnected immediately; session drop detaches
        }
    }

    loop {
        tokio::select! {
            // Broadcast values to the client
            result = session.events.recv() => {
                match result {
                    Ok(event) => {
                        if let Ok(json) = serde_json::to_string(&event) {
                            if socket.send(Message::Text(json)).await.is_err() {
                                break; // client disconnected
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // Too slow; skip the missed values and carry on
                        eprintln!("[Ws] client {} lagged by {} events", session.id(), n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            // Transport-level frames from the client
            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Ping(data))) => {
                        let _ = socket.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => {} // nothing application-defined comes from clients
                    Some(Err(_)) => break,
                    None => break,
                }
            }
        }
    }

    eprintln!("[Ws] client {} disconnected", session.id());
    // Session guard detaches exactly once on drop, even if the transport
    // surfaced both a close frame and a stream error
}
