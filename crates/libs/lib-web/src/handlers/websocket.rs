//! # WebSocket Handler
//!
//! `GET /ws` upgrades to the chat relay.
//!
//! Each connection runs two tasks: one forwards room broadcasts and direct
//! replies to the socket, the other reads client frames and hands them to
//! [`ChatRelay::handle_text`]. When either finishes the other is aborted.
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:5000/ws');
//! ws.onopen = () => ws.send(JSON.stringify({type: 'chat', sender: 'user', message: 'hello'}));
//! ws.onmessage = (event) => console.log(JSON.parse(event.data));
//! ```

use crate::chat::{ChatRelay, WELCOME_MESSAGE};
use crate::middleware::client_ip;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use shared::ChatMessage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub async fn chat_websocket(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(relay): State<Arc<ChatRelay>>,
) -> Response {
    let client_id = Uuid::new_v4().to_string();
    let client_ip = client_ip(&headers);
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    info!(
        client_id = %client_id,
        client_ip = ?client_ip,
        user_agent = ?user_agent,
        "[WS] CONNECT_ATTEMPT client_id={} ip={:?}",
        client_id,
        client_ip
    );

    // Subscribe before the upgrade so nothing broadcast after the welcome is missed.
    let room_rx = relay.subscribe();

    ws.on_upgrade(move |socket| handle_socket(socket, relay, room_rx, client_id, client_ip))
}

async fn handle_socket(
    socket: WebSocket,
    relay: Arc<ChatRelay>,
    mut room_rx: broadcast::Receiver<String>,
    client_id: String,
    client_ip: Option<String>,
) {
    let (mut sender, mut receiver) = socket.split();
    let connection_start = Instant::now();
    let messages_sent = Arc::new(AtomicU64::new(0));
    let messages_received = Arc::new(AtomicU64::new(0));

    match serde_json::to_string(&ChatMessage::welcome(WELCOME_MESSAGE)) {
        Ok(welcome) => {
            if let Err(e) = sender.send(Message::Text(welcome.into())).await {
                warn!(client_id = %client_id, error = %e, "[WS] WELCOME_FAILED client_id={}", client_id);
                return;
            }
        }
        Err(e) => {
            error!(client_id = %client_id, error = %e, "[WS] SERIALIZE_ERROR welcome");
            return;
        }
    }

    info!(
        client_id = %client_id,
        client_ip = ?client_ip,
        connections = relay.connection_count(),
        "[WS] CONNECTED client_id={} connections={}",
        client_id,
        relay.connection_count()
    );

    let (direct_tx, mut direct_rx) = mpsc::unbounded_channel::<ChatMessage>();

    // Outbound: room broadcasts plus replies meant for this connection only.
    let client_id_send = client_id.clone();
    let messages_sent_send = Arc::clone(&messages_sent);
    let mut send_task = tokio::spawn(async move {
        loop {
            let frame = tokio::select! {
                room = room_rx.recv() => match room {
                    Ok(frame) => frame,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(
                            client_id = %client_id_send,
                            skipped,
                            "[WS] LAGGED client_id={} skipped={}",
                            client_id_send,
                            skipped
                        );
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
                direct = direct_rx.recv() => match direct {
                    Some(message) => match serde_json::to_string(&message) {
                        Ok(json) => json,
                        Err(e) => {
                            error!(client_id = %client_id_send, error = %e, "[WS] SERIALIZE_ERROR");
                            continue;
                        }
                    },
                    None => break,
                },
            };

            if let Err(e) = sender.send(Message::Text(frame.into())).await {
                warn!(
                    client_id = %client_id_send,
                    error = %e,
                    "[WS] SEND_ERROR client_id={} error={}",
                    client_id_send,
                    e
                );
                break;
            }
            messages_sent_send.fetch_add(1, Ordering::Relaxed);
        }
    });

    // Inbound: client frames.
    let client_id_recv = client_id.clone();
    let messages_received_recv = Arc::clone(&messages_received);
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    messages_received_recv.fetch_add(1, Ordering::Relaxed);
                    debug!(
                        client_id = %client_id_recv,
                        size = text.len(),
                        "[WS] MESSAGE_RECEIVED client_id={} size={}",
                        client_id_recv,
                        text.len()
                    );
                    if let Some(reply) = relay.handle_text(&client_id_recv, text.as_str()) {
                        if direct_tx.send(reply).is_err() {
                            break;
                        }
                    }
                }
                Ok(Message::Binary(data)) => {
                    info!(
                        client_id = %client_id_recv,
                        size = data.len(),
                        "[WS] BINARY_IGNORED client_id={} size={}",
                        client_id_recv,
                        data.len()
                    );
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    debug!(client_id = %client_id_recv, "[WS] PING_PONG client_id={}", client_id_recv);
                }
                Ok(Message::Close(frame)) => {
                    let code = frame
                        .as_ref()
                        .map(|f| f.code.to_string())
                        .unwrap_or_else(|| "none".to_string());
                    info!(
                        client_id = %client_id_recv,
                        code = %code,
                        "[WS] CLOSE_RECEIVED client_id={} code={}",
                        client_id_recv,
                        code
                    );
                    break;
                }
                Err(e) => {
                    warn!(
                        client_id = %client_id_recv,
                        error = %e,
                        "[WS] RECV_ERROR client_id={} error={}",
                        client_id_recv,
                        e
                    );
                    break;
                }
            }
        }
    });

    tokio::select! {
        result = &mut send_task => {
            recv_task.abort();
            if let Err(e) = result {
                error!(client_id = %client_id, error = ?e, "[WS] SEND_TASK_ERROR client_id={}", client_id);
            }
        }
        result = &mut recv_task => {
            send_task.abort();
            if let Err(e) = result {
                error!(client_id = %client_id, error = ?e, "[WS] RECV_TASK_ERROR client_id={}", client_id);
            }
        }
    }

    let duration = connection_start.elapsed();
    info!(
        client_id = %client_id,
        client_ip = ?client_ip,
        duration_ms = duration.as_millis(),
        messages_sent = messages_sent.load(Ordering::Relaxed),
        messages_received = messages_received.load(Ordering::Relaxed),
        "[WS] DISCONNECTED client_id={} duration={:.2}s",
        client_id,
        duration.as_secs_f64()
    );
}
