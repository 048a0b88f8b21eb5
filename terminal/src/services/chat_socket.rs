//! # Chat Socket
//!
//! Reconnecting WebSocket client for the site's `/ws` chat endpoint.
//!
//! The connection runs in its own task and reports back on an
//! `async_channel` of [`SocketEvent`]s. After a close the task retries at a
//! fixed interval until `max_reconnect_attempts` is used up; the counter resets
//! on every successful open. With `fallback_on_exhaustion` set the socket then
//! switches to a local canned responder and keeps accepting messages as if it
//! were still connected.
//!
//! ```text
//! connect ──► open ──► Connected ──► frames ──► close ──► Disconnected
//!                                                       │
//!             ┌── attempts < max ── sleep(interval) ◄───┤
//!             │                                         │
//!             ▼                   attempts >= max ──────┴──► FallbackEngaged + Connected
//!          connect                                            (or stop)
//! ```

use super::fallback;
use crate::core::error::{ClientError, Result};
use async_channel::{Receiver, Sender};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use shared::ChatMessage;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

type ChatStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a closing connection gets to finish its close handshake.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

// region: --- Options

/// WebSocket URL for a site origin: `http` becomes `ws`, `https` becomes `wss`, plus `/ws`.
pub fn ws_url(site_url: &str) -> String {
    let base = site_url.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    format!("{base}/ws")
}

#[derive(Debug, Clone)]
pub struct SocketOptions {
    pub url: String,
    pub auto_reconnect: bool,
    /// Fixed delay between attempts.
    pub reconnect_interval: Duration,
    pub max_reconnect_attempts: u32,
    /// Switch to the local responder once attempts run out.
    pub fallback_on_exhaustion: bool,
    /// Delay before a local reply is delivered in fallback mode.
    pub fallback_delay: Duration,
}

impl SocketOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auto_reconnect: true,
            reconnect_interval: Duration::from_secs(5),
            max_reconnect_attempts: 5,
            fallback_on_exhaustion: false,
            fallback_delay: Duration::from_millis(500),
        }
    }
}

// endregion: --- Options

/// Everything the socket reports to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketEvent {
    Connected,
    Message(ChatMessage),
    Disconnected,
    Error(String),
    FallbackEngaged,
}

#[derive(Default)]
struct LinkState {
    /// Present while a socket is open.
    outbound: Option<mpsc::UnboundedSender<String>>,
    connected: bool,
    fallback: bool,
    attempts: u32,
}

// region: --- ChatSocket

pub struct ChatSocket {
    options: SocketOptions,
    state: Arc<Mutex<LinkState>>,
    events_tx: Sender<SocketEvent>,
    events_rx: Receiver<SocketEvent>,
    task: Option<JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl ChatSocket {
    pub fn new(options: SocketOptions) -> Self {
        let (events_tx, events_rx) = async_channel::unbounded();
        Self {
            options,
            state: Arc::new(Mutex::new(LinkState::default())),
            events_tx,
            events_rx,
            task: None,
            shutdown: None,
        }
    }

    /// Receiver for [`SocketEvent`]s. Clones share one queue.
    pub fn events(&self) -> Receiver<SocketEvent> {
        self.events_rx.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    pub fn is_fallback(&self) -> bool {
        self.state.lock().fallback
    }

    /// Retries used since the last successful open.
    pub fn reconnect_attempts(&self) -> u32 {
        self.state.lock().attempts
    }

    /// Start (or restart) the connection task.
    ///
    /// In fallback mode no socket is opened; the socket just reports itself connected again.
    /// Must be called from within a Tokio runtime.
    pub fn connect(&mut self) {
        let in_fallback = {
            let mut state = self.state.lock();
            if state.fallback {
                state.connected = true;
            }
            state.fallback
        };
        if in_fallback {
            info!("[CHAT] CONNECT fallback mode, no socket opened");
            emit(&self.events_tx, SocketEvent::Connected);
            return;
        }

        self.stop_task();

        let link = ConnectionLoop {
            options: self.options.clone(),
            state: Arc::clone(&self.state),
            events: self.events_tx.clone(),
        };
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown = Some(shutdown_tx);
        self.task = Some(tokio::spawn(link.run(shutdown_rx)));
    }

    /// Send a frame to the server, or to the local responder in fallback mode.
    ///
    /// Returns false if there is no open socket to queue it on.
    pub fn send_message(&self, message: &ChatMessage) -> bool {
        match self.try_send(message) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "[CHAT] SEND_FAILED");
                false
            }
        }
    }

    fn try_send(&self, message: &ChatMessage) -> Result<()> {
        let (fallback, outbound) = {
            let state = self.state.lock();
            (state.fallback, state.outbound.clone())
        };

        if fallback {
            let reply = fallback::respond_to(message);
            let events = self.events_tx.clone();
            let delay = self.options.fallback_delay;
            debug!(delay_ms = delay.as_millis(), "[CHAT] FALLBACK_REPLY scheduled");
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                emit(&events, SocketEvent::Message(reply));
            });
            return Ok(());
        }

        let outbound = outbound.ok_or_else(|| ClientError::Socket("socket is not connected".to_string()))?;
        let json = serde_json::to_string(message).map_err(|e| ClientError::Socket(e.to_string()))?;
        outbound
            .send(json)
            .map_err(|_| ClientError::Socket("socket closed while sending".to_string()))
    }

    /// Close the socket and cancel any pending reconnect.
    pub fn disconnect(&mut self) {
        self.stop_task();
        let (was_connected, was_fallback) = {
            let mut state = self.state.lock();
            let was_connected = state.connected;
            state.connected = false;
            (was_connected, state.fallback)
        };
        info!(was_connected, fallback = was_fallback, "[CHAT] DISCONNECT");
        if was_connected || was_fallback {
            emit(&self.events_tx, SocketEvent::Disconnected);
        }
    }

    /// Ask the connection task to close its socket, aborting it after [`CLOSE_GRACE`].
    fn stop_task(&mut self) {
        self.state.lock().outbound = None;
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let Some(mut task) = self.task.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    if tokio::time::timeout(CLOSE_GRACE, &mut task).await.is_err() {
                        warn!("[CHAT] CLOSE_TIMEOUT aborting connection task");
                        task.abort();
                    }
                });
            }
            Err(_) => task.abort(),
        }
    }
}

impl Drop for ChatSocket {
    fn drop(&mut self) {
        self.disconnect();
    }
}

// endregion: --- ChatSocket

// region: --- Connection Loop

/// Why a pump returned.
#[derive(Debug, PartialEq, Eq)]
enum PumpExit {
    /// The server closed or the link failed.
    Dropped,
    /// The owner asked to close; the close frame has been sent.
    Shutdown,
}

struct ConnectionLoop {
    options: SocketOptions,
    state: Arc<Mutex<LinkState>>,
    events: Sender<SocketEvent>,
}

impl ConnectionLoop {
    async fn run(self, mut shutdown: oneshot::Receiver<()>) {
        loop {
            info!(url = %self.options.url, "[CHAT] CONNECTING url={}", self.options.url);

            let opened = tokio::select! {
                _ = &mut shutdown => {
                    debug!("[CHAT] SHUTDOWN while connecting");
                    return;
                }
                opened = connect_async(self.options.url.as_str()) => opened,
            };

            match opened {
                Ok((stream, response)) => {
                    info!(status = ?response.status(), "[CHAT] CONNECTED url={}", self.options.url);
                    let (out_tx, out_rx) = mpsc::unbounded_channel();
                    {
                        let mut state = self.state.lock();
                        state.attempts = 0;
                        state.connected = true;
                        state.outbound = Some(out_tx);
                    }
                    emit(&self.events, SocketEvent::Connected);

                    if self.pump(stream, out_rx, &mut shutdown).await == PumpExit::Shutdown {
                        info!("[CHAT] CLOSED by client");
                        return;
                    }

                    let mut state = self.state.lock();
                    state.connected = false;
                    state.outbound = None;
                }
                Err(e) => {
                    warn!(url = %self.options.url, error = %e, "[CHAT] CONNECT_FAILED error={}", e);
                    emit(&self.events, SocketEvent::Error(e.to_string()));
                }
            }

            emit(&self.events, SocketEvent::Disconnected);

            let attempts = self.state.lock().attempts;
            let max = self.options.max_reconnect_attempts;

            if self.options.auto_reconnect && attempts < max {
                let attempt = attempts + 1;
                self.state.lock().attempts = attempt;
                info!(
                    attempt,
                    max,
                    interval_ms = self.options.reconnect_interval.as_millis(),
                    "[CHAT] RECONNECT_SCHEDULED attempt={}/{}",
                    attempt,
                    max
                );
                tokio::select! {
                    _ = &mut shutdown => {
                        debug!("[CHAT] SHUTDOWN reconnect cancelled");
                        return;
                    }
                    _ = tokio::time::sleep(self.options.reconnect_interval) => {}
                }
                continue;
            }

            if attempts >= max && self.options.fallback_on_exhaustion {
                {
                    let mut state = self.state.lock();
                    state.fallback = true;
                    state.connected = true;
                }
                warn!(attempts, "[CHAT] FALLBACK_ENGAGED after {} attempts", attempts);
                emit(&self.events, SocketEvent::FallbackEngaged);
                emit(&self.events, SocketEvent::Connected);
            } else {
                info!(attempts, "[CHAT] STOPPED");
            }
            break;
        }
    }

    /// Shuttle frames until either side closes.
    ///
    /// A shutdown signal, or the outbound sender being dropped, sends a close frame first.
    async fn pump(
        &self,
        stream: ChatStream,
        mut outbound: mpsc::UnboundedReceiver<String>,
        shutdown: &mut oneshot::Receiver<()>,
    ) -> PumpExit {
        let (mut write, mut read) = stream.split();

        loop {
            tokio::select! {
                _ = &mut *shutdown => {
                    close_quietly(&mut write).await;
                    return PumpExit::Shutdown;
                }
                frame = outbound.recv() => match frame {
                    Some(json) => {
                        if let Err(e) = write.send(Message::Text(json)).await {
                            warn!(error = %e, "[CHAT] SEND_ERROR error={}", e);
                            emit(&self.events, SocketEvent::Error(e.to_string()));
                            return PumpExit::Dropped;
                        }
                    }
                    None => {
                        close_quietly(&mut write).await;
                        return PumpExit::Shutdown;
                    }
                },
                incoming = read.next() => match incoming {
                    Some(Ok(Message::Text(text))) => match serde_json::from_str::<ChatMessage>(&text) {
                        Ok(message) => emit(&self.events, SocketEvent::Message(message)),
                        Err(e) => warn!(error = %e, size = text.len(), "[CHAT] UNPARSEABLE_FRAME dropped"),
                    },
                    Some(Ok(Message::Close(frame))) => {
                        info!(frame = ?frame, "[CHAT] CLOSE_RECEIVED");
                        return PumpExit::Dropped;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "[CHAT] RECV_ERROR error={}", e);
                        emit(&self.events, SocketEvent::Error(e.to_string()));
                        return PumpExit::Dropped;
                    }
                    None => return PumpExit::Dropped,
                },
            }
        }
    }
}

async fn close_quietly(write: &mut SplitSink<ChatStream, Message>) {
    if let Err(e) = write.close().await {
        debug!(error = %e, "[CHAT] CLOSE_HANDSHAKE failed");
    }
}

// endregion: --- Connection Loop

fn emit(events: &Sender<SocketEvent>, event: SocketEvent) {
    // Unbounded: only fails once every receiver is gone.
    let _ = events.try_send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{MessageKind, Sender as Author};
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    const WAIT: Duration = Duration::from_secs(5);

    async fn next_event(events: &Receiver<SocketEvent>) -> SocketEvent {
        tokio::time::timeout(WAIT, events.recv())
            .await
            .expect("timed out waiting for socket event")
            .expect("event channel closed")
    }

    /// Echo server that greets each connection first.
    async fn echo_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut ws = accept_async(stream).await.unwrap();
                    let welcome = serde_json::to_string(&ChatMessage::welcome("hi")).unwrap();
                    ws.send(Message::Text(welcome)).await.unwrap();
                    while let Some(Ok(msg)) = ws.next().await {
                        if msg.is_text() && ws.send(msg).await.is_err() {
                            break;
                        }
                    }
                });
            }
        });
        format!("ws://{addr}/ws")
    }

    async fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("ws://{addr}/ws")
    }

    fn quick_options(url: String) -> SocketOptions {
        SocketOptions {
            reconnect_interval: Duration::from_millis(10),
            fallback_delay: Duration::from_millis(10),
            ..SocketOptions::new(url)
        }
    }

    #[test]
    fn test_ws_url_maps_scheme() {
        assert_eq!(ws_url("http://localhost:5000"), "ws://localhost:5000/ws");
        assert_eq!(ws_url("https://smartscaleai.ai/"), "wss://smartscaleai.ai/ws");
    }

    #[tokio::test]
    async fn test_connect_delivers_frames_and_sends() {
        // Arrange
        let url = echo_server().await;
        let mut socket = ChatSocket::new(quick_options(url));
        let events = socket.events();

        // Act
        socket.connect();

        // Assert
        assert_eq!(next_event(&events).await, SocketEvent::Connected);
        match next_event(&events).await {
            SocketEvent::Message(m) => assert_eq!(m.kind, MessageKind::Welcome),
            other => panic!("expected welcome, got {other:?}"),
        }
        assert!(socket.is_connected());
        assert!(!socket.is_fallback());

        let outgoing = ChatMessage::chat(Author::User, "hello");
        assert!(socket.send_message(&outgoing));
        assert_eq!(next_event(&events).await, SocketEvent::Message(outgoing));
    }

    #[tokio::test]
    async fn test_exhausted_retries_engage_fallback() {
        // Arrange
        let options = SocketOptions {
            max_reconnect_attempts: 2,
            fallback_on_exhaustion: true,
            ..quick_options(closed_port_url().await)
        };
        let mut socket = ChatSocket::new(options);
        let events = socket.events();

        // Act
        socket.connect();

        // Assert: the first try plus two retries, then fallback.
        let mut disconnects = 0;
        loop {
            match next_event(&events).await {
                SocketEvent::Disconnected => disconnects += 1,
                SocketEvent::Error(_) => {}
                SocketEvent::FallbackEngaged => break,
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(disconnects, 3);
        assert_eq!(next_event(&events).await, SocketEvent::Connected);
        assert!(socket.is_fallback());
        assert!(socket.is_connected());

        assert!(socket.send_message(&ChatMessage::chat(Author::User, "hello there")));
        match next_event(&events).await {
            SocketEvent::Message(reply) => {
                assert!(reply.is_chat_from(Author::Bot));
                assert!(reply.message.starts_with("Hi there! I'm Sparky."));
            }
            other => panic!("expected fallback reply, got {other:?}"),
        }

        assert!(socket.send_message(&ChatMessage::welcome("ping")));
        match next_event(&events).await {
            SocketEvent::Message(reply) => assert_eq!(reply.message, fallback::STATIC_HOSTING_NOTICE),
            other => panic!("expected info frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_retry_without_auto_reconnect() {
        let options = SocketOptions {
            auto_reconnect: false,
            fallback_on_exhaustion: true,
            ..quick_options(closed_port_url().await)
        };
        let mut socket = ChatSocket::new(options);
        let events = socket.events();

        socket.connect();

        assert!(matches!(next_event(&events).await, SocketEvent::Error(_)));
        assert_eq!(next_event(&events).await, SocketEvent::Disconnected);
        let quiet = tokio::time::timeout(Duration::from_millis(300), events.recv()).await;
        assert!(quiet.is_err(), "expected no further events, got {quiet:?}");
        assert_eq!(socket.reconnect_attempts(), 0);
        assert!(!socket.is_fallback());
        assert!(!socket.send_message(&ChatMessage::chat(Author::User, "anyone?")));
    }

    #[tokio::test]
    async fn test_disconnect_in_fallback_reports_disconnected() {
        let options = SocketOptions {
            max_reconnect_attempts: 0,
            fallback_on_exhaustion: true,
            ..quick_options(closed_port_url().await)
        };
        let mut socket = ChatSocket::new(options);
        let events = socket.events();
        socket.connect();
        while next_event(&events).await != SocketEvent::FallbackEngaged {}
        assert_eq!(next_event(&events).await, SocketEvent::Connected);

        socket.disconnect();

        assert_eq!(next_event(&events).await, SocketEvent::Disconnected);
        assert!(!socket.is_connected());

        socket.connect();
        assert_eq!(next_event(&events).await, SocketEvent::Connected);
        assert!(socket.is_connected());
    }

    #[tokio::test]
    async fn test_disconnect_sends_close_frame() {
        // Arrange
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (seen_tx, seen_rx) = oneshot::channel();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            let _ = seen_tx.send(ws.next().await);
        });
        let mut socket = ChatSocket::new(quick_options(format!("ws://{addr}/ws")));
        let events = socket.events();
        socket.connect();
        assert_eq!(next_event(&events).await, SocketEvent::Connected);

        // Act
        socket.disconnect();

        // Assert
        let seen = tokio::time::timeout(WAIT, seen_rx).await.unwrap().unwrap();
        assert!(matches!(seen, Some(Ok(Message::Close(_)))), "server saw {seen:?}");
        assert_eq!(next_event(&events).await, SocketEvent::Disconnected);
        let quiet = tokio::time::timeout(Duration::from_millis(200), events.recv()).await;
        assert!(quiet.is_err(), "expected no reconnect, got {quiet:?}");
    }

    #[tokio::test]
    async fn test_reopen_resets_attempts() {
        // First connection is closed by the server straight away, the second stays open.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut first = accept_async(stream).await.unwrap();
            first.close(None).await.unwrap();
            let (stream, _) = listener.accept().await.unwrap();
            let mut second = accept_async(stream).await.unwrap();
            while second.next().await.is_some() {}
        });
        let mut socket = ChatSocket::new(quick_options(format!("ws://{addr}/ws")));
        let events = socket.events();

        socket.connect();

        assert_eq!(next_event(&events).await, SocketEvent::Connected);
        assert_eq!(next_event(&events).await, SocketEvent::Disconnected);
        assert_eq!(next_event(&events).await, SocketEvent::Connected);
        assert_eq!(socket.reconnect_attempts(), 0);
    }
}
