//! Temperature stream client
//!
//! Drives the reconnection state machine over real transports: fetches
//! the snapshot endpoint, walks the transport preference list to
//! subscribe, applies broadcast values to a watch channel and retries
//! failed connects with linear backoff until the budget runs out.

use std::pin::Pin;
use std::sync::Arc;

use eventsource_stream::{EventStreamError, Eventsource};
use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::broadcast::StreamEvent;
use crate::types::{CurrentTemperature, MonitorResult};

use super::reconnect::{
    ConnectionStatus, ReconnectConfig, ReconnectState, RetryDecision, TransportKind,
};

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL, e.g. `http://127.0.0.1:3000`
    pub base_url: String,
    pub reconnect: ReconnectConfig,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            reconnect: ReconnectConfig::default(),
        }
    }
}

/// State exposed to consumers of the client
#[derive(Debug, Clone)]
pub struct MonitorState {
    /// Most recent reading, if any has arrived
    pub temperature: Option<String>,
    pub status: ConnectionStatus,
}

impl MonitorState {
    /// True while no reading has arrived yet and the connection is still
    /// being established
    pub fn is_loading(&self) -> bool {
        self.temperature.is_none() && self.status == ConnectionStatus::Connecting
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self {
            temperature: None,
            status: ConnectionStatus::Connecting,
        }
    }
}

/// Handle for one client-side connection lifecycle.
///
/// [`start`](Self::start) spawns the connection task; calling it again
/// while the task is alive is a no-op, so a remount cannot open a second
/// connection. [`stop`](Self::stop) (or drop) aborts the task and every
/// pending reconnection attempt with it.
pub struct TemperatureClient {
    config: ClientConfig,
    state_tx: Arc<watch::Sender<MonitorState>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl TemperatureClient {
    pub fn new(config: ClientConfig) -> Self {
        let (state_tx, _) = watch::channel(MonitorState::default());
        Self {
            config,
            state_tx: Arc::new(state_tx),
            task: Mutex::new(None),
        }
    }

    /// Start the connection task if it is not already running
    pub fn start(&self) {
        let mut task = self.task.lock();
        if task.is_some() {
            return;
        }
        let config = self.config.clone();
        let state_tx = Arc::clone(&self.state_tx);
        *task = Some(tokio::spawn(run(config, state_tx)));
    }

    /// Subscribe to state updates
    pub fn state(&self) -> watch::Receiver<MonitorState> {
        self.state_tx.subscribe()
    }

    /// Most recent reading, if any
    pub fn current_temperature(&self) -> Option<String> {
        self.state_tx.borrow().temperature.clone()
    }

    /// Whether the connection task is alive
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    /// Abort the connection task and all pending reconnection attempts
    pub fn stop(&self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
            self.state_tx
                .send_modify(|state| state.status = ConnectionStatus::Closed);
        }
    }
}

impl Drop for TemperatureClient {
    fn drop(&mut self) {
        self.stop();
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type SseStream = Pin<
    Box<
        dyn Stream<Item = Result<eventsource_stream::Event, EventStreamError<reqwest::Error>>>
            + Send,
    >,
>;

enum Connection {
    WebSocket(WsStream),
    Sse(SseStream),
}

/// Why an established connection ended
enum Disconnect {
    /// The server closed the connection deliberately
    ServerClose,
    /// The connection dropped unexpectedly
    Dropped,
}

async fn run(config: ClientConfig, state: Arc<watch::Sender<MonitorState>>) {
    let mut fsm = ReconnectState::new(config.reconnect.clone());
    let http = reqwest::Client::new();

    loop {
        state.send_modify(|s| s.status = ConnectionStatus::Connecting);

        // Snapshot before subscribing, so the consumer has a value while
        // the stream is still coming up. Failure here is not fatal; the
        // stream delivers its own snapshot on attach.
        match fetch_snapshot(&http, &config.base_url).await {
            Ok(snapshot) => {
                state.send_modify(|s| s.temperature = Some(snapshot.temperature));
            }
            Err(e) => eprintln!("[Client] snapshot fetch failed: {}", e),
        }

        match connect(&http, &config).await {
            Ok(connection) => {
                fsm.record_connected();
                state.send_modify(|s| s.status = ConnectionStatus::Connected);
                eprintln!("[Client] connected");

                match stream_events(connection, &state).await {
                    Disconnect::ServerClose => {
                        if fsm.allow_server_close_reconnect() {
                            eprintln!("[Client] server closed the connection, reconnecting");
                            continue;
                        }
                        state.send_modify(|s| s.status = ConnectionStatus::Closed);
                        return;
                    }
                    Disconnect::Dropped => {
                        eprintln!("[Client] connection dropped");
                        continue;
                    }
                }
            }
            Err(e) => {
                eprintln!("[Client] connect failed: {}", e);
                match fsm.record_failure() {
                    RetryDecision::RetryAfter(delay) => tokio::time::sleep(delay).await,
                    RetryDecision::GiveUp => {
                        eprintln!("[Client] giving up after {} attempts", fsm.attempt());
                        state.send_modify(|s| s.status = ConnectionStatus::Error);
                        return;
                    }
                }
            }
        }
    }
}

async fn fetch_snapshot(
    http: &reqwest::Client,
    base_url: &str,
) -> MonitorResult<CurrentTemperature> {
    let url = format!("{}/api/temperature", base_url);
    let snapshot = http
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json::<CurrentTemperature>()
        .await?;
    Ok(snapshot)
}

/// Walk the transport preference list and return the first connection
/// that comes up
async fn connect(http: &reqwest::Client, config: &ClientConfig) -> MonitorResult<Connection> {
    let mut last_error: Option<Box<dyn std::error::Error + Send + Sync>> = None;

    for transport in &config.reconnect.transports {
        match transport {
            TransportKind::WebSocket => {
                let url = ws_url(&config.base_url);
                match connect_async(url.as_str()).await {
                    Ok((stream, _response)) => return Ok(Connection::WebSocket(stream)),
                    Err(e) => last_error = Some(Box::new(e)),
                }
            }
            TransportKind::Sse => {
                let url = format!("{}/api/stream", config.base_url);
                match http.get(&url).send().await.and_then(|r| r.error_for_status()) {
                    Ok(response) => {
                        return Ok(Connection::Sse(Box::pin(
                            response.bytes_stream().eventsource(),
                        )))
                    }
                    Err(e) => last_error = Some(Box::new(e)),
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| "no transports configured".into()))
}

fn ws_url(base_url: &str) -> String {
    let ws_base = if let Some(rest) = base_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base_url.to_string()
    };
    format!("{}/ws", ws_base)
}

/// Pump events from an established connection into the state channel
/// until it ends, and report how it ended
async fn stream_events(connection: Connection, state: &watch::Sender<MonitorState>) -> Disconnect {
    match connection {
        Connection::WebSocket(mut ws) => loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    if let Ok(StreamEvent::Temperature(value)) = serde_json::from_str(&text) {
                        apply_reading(state, value);
                    }
                }
                Some(Ok(Message::Close(_))) => return Disconnect::ServerClose,
                Some(Ok(_)) => {} // ping/pong handled by the transport
                Some(Err(_)) => return Disconnect::Dropped,
                None => return Disconnect::Dropped,
            }
        },
        Connection::Sse(mut stream) => loop {
            match stream.next().await {
                Some(Ok(event)) if event.event == "temperature" => {
                    apply_reading(state, event.data);
                }
                Some(Ok(_)) => {} // keep-alive comments and unknown events
                Some(Err(_)) => return Disconnect::Dropped,
                // A cleanly ended SSE stream is a server-side close
                None => return Disconnect::ServerClose,
            }
        },
    }
}

fn apply_reading(state: &watch::Sender<MonitorState>, value: String) {
    state.send_modify(|s| {
        s.temperature = Some(value);
        s.status = ConnectionStatus::Connected;
    });
}
