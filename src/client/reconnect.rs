//! Reconnection state machine
//!
//! Pure attempt accounting, kept separate from the I/O so the retry
//! policy is testable without a network. The connection task asks this
//! state machine what to do after every failure instead of recursing
//! into open-ended retry calls.

use std::time::Duration;

/// Transport kinds, tried in preference order on every connect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Upgraded socket at `/ws`
    WebSocket,
    /// SSE fallback at `/api/stream`
    Sse,
}

/// Externally visible connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Establishing or re-establishing the connection
    Connecting,
    /// Receiving broadcast values
    Connected,
    /// Retry budget exhausted; no further automatic attempts
    Error,
    /// Shut down deliberately (client stop or repeated server close)
    Closed,
}

/// Configuration for reconnection behavior
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Maximum number of failed connect attempts before giving up
    pub max_attempts: u32,
    /// Base delay between attempts; the actual delay grows linearly
    /// with the attempt number
    pub backoff_ms: u64,
    /// Ordered transport preference
    pub transports: Vec<TransportKind>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_ms: 1000,
            transports: vec![TransportKind::WebSocket, TransportKind::Sse],
        }
    }
}

/// What to do after a failed connect attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait out the backoff, then try again
    RetryAfter(Duration),
    /// Budget exhausted; surface the error state
    GiveUp,
}

/// Attempt accounting for one connection lifecycle
#[derive(Debug)]
pub struct ReconnectState {
    attempt: u32,
    server_close_used: bool,
    config: ReconnectConfig,
}

impl ReconnectState {
    pub fn new(config: ReconnectConfig) -> Self {
        Self {
            attempt: 0,
            server_close_used: false,
            config,
        }
    }

    /// Failed connect attempts so far
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Record a failed connect attempt and decide whether to retry
    pub fn record_failure(&mut self) -> RetryDecision {
        self.attempt += 1;
        if self.attempt >= self.config.max_attempts {
            RetryDecision::GiveUp
        } else {
            RetryDecision::RetryAfter(Duration::from_millis(
                self.config.backoff_ms * u64::from(self.attempt),
            ))
        }
    }

    /// A successful connect resets the budget and the server-close credit
    pub fn record_connected(&mut self) {
        self.attempt = 0;
        self.server_close_used = false;
    }

    /// A server-initiated close grants exactly one immediate reconnect
    /// outside the retry budget; a second one within the same lifecycle
    /// ends the connection for good.
    pub fn allow_server_close_reconnect(&mut self) -> bool {
        if self.server_close_used {
            false
        } else {
            self.server_close_used = true;
            true
        }
    }
}
