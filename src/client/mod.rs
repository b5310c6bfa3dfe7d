//! Client for the temperature stream
//!
//! Mirrors what a browser tab does: fetch the snapshot, subscribe over
//! the preferred transport, apply broadcast values as they arrive and
//! reconnect with a bounded retry budget when the connection fails.

pub mod monitor;
pub mod reconnect;

pub use monitor::{ClientConfig, MonitorState, TemperatureClient};
pub use reconnect::{
    ConnectionStatus, ReconnectConfig, ReconnectState, RetryDecision, TransportKind,
};
