//! Wire events for the temperature stream

use serde::{Deserialize, Serialize};

/// Events sent to streaming subscribers.
///
/// Serialized as `{"event":"temperature","data":"35.2"}`; the payload is
/// the reading formatted to one fractional digit. Connection lifecycle
/// (ping, close) stays at the transport layer and is not represented
/// here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A new temperature reading
    Temperature(String),
}
