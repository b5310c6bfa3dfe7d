//! Temperature Monitor Server
//!
//! Streams a simulated temperature reading to every connected viewer
//! over a persistent connection, producing readings only while at least
//! one viewer is attached.
//!
//! # Features
//!
//! - **Demand-driven broadcast**: the timer starts with the first
//!   subscriber and stops with the last
//! - **Dedup**: unchanged readings are not re-broadcast
//! - **Snapshot then subscribe**: every connection gets the current
//!   value immediately, never waiting for the next tick
//! - **Two transports**: WebSocket at `/ws`, SSE fallback at
//!   `/api/stream`
//! - **Bounded reconnection**: the bundled client retries with linear
//!   backoff and surfaces an explicit error state when the budget runs
//!   out
//!
//! # Modules
//!
//! - `sensor`: triangle-wave temperature simulator
//! - `broadcast`: scheduler, connection registry and session handling
//! - `api`: axum router, WebSocket/SSE handlers and REST endpoints
//! - `history`: bounded in-memory log of broadcast readings
//! - `client`: reconnecting stream consumer
//! - `types`: shared wire types
//! - `utils`: timestamp helpers
//!
//! # Example
//!
//! ```no_run
//! use temp_monitor::api::http::create_router;
//! use temp_monitor::broadcast::init_registry;
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = init_registry();
//!     let app = create_router(registry);
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod api;
pub mod broadcast;
pub mod client;
pub mod history;
pub mod sensor;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use broadcast::{ConnectionRegistry, StreamEvent, TemperatureBroadcaster};
pub use client::{ClientConfig, ConnectionStatus, ReconnectConfig, TemperatureClient};
pub use history::ReadingLog;
pub use sensor::TemperatureSimulator;
pub use types::{CurrentTemperature, MonitorResult, TemperatureReading};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
