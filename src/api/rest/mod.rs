//! REST API module for HTTP endpoints
//!
//! Provides the read endpoints around the stream:
//! - `GET /api/temperature` - Current reading snapshot
//! - `GET /api/temperature/history` - Recent readings, newest first
//! - `GET /api/status` - Subscriber count and timer state
//!
//! All endpoints are GET-only; other methods get a 405 from the router.

pub mod current;
pub mod history;
pub mod status;
