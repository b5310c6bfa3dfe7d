//! SSE transport for the temperature stream
//!
//! Fallback transport at `/api/stream` for clients that cannot upgrade
//! to a WebSocket. Sends `event: temperature` frames with the reading as
//! the data line, and participates in the same demand accounting as the
//! WebSocket endpoint.

pub mod handler;
