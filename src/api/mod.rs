//! API module for HTTP, WebSocket and SSE endpoints
//!
//! This module exposes the temperature stream over two transports plus
//! the REST read endpoints consumed before and around subscribing.

pub mod http;
pub mod rest;
pub mod sse;
pub mod websocket;
