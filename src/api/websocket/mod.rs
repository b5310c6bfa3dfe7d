//! WebSocket transport for the temperature stream
//!
//! Provides the preferred streaming transport at `/ws`. Every connection
//! gets the current snapshot first, then each value the broadcast timer
//! fans out, as JSON frames of the form
//! `{"event":"temperature","data":"35.2"}`.

pub mod handler;
