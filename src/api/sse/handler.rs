//! SSE stream handler

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use tokio::sync::broadcast;

use crate::broadcast::{ConnectionRegistry, StreamEvent};

/// GET /api/stream - SSE stream of temperature updates
pub async fn sse_handler(
    State(registry): State<Arc<ConnectionRegistry>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut session = registry.attach();
    eprintln!("[Sse] client {} connected", session.id());

    // The session moves into the stream; when the client goes away the
    // stream is dropped and the session guard detaches
    let stream = async_stream::stream! {
        // Immediate snapshot so a late joiner never waits for a tick
        yield Ok::<_, Infallible>(Event::default()
            .event("temperature")
            .data(session.snapshot().to_string()));

        loop {
            match session.events.recv().await {
                Ok(StreamEvent::Temperature(value)) => {
                    yield Ok(Event::default().event("temperature").data(value));
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    eprintln!("[Sse] client {} lagged by {} events", session.id(), n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default().interval(Duration::from_secs(30)))
}
