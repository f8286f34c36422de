//! Live feed of committed registry events.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tokio_stream::{Stream, StreamExt};

use crate::state::AppState;

/// Stream committed events via SSE, one `LoggedEvent` JSON object per message
pub async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.ledger.journal().subscribe();

    let stream = BroadcastStream::new(rx).map(|received| {
        let event = match received {
            Ok(logged) => {
                let event_json =
                    serde_json::to_string(&logged).unwrap_or_else(|_| "{}".to_string());
                Event::default()
                    .id(logged.position.to_string())
                    .event(logged.event.name())
                    .data(event_json)
            }
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event subscriber lagged");
                Event::default().comment("lagged")
            }
        };
        Ok(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
