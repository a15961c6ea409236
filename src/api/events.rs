//! Server-sent event streams for timer observers
//!
//! `GET /timer/watch` is a direct binding: the current value first, then
//! every change. `GET /timer/events` registers on the broadcast path and
//! only sees updates sent after it connected. Both end when the client
//! goes away, which detaches the observer without touching the timer.

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use tracing::debug;

use crate::state::{AppState, TIME_UPDATE_EVENT};

/// Event name used on the direct-binding stream
pub const TIMER_EVENT: &str = "timer";

/// Handle GET /timer/watch
pub async fn watch_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Direct observer bound over SSE");
    let binding = state.timer.bind();

    let events = stream::unfold((binding, true), |(mut binding, first)| async move {
        let view = if first {
            binding.view()
        } else {
            binding.changed().await?
        };
        let event = Event::default().event(TIMER_EVENT).json_data(&view).ok()?;
        Some((Ok::<_, Infallible>(event), (binding, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /timer/events
pub async fn broadcast_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Broadcast receiver registered over SSE");
    let receiver = state.timer.subscribe();

    let events = stream::unfold(receiver, |mut receiver| async move {
        let update = receiver.recv().await?;
        let event = Event::default()
            .event(TIME_UPDATE_EVENT)
            .json_data(&update)
            .ok()?;
        Some((Ok::<_, Infallible>(event), receiver))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
