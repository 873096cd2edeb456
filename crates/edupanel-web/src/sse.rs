//! Server-Sent Events (SSE) streaming of per-view state changes.

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_core::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::state::SharedState;
use crate::views::ViewId;

/// SSE endpoint — a page subscribes here for changes to its own view.
pub async fn view_events(
    State(state): State<SharedState>,
    Path(id): Path<ViewId>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();
    let stream = BroadcastStream::new(rx)
        .filter_map(move |result| {
            result.ok()
                .filter(|event| event.view_id == id)
                .and_then(|event| {
                    serde_json::to_string(&event).ok().map(|data| {
                        Ok(Event::default().data(data))
                    })
                })
        });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
