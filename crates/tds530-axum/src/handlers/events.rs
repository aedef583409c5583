//! SSE events handler.
//!
//! Streams acquisition events (connection changes, samples, errors) to
//! connected clients.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures_util::stream::Stream;

use crate::state::AppState;

pub async fn stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
    state.sse.clone().subscribe(state.shutdown.clone())
}
