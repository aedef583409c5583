//! SSE event broadcaster for real-time event streaming.
//!
//! The broadcaster implements [`AcquisitionEventEmitter`], so the acquisition
//! loop can publish straight into it. Every connected browser gets its own
//! subscription on a broadcast channel.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::Stream;
use tds530_core::{AcquisitionEvent, AcquisitionEventEmitter};
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_util::sync::CancellationToken;

/// Default number of buffered events per subscriber.
pub const DEFAULT_CAPACITY: usize = 256;

/// SSE broadcaster for acquisition events.
///
/// Slow clients that fall more than `capacity` events behind skip the
/// events they missed.
#[derive(Debug, Clone)]
pub struct SseBroadcaster {
    sender: broadcast::Sender<AcquisitionEvent>,
}

impl SseBroadcaster {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Create an SSE stream for a new client connection.
    ///
    /// The stream ends when `shutdown` is cancelled. A keep-alive ping is
    /// sent every 30 seconds.
    pub fn subscribe(
        self: Arc<Self>,
        shutdown: CancellationToken,
    ) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
        let receiver = self.sender.subscribe();
        let events = BroadcastStream::new(receiver).filter_map(|result| match result {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => Some(Ok(Event::default().data(json))),
                Err(e) => {
                    tracing::warn!("Failed to serialize event: {e}");
                    None
                }
            },
            Err(e) => {
                tracing::debug!("SSE stream error: {e}");
                None
            }
        });
        let stream = futures_util::StreamExt::take_until(events, shutdown.cancelled_owned());

        Sse::new(stream).keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(30))
                .text("ping"),
        )
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SseBroadcaster {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl AcquisitionEventEmitter for SseBroadcaster {
    fn emit(&self, event: AcquisitionEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }
}
