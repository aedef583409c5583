//! Event emitter trait for acquisition events.
//!
//! Implementations handle transport details (status tracking, SSE, logs).

use std::sync::Arc;

use crate::events::AcquisitionEvent;

/// Trait for emitting acquisition events.
///
/// # Implementations
///
/// - `NoopEmitter` - For tests and one-shot CLI commands
/// - `EmitterFanout` - Forwards each event to several emitters
/// - Adapter-specific implementations (status tracker, Axum SSE)
pub trait AcquisitionEventEmitter: Send + Sync {
    /// Emit an acquisition event.
    ///
    /// This method should not block.
    fn emit(&self, event: AcquisitionEvent);
}

impl<T: AcquisitionEventEmitter + ?Sized> AcquisitionEventEmitter for Arc<T> {
    fn emit(&self, event: AcquisitionEvent) {
        (**self).emit(event);
    }
}

/// A no-op event emitter.
#[derive(Debug, Clone, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    pub const fn new() -> Self {
        Self
    }
}

impl AcquisitionEventEmitter for NoopEmitter {
    fn emit(&self, _event: AcquisitionEvent) {}
}

/// Emitter that clones each event into every inner emitter.
#[derive(Default, Clone)]
pub struct EmitterFanout {
    emitters: Vec<Arc<dyn AcquisitionEventEmitter>>,
}

impl EmitterFanout {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, emitter: Arc<dyn AcquisitionEventEmitter>) -> Self {
        self.emitters.push(emitter);
        self
    }
}

impl std::fmt::Debug for EmitterFanout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmitterFanout")
            .field("emitters", &self.emitters.len())
            .finish()
    }
}

impl AcquisitionEventEmitter for EmitterFanout {
    fn emit(&self, event: AcquisitionEvent) {
        for emitter in &self.emitters {
            emitter.emit(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<AcquisitionEvent>>);

    impl AcquisitionEventEmitter for Recording {
        fn emit(&self, event: AcquisitionEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_noop_emitter() {
        let emitter: Arc<dyn AcquisitionEventEmitter> = Arc::new(NoopEmitter::new());
        emitter.emit(AcquisitionEvent::Stopped);
    }

    #[test]
    fn test_fanout_delivers_to_all() {
        let a = Arc::new(Recording::default());
        let b = Arc::new(Recording::default());
        let fanout = EmitterFanout::new().with(a.clone()).with(b.clone());

        fanout.emit(AcquisitionEvent::connected("10.0.0.1:4242"));

        assert_eq!(a.0.lock().unwrap().len(), 1);
        assert_eq!(
            b.0.lock().unwrap()[0],
            AcquisitionEvent::connected("10.0.0.1:4242")
        );
    }
}
