//! Sample sink port.
//!
//! Every sample read from the instrument is handed to a sink. Adapters decide
//! what recording means: an in-memory latest value, a TSV file, or both.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::domain::Sample;

/// Errors raised while storing a sample.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Failed to open or write the output file.
    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    /// Any other storage failure.
    #[error("Sink error: {0}")]
    Other(String),
}

/// Port for storing acquired samples.
///
/// Implementations must be thread-safe. `record` is called from the
/// acquisition task once per sample, in reception order.
pub trait SampleSink: Send + Sync {
    fn record(&self, sample: &Sample) -> Result<(), SinkError>;
}

impl<T: SampleSink + ?Sized> SampleSink for Arc<T> {
    fn record(&self, sample: &Sample) -> Result<(), SinkError> {
        (**self).record(sample)
    }
}

/// Sink that records into several sinks in order.
///
/// The first failing sink aborts the remaining ones.
#[derive(Default, Clone)]
pub struct SinkFanout {
    sinks: Vec<Arc<dyn SampleSink>>,
}

impl SinkFanout {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, sink: Arc<dyn SampleSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn push(&mut self, sink: Arc<dyn SampleSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl std::fmt::Debug for SinkFanout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkFanout")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl SampleSink for SinkFanout {
    fn record(&self, sample: &Sample) -> Result<(), SinkError> {
        for sink in &self.sinks {
            sink.record(sample)?;
        }
        Ok(())
    }
}
