//! In-memory store for the most recent sample.

use std::sync::RwLock;

use tds530_core::{Sample, SampleSink, SinkError};

/// Holds the last recorded sample for the HTTP API.
#[derive(Debug, Default)]
pub struct LatestSample {
    inner: RwLock<Option<Sample>>,
}

impl LatestSample {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent sample, if any arrived yet.
    pub fn get(&self) -> Option<Sample> {
        self.inner
            .read()
            .map_or_else(|poisoned| poisoned.into_inner().clone(), |guard| guard.clone())
    }

    pub fn set(&self, sample: Sample) {
        match self.inner.write() {
            Ok(mut guard) => *guard = Some(sample),
            Err(poisoned) => *poisoned.into_inner() = Some(sample),
        }
    }
}

impl SampleSink for LatestSample {
    fn record(&self, sample: &Sample) -> Result<(), SinkError> {
        self.set(sample.clone());
        Ok(())
    }
}
