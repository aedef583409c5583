//! Acquisition status tracking.
//!
//! `StatusTracker` listens to acquisition events and keeps a snapshot the
//! HTTP API can serve without touching the acquisition task.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tds530_core::{AcquisitionEvent, AcquisitionEventEmitter};

/// Connection state of the acquisition loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AcquisitionState {
    #[default]
    Idle,
    Connecting,
    Connected,
    Disconnected,
    Stopped,
}

/// Snapshot of the acquisition loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionStatus {
    pub state: AcquisitionState,
    /// Instrument address of the current or last connection.
    pub address: Option<String>,
    pub samples_received: u64,
    /// Instrument timestamp of the last sample.
    pub last_sample_time: Option<String>,
    pub last_error: Option<String>,
    pub connected_since: Option<DateTime<Utc>>,
}

/// Event emitter that folds events into an [`AcquisitionStatus`].
#[derive(Debug, Default)]
pub struct StatusTracker {
    status: RwLock<AcquisitionStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> AcquisitionStatus {
        self.status
            .read()
            .map_or_else(|poisoned| poisoned.into_inner().clone(), |s| s.clone())
    }

    fn apply(status: &mut AcquisitionStatus, event: AcquisitionEvent) {
        match event {
            AcquisitionEvent::Connecting { address } => {
                status.state = AcquisitionState::Connecting;
                status.address = Some(address);
                status.connected_since = None;
            }
            AcquisitionEvent::Connected { address } => {
                status.state = AcquisitionState::Connected;
                status.address = Some(address);
                status.connected_since = Some(Utc::now());
            }
            AcquisitionEvent::Sample { time, .. } => {
                status.samples_received += 1;
                status.last_sample_time = Some(time);
            }
            AcquisitionEvent::Disconnected { reason } => {
                status.state = AcquisitionState::Disconnected;
                status.last_error = Some(reason);
                status.connected_since = None;
            }
            AcquisitionEvent::Error { message } => {
                status.state = AcquisitionState::Stopped;
                status.last_error = Some(message);
                status.connected_since = None;
            }
            AcquisitionEvent::Stopped => {
                status.state = AcquisitionState::Stopped;
                status.connected_since = None;
            }
        }
    }
}

impl AcquisitionEventEmitter for StatusTracker {
    fn emit(&self, event: AcquisitionEvent) {
        match self.status.write() {
            Ok(mut status) => Self::apply(&mut status, event),
            Err(poisoned) => Self::apply(&mut poisoned.into_inner(), event),
        }
    }
}
