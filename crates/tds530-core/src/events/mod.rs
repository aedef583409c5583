//! Acquisition events shared by the status tracker and the SSE stream.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag:
//!
//! ```json
//! { "type": "sample", "time": "2024/03/09 07:05:01", "data": [1.5, null] }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::Sample;

/// Lifecycle and data events emitted by the acquisition loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AcquisitionEvent {
    /// A connection attempt to the instrument has started.
    Connecting { address: String },

    /// The instrument accepted the connection.
    Connected { address: String },

    /// A sample was received and stored.
    Sample {
        /// Instrument timestamp, `YYYY/MM/DD HH:MM:SS`.
        time: String,
        data: Vec<Option<f64>>,
    },

    /// The connection was lost or a reply could not be read.
    Disconnected { reason: String },

    /// A failure that stops acquisition.
    Error { message: String },

    /// Acquisition was stopped on request.
    Stopped,
}

impl AcquisitionEvent {
    pub fn connecting(address: impl Into<String>) -> Self {
        Self::Connecting {
            address: address.into(),
        }
    }

    pub fn connected(address: impl Into<String>) -> Self {
        Self::Connected {
            address: address.into(),
        }
    }

    pub fn sample(sample: &Sample) -> Self {
        Self::Sample {
            time: sample.time_string(),
            data: sample.values(),
        }
    }

    pub fn disconnected(reason: impl Into<String>) -> Self {
        Self::Disconnected {
            reason: reason.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Stable name of the variant, used for logging.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Connecting { .. } => "connecting",
            Self::Connected { .. } => "connected",
            Self::Sample { .. } => "sample",
            Self::Disconnected { .. } => "disconnected",
            Self::Error { .. } => "error",
            Self::Stopped => "stopped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_event_wire_format() {
        let event = AcquisitionEvent::Sample {
            time: "2024/03/09 07:05:01".to_string(),
            data: vec![Some(1.5), None],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "sample",
                "time": "2024/03/09 07:05:01",
                "data": [1.5, null]
            })
        );
    }

    #[test]
    fn test_unit_variant_has_only_tag() {
        let json = serde_json::to_string(&AcquisitionEvent::Stopped).unwrap();
        assert_eq!(json, r#"{"type":"stopped"}"#);
        assert_eq!(AcquisitionEvent::Stopped.kind(), "stopped");
    }
}
