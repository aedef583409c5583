//! Sample types produced by one instrument poll.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format used on the wire, in TSV files and in the HTTP API.
pub const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// A single channel reading.
///
/// `value` is `None` when the instrument sent something that is not a number
/// (overrange markers, burnout, empty fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Channel label as sent by the instrument, e.g. `M001`.
    pub channel: String,
    pub value: Option<f64>,
}

impl Reading {
    pub fn new(channel: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            channel: channel.into(),
            value,
        }
    }
}

/// One timestamped set of channel readings.
///
/// The timestamp comes from the instrument clock and carries no timezone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: NaiveDateTime,
    pub readings: Vec<Reading>,
}

impl Sample {
    pub const fn new(time: NaiveDateTime, readings: Vec<Reading>) -> Self {
        Self { time, readings }
    }

    /// Channel values in reception order.
    pub fn values(&self) -> Vec<Option<f64>> {
        self.readings.iter().map(|r| r.value).collect()
    }

    pub fn channel_count(&self) -> usize {
        self.readings.len()
    }

    /// Timestamp rendered in [`TIME_FORMAT`].
    pub fn time_string(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }
}
