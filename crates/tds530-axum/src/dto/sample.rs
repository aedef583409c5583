//! Sample DTOs.

use serde::{Deserialize, Serialize};
use tds530_core::Sample;

/// Body of `GET /v1/`.
///
/// `data` holds one entry per channel in instrument order; channels whose
/// value could not be read are `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestSampleDto {
    /// `YYYY/MM/DD HH:MM:SS` as reported by the instrument.
    pub time: String,
    pub data: Vec<Option<f64>>,
}

impl From<&Sample> for LatestSampleDto {
    fn from(sample: &Sample) -> Self {
        Self {
            time: sample.time_string(),
            data: sample.values(),
        }
    }
}
