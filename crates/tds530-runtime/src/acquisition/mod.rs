//! Acquisition loop and its background task.

mod handle;
mod service;

pub use handle::{AcquisitionHandle, spawn_acquisition};
pub use service::{AcquisitionConfig, AcquisitionService};
