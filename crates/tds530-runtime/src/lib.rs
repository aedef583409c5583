#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

pub mod acquisition;
pub mod client;
pub mod error;
pub mod latest;
pub mod recorder;
pub mod status;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use acquisition::{AcquisitionConfig, AcquisitionHandle, AcquisitionService, spawn_acquisition};
pub use client::{ClientOptions, InstrumentClient};
pub use error::AcquireError;
pub use latest::LatestSample;
pub use recorder::TsvRecorder;
pub use status::{AcquisitionState, AcquisitionStatus, StatusTracker};
