//! Data Transfer Objects (DTOs) for the HTTP API contract.

pub mod sample;

pub use sample::LatestSampleDto;
