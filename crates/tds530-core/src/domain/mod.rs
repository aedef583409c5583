//! Domain types shared by every adapter.

mod sample;

pub use sample::{Reading, Sample, TIME_FORMAT};
