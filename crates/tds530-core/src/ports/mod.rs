//! Port definitions (trait abstractions) for the storage and event side of
//! acquisition.
//!
//! Ports contain no implementation details and use only domain types.

pub mod event_emitter;
pub mod sample_sink;

pub use event_emitter::{AcquisitionEventEmitter, EmitterFanout, NoopEmitter};
pub use sample_sink::{SampleSink, SinkError, SinkFanout};
