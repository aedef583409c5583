#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod paths;
pub mod ports;
pub mod protocol;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{Reading, Sample, TIME_FORMAT};
pub use events::AcquisitionEvent;
pub use ports::{
    AcquisitionEventEmitter, EmitterFanout, NoopEmitter, SampleSink, SinkError, SinkFanout,
};
pub use protocol::{Command, FrameCodec, ProtocolError, parse_frame};
pub use settings::{
    DEFAULT_HTTP_HOST, DEFAULT_HTTP_PORT, DEFAULT_INSTRUMENT_HOST, DEFAULT_INSTRUMENT_PORT,
    Settings, SettingsError, SettingsUpdate, validate_settings,
};

// Re-export path utilities
pub use paths::{
    PathError, WwwDirResolution, WwwDirSource, data_root, env_file_path, normalize_output_path,
    persist_instrument, resolve_www_dir,
};

#[cfg(test)]
use tempfile as _;
