//! Path utilities for data directories and user-configurable locations.
//!
//! - Application data root and the `.env` override file
//! - Bundled web UI directory
//! - Recording file naming
//!
//! No interactive/terminal I/O here; adapters handle user prompts.

mod config;
mod error;
mod output;
mod platform;
mod www;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{HOST_ENV, PORT_ENV, env_file_path, persist_env_value, persist_instrument};
pub use error::PathError;
pub use output::{TSV_EXTENSION, normalize_output_path, with_tsv_extension};
pub use platform::{DATA_DIR_ENV, data_root, normalize_user_path};
pub use www::{
    WWW_DIR_ENV, WWW_DIR_NAME, WwwDirResolution, WwwDirSource, has_index, resolve_www_dir,
};
