#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod utils;

// Re-export primary types for convenient access
pub use commands::{Commands, ConfigCommand, InstrumentArgs, RunArgs};
pub use error::CliError;
pub use parser::Cli;
