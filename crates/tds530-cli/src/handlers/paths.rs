//! Paths command handler.
//!
//! Displays resolved paths for diagnostics, in `key = value` format.

use std::fmt;
use std::path::PathBuf;

use tds530_core::{WwwDirResolution, data_root, env_file_path, resolve_www_dir};

use crate::error::CliError;

/// Paths the application reads from or writes to.
#[derive(Debug)]
pub struct ResolvedPaths {
    pub data_root: PathBuf,
    pub env_file: PathBuf,
    pub env_file_exists: bool,
    pub www: Option<WwwDirResolution>,
}

impl ResolvedPaths {
    pub fn resolve(www_override: Option<&str>) -> Result<Self, CliError> {
        let env_file = env_file_path()?;
        Ok(Self {
            data_root: data_root()?,
            env_file_exists: env_file.exists(),
            env_file,
            www: resolve_www_dir(www_override)?,
        })
    }
}

impl fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "data_root = {}", self.data_root.display())?;
        writeln!(
            f,
            "env_file = {}{}",
            self.env_file.display(),
            if self.env_file_exists { "" } else { " (missing)" }
        )?;
        match &self.www {
            Some(www) => write!(f, "www_dir = {} ({:?})", www.path.display(), www.source),
            None => write!(f, "www_dir = (none, API only)"),
        }
    }
}

/// Execute the paths command.
pub fn execute() -> Result<(), CliError> {
    let paths = ResolvedPaths::resolve(None)?;
    println!("{paths}");
    Ok(())
}
