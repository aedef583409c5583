//! Configuration file utilities.
//!
//! Provides functions for reading and writing the `.env` file
//! that stores user configuration overrides.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use super::error::PathError;
use super::platform::data_root;

/// Environment variable holding the instrument host.
pub const HOST_ENV: &str = "TDS530_HOST";

/// Environment variable holding the instrument port.
pub const PORT_ENV: &str = "TDS530_PORT";

/// Location of the `.env` file that stores user overrides.
pub fn env_file_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join(".env"))
}

/// Persist a key=value pair into the `.env` file.
///
/// If the key already exists, its value is updated.
/// If the key doesn't exist, it is appended to the file.
pub fn persist_env_value(key: &str, value: &str) -> Result<(), PathError> {
    let env_path = env_file_path()?;

    let lines: Vec<String> = if env_path.exists() {
        fs::read_to_string(&env_path)
            .map_err(|e| PathError::EnvFileError {
                path: env_path.clone(),
                reason: e.to_string(),
            })?
            .lines()
            .map(std::string::ToString::to_string)
            .collect()
    } else {
        Vec::new()
    };

    let mut updated = false;
    let mut output: Vec<String> = Vec::with_capacity(lines.len() + 1);

    for line in lines {
        match line.split_once('=') {
            Some((lhs, _)) if lhs.trim() == key => {
                if !updated {
                    output.push(format!("{key}={value}"));
                    updated = true;
                }
            }
            _ => output.push(line),
        }
    }

    if !updated {
        output.push(format!("{key}={value}"));
    }
    // Ensure file ends with newline
    output.push(String::new());

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&env_path)
        .map_err(|e| PathError::EnvFileError {
            path: env_path.clone(),
            reason: e.to_string(),
        })?;

    file.write_all(output.join("\n").as_bytes())
        .map_err(|e| PathError::EnvFileError {
            path: env_path,
            reason: e.to_string(),
        })?;

    Ok(())
}

/// Persist the instrument address into `.env`.
pub fn persist_instrument(host: &str, port: u16) -> Result<(), PathError> {
    persist_env_value(HOST_ENV, host)?;
    persist_env_value(PORT_ENV, &port.to_string())
}
