//! Platform-specific path detection and resolution.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "TDS530_DATA_DIR";

/// Directory name under the platform data directory.
const APP_DIR_NAME: &str = "tds530-logger";

/// Get the root directory for application data (`.env`, default recordings).
///
/// Resolution order:
/// 1. `TDS530_DATA_DIR` environment variable (highest priority)
/// 2. System data directory (e.g., `~/.local/share/tds530-logger`)
pub fn data_root() -> Result<PathBuf, PathError> {
    let root = match env::var(DATA_DIR_ENV) {
        Ok(path) if !path.trim().is_empty() => normalize_user_path(&path)?,
        _ => dirs::data_local_dir()
            .ok_or(PathError::NoDataDir)?
            .join(APP_DIR_NAME),
    };

    if !root.exists() {
        fs::create_dir_all(&root).map_err(|e| PathError::CreateFailed {
            path: root.clone(),
            reason: e.to_string(),
        })?;
    }

    Ok(root)
}

/// Directory containing the running executable, if it can be determined.
pub(super) fn executable_dir() -> Option<PathBuf> {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// Workspace root this crate was built from. Only meaningful in dev builds.
pub(super) fn workspace_root() -> Option<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent() // crates/
        .and_then(Path::parent)
        .map(Path::to_path_buf)
}

/// Normalize a user-provided path, expanding `~` and making it absolute.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed.starts_with("~/") || trimmed == "~" {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        if trimmed == "~" {
            home
        } else {
            home.join(trimmed.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))
    }
}
