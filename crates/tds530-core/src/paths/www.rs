//! Web UI directory resolution.
//!
//! The UI ships as a `www` directory next to the executable. During
//! development it is picked up from the workspace instead.

use std::env;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::error::PathError;
use super::platform::{executable_dir, normalize_user_path, workspace_root};

/// Environment variable overriding the UI directory.
pub const WWW_DIR_ENV: &str = "TDS530_WWW_DIR";

/// Name of the bundled UI directory.
pub const WWW_DIR_NAME: &str = "www";

/// Where the UI directory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WwwDirSource {
    /// `--www` flag or settings value.
    Explicit,
    /// `TDS530_WWW_DIR`.
    EnvVar,
    /// `www` next to the executable.
    Executable,
    /// `www` in the current working directory.
    WorkingDir,
    /// `www` in the source workspace (debug builds).
    Workspace,
}

/// Resolved UI directory with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WwwDirResolution {
    pub path: PathBuf,
    pub source: WwwDirSource,
}

/// Resolve the UI directory.
///
/// An explicit path or `TDS530_WWW_DIR` must exist; the automatic
/// candidates are only used when present. Returns `Ok(None)` when no UI is
/// available, in which case only the API is served.
pub fn resolve_www_dir(explicit: Option<&str>) -> Result<Option<WwwDirResolution>, PathError> {
    let env_value = env::var(WWW_DIR_ENV).ok();
    resolve_from(explicit, env_value.as_deref(), &default_candidates())
}

fn default_candidates() -> Vec<(PathBuf, WwwDirSource)> {
    let mut candidates = Vec::new();
    if let Some(dir) = executable_dir() {
        candidates.push((dir.join(WWW_DIR_NAME), WwwDirSource::Executable));
    }
    if let Ok(cwd) = env::current_dir() {
        candidates.push((cwd.join(WWW_DIR_NAME), WwwDirSource::WorkingDir));
    }
    if cfg!(debug_assertions) {
        if let Some(root) = workspace_root() {
            candidates.push((root.join(WWW_DIR_NAME), WwwDirSource::Workspace));
        }
    }
    candidates
}

fn resolve_from(
    explicit: Option<&str>,
    env_value: Option<&str>,
    candidates: &[(PathBuf, WwwDirSource)],
) -> Result<Option<WwwDirResolution>, PathError> {
    if let Some(raw) = explicit {
        return require_dir(raw, WwwDirSource::Explicit).map(Some);
    }
    if let Some(raw) = env_value.filter(|v| !v.trim().is_empty()) {
        return require_dir(raw, WwwDirSource::EnvVar).map(Some);
    }

    Ok(candidates
        .iter()
        .find(|(path, _)| path.is_dir())
        .map(|(path, source)| WwwDirResolution {
            path: path.clone(),
            source: *source,
        }))
}

fn require_dir(raw: &str, source: WwwDirSource) -> Result<WwwDirResolution, PathError> {
    let path = normalize_user_path(raw)?;
    if !path.is_dir() {
        return Err(PathError::DirectoryNotFound(path));
    }
    Ok(WwwDirResolution { path, source })
}

/// Whether a UI directory contains the entry page.
pub fn has_index(dir: &Path) -> bool {
    dir.join("index.html").is_file()
}
