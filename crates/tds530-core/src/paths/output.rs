//! Recording file naming.

use std::path::{Path, PathBuf};

use super::error::PathError;
use super::platform::normalize_user_path;

/// Extension of recording files.
pub const TSV_EXTENSION: &str = "tsv";

/// Normalize a user-provided recording path.
///
/// Expands `~`, makes the path absolute and appends `.tsv` unless the name
/// already ends with it (case-insensitive).
pub fn normalize_output_path(raw: &str) -> Result<PathBuf, PathError> {
    let path = normalize_user_path(raw)?;
    Ok(with_tsv_extension(&path))
}

/// Append `.tsv` to a path that does not already carry it.
pub fn with_tsv_extension(path: &Path) -> PathBuf {
    let has_tsv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TSV_EXTENSION));

    if has_tsv {
        return path.to_path_buf();
    }

    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(TSV_EXTENSION);
    PathBuf::from(name)
}
