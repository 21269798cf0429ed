/*!
 * Utility functions for scopy
 */

use std::path::{Component, Path, PathBuf};

/// Lexically clean a path: drop `.` components and trailing separators.
///
/// Walking `.` yields `./src/a.go`; the cleaned form is `src/a.go`. An
/// empty result is rendered as `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}

/// Lower-cased extension of a path's final element, without the dot.
///
/// Everything after the last `.` of the file name counts, so `.bashrc`
/// has extension `bashrc` and `Makefile` has none.
pub fn extension_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}

/// Normalise a configured extension: strip one leading dot, lower-case.
pub fn normalize_extension(ext: &str) -> String {
    ext.strip_prefix('.').unwrap_or(ext).to_lowercase()
}

/// Whether the final element of a path is a dotfile name
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
