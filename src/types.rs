/*!
 * Core types shared by the traversal and aggregation stages
 */

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

/// A filesystem node as seen by the selection policy.
///
/// Produced by the walker for every node it visits and dropped right
/// after the visitor returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Cleaned path, as displayed in headers
    pub path: PathBuf,
    /// Whether the node is a directory
    pub is_dir: bool,
    /// Whether the node is an unresolved symbolic link
    pub is_symlink: bool,
    /// Size in bytes
    pub size: u64,
    /// Whether this is the root the traversal started from
    pub is_root: bool,
}

impl Entry {
    /// Whether the node is a regular file
    pub fn is_file(&self) -> bool {
        !self.is_dir && !self.is_symlink
    }
}

/// Summary statistics of one aggregation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Number of files whose content was aggregated
    pub total_files: usize,
    /// Admitted files per extension (lower-case, no leading dot)
    pub files_by_ext: HashMap<String, usize>,
    /// Sum of the on-disk sizes of admitted files
    pub total_bytes: u64,
    /// Output lines, headers and separators included
    pub total_lines: usize,
    /// Lines dropped by comment stripping
    pub comments_removed: usize,
}

impl Stats {
    /// Account for one admitted file
    pub(crate) fn record_file(&mut self, ext: &str, size: u64) {
        self.total_files += 1;
        *self.files_by_ext.entry(ext.to_string()).or_default() += 1;
        self.total_bytes += size;
    }

    /// Extension counts sorted by extension name
    pub fn sorted_extensions(&self) -> Vec<(&str, usize)> {
        let mut exts: Vec<_> = self
            .files_by_ext
            .iter()
            .map(|(ext, count)| (ext.as_str(), *count))
            .collect();
        exts.sort_unstable();
        exts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_file() {
        let mut stats = Stats::default();
        stats.record_file("go", 10);
        stats.record_file("rs", 5);
        stats.record_file("go", 1);

        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_bytes, 16);
        assert_eq!(stats.sorted_extensions(), vec![("go", 2), ("rs", 1)]);
    }

    #[test]
    fn test_entry_is_file() {
        let entry = Entry {
            path: PathBuf::from("link.go"),
            is_dir: false,
            is_symlink: true,
            size: 7,
            is_root: false,
        };
        assert!(!entry.is_file());
    }
}
