/*!
 * Permissive `.gitignore`-style exclusion
 *
 * Patterns are matched two ways, and either one ignores the path:
 *
 * 1. as a glob, resolved against the directory of the candidate path
 *    (absolute patterns are used as-is);
 * 2. as a plain substring of the candidate path.
 *
 * This is not gitignore semantics. Negation (`!pattern`), directory-only
 * markers (trailing `/`) and anchoring (leading `/`) carry no special
 * meaning, and the substring rule over-matches: a `build` pattern
 * ignores `src/rebuild.go` as well as `build/x.go`.
 */

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use glob_match::glob_match;
use tracing::{debug, trace};

use crate::error::{Result, ScopyError};
use crate::utils::clean_path;

/// Name of the ignore file looked up at the traversal root
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Ordered set of raw ignore patterns
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<String>,
}

impl IgnoreRules {
    /// An empty rule set that ignores nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rule set from raw lines, skipping blanks and `#` comments
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Self::new();
        for line in lines {
            rules.push_line(line.as_ref());
        }
        rules
    }

    /// Append the patterns of the ignore file at `path`
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let to_error = |source| ScopyError::IgnoreFile {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(to_error)?;
        let mut reader = BufReader::new(file);

        // Patterns are raw bytes; undecodable ones are kept lossily
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).map_err(to_error)? == 0 {
                break;
            }
            self.push_line(&String::from_utf8_lossy(&buf));
        }

        debug!(
            "loaded {} ignore patterns from {}",
            self.patterns.len(),
            path.display()
        );
        Ok(())
    }

    /// Load `<root>/.gitignore` when present; absence yields an empty set.
    ///
    /// Anything at that path that cannot be read as a file, such as a
    /// directory, fails the load.
    pub fn load_from_root(root: &Path) -> Result<Self> {
        let mut rules = Self::new();
        let path = root.join(IGNORE_FILE_NAME);
        match fs::metadata(&path) {
            Ok(_) => rules.load(&path)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                trace!("no ignore file at {}", path.display());
            }
            Err(source) => return Err(ScopyError::IgnoreFile { path, source }),
        }
        Ok(rules)
    }

    fn push_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }
        self.patterns.push(line.to_string());
    }

    #[cfg(test)]
    fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether any pattern excludes `path`
    pub fn should_ignore(&self, path: &Path) -> bool {
        let candidate = path.to_string_lossy();

        for pattern in &self.patterns {
            let resolved = if Path::new(pattern).is_absolute() {
                clean_path(Path::new(pattern))
            } else {
                let dir = path.parent().unwrap_or_else(|| Path::new(""));
                clean_path(&dir.join(pattern))
            };

            if glob_match(&resolved.to_string_lossy(), &candidate) {
                trace!("{} matches ignore glob {}", candidate, resolved.display());
                return true;
            }

            if candidate.contains(pattern.as_str()) {
                trace!("{} contains ignore pattern {}", candidate, pattern);
                return true;
            }
        }

        false
    }
}
