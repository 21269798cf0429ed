/*!
 * Admission policy for traversal entries
 */

use tracing::trace;

use crate::config::Config;
use crate::gitignore::IgnoreRules;
use crate::types::Entry;
use crate::utils::{extension_of, is_hidden};

/// Why an entry was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Hidden,
    NotRegularFile,
    Ignored,
    Excluded,
    Extension,
    TooLarge,
}

/// Outcome of applying the policy to one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// A regular file whose content belongs in the output, with its extension
    Admit { ext: String },
    /// Leave this entry out but keep walking
    Skip(SkipReason),
    /// A directory whose whole subtree must not be visited
    Prune,
}

/// Combines visibility, ignore rules, exclusions, extensions and size.
pub struct Selector<'a> {
    config: &'a Config,
    ignore: &'a IgnoreRules,
}

impl<'a> Selector<'a> {
    pub fn new(config: &'a Config, ignore: &'a IgnoreRules) -> Self {
        Self { config, ignore }
    }

    /// Apply the checks in order, stopping at the first rejection
    pub fn verdict(&self, entry: &Entry) -> Verdict {
        let hidden = !self.config.include_dot_files && !entry.is_root && is_hidden(&entry.path);

        if entry.is_dir {
            return if hidden {
                trace!("pruning hidden directory {}", entry.path.display());
                Verdict::Prune
            } else {
                Verdict::Skip(SkipReason::NotRegularFile)
            };
        }

        let reason = if hidden {
            SkipReason::Hidden
        } else if !entry.is_file() {
            SkipReason::NotRegularFile
        } else if self.ignore.should_ignore(&entry.path) {
            SkipReason::Ignored
        } else if self.is_excluded(entry) {
            SkipReason::Excluded
        } else {
            match extension_of(&entry.path) {
                Some(ext) if self.config.accepts_extension(&ext) => {
                    if self.config.max_size > 0 && entry.size > self.config.max_size {
                        SkipReason::TooLarge
                    } else {
                        return Verdict::Admit { ext };
                    }
                }
                _ => SkipReason::Extension,
            }
        };

        trace!("skipping {} ({:?})", entry.path.display(), reason);
        Verdict::Skip(reason)
    }

    /// Whether the entry's content belongs in the output
    pub fn admit(&self, entry: &Entry) -> bool {
        matches!(self.verdict(entry), Verdict::Admit { .. })
    }

    fn is_excluded(&self, entry: &Entry) -> bool {
        let path = entry.path.to_string_lossy();
        self.config
            .exclude_patterns
            .iter()
            .any(|pattern| !pattern.is_empty() && path.contains(pattern.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn file(path: &str, size: u64) -> Entry {
        Entry {
            path: PathBuf::from(path),
            is_dir: false,
            is_symlink: false,
            size,
            is_root: false,
        }
    }

    fn dir(path: &str) -> Entry {
        Entry {
            is_dir: true,
            ..file(path, 0)
        }
    }

    fn config() -> Config {
        Config::default().with_extensions(["go", ".RS"])
    }

    #[test]
    fn test_admits_matching_file() {
        let config = config();
        let ignore = IgnoreRules::new();
        let selector = Selector::new(&config, &ignore);

        assert_eq!(
            selector.verdict(&file("src/main.GO", 10)),
            Verdict::Admit {
                ext: "go".to_string()
            }
        );
        assert!(selector.admit(&file("lib.rs", 1)));
    }

    #[test]
    fn test_extension_filter() {
        let config = config();
        let ignore = IgnoreRules::new();
        let selector = Selector::new(&config, &ignore);

        assert_eq!(
            selector.verdict(&file("README.md", 1)),
            Verdict::Skip(SkipReason::Extension)
        );
        assert_eq!(
            selector.verdict(&file("Makefile", 1)),
            Verdict::Skip(SkipReason::Extension)
        );
    }

    #[test]
    fn test_hidden_entries() {
        let config = config();
        let ignore = IgnoreRules::new();
        let selector = Selector::new(&config, &ignore);

        assert_eq!(selector.verdict(&dir(".git")), Verdict::Prune);
        assert_eq!(
            selector.verdict(&file(".hidden.go", 1)),
            Verdict::Skip(SkipReason::Hidden)
        );
        assert_eq!(
            selector.verdict(&dir("src")),
            Verdict::Skip(SkipReason::NotRegularFile)
        );

        let root = Entry {
            is_root: true,
            ..dir("..")
        };
        assert_eq!(
            selector.verdict(&root),
            Verdict::Skip(SkipReason::NotRegularFile)
        );

        let config = config.with_include_dot_files(true);
        let selector = Selector::new(&config, &ignore);
        assert_eq!(
            selector.verdict(&dir(".git")),
            Verdict::Skip(SkipReason::NotRegularFile)
        );
        assert!(selector.admit(&file(".hidden.go", 1)));
    }

    #[test]
    fn test_symlinks_are_not_admitted() {
        let config = config();
        let ignore = IgnoreRules::new();
        let selector = Selector::new(&config, &ignore);

        let link = Entry {
            is_symlink: true,
            ..file("link.go", 8)
        };
        assert_eq!(
            selector.verdict(&link),
            Verdict::Skip(SkipReason::NotRegularFile)
        );
    }

    #[test]
    fn test_ignore_and_exclusions() {
        let config = config().with_exclude_patterns(["generated"]);
        let ignore = IgnoreRules::from_lines(["vendor"]);
        let selector = Selector::new(&config, &ignore);

        assert_eq!(
            selector.verdict(&file("vendor/x.go", 1)),
            Verdict::Skip(SkipReason::Ignored)
        );
        assert_eq!(
            selector.verdict(&file("api/generated_types.go", 1)),
            Verdict::Skip(SkipReason::Excluded)
        );
        assert!(selector.admit(&file("api/types.go", 1)));
    }

    #[test]
    fn test_size_ceiling() {
        let config = config().with_max_size(10);
        let ignore = IgnoreRules::new();
        let selector = Selector::new(&config, &ignore);

        assert!(selector.admit(&file("small.go", 5)));
        assert!(selector.admit(&file("exact.go", 10)));
        assert_eq!(
            selector.verdict(&file("big.go", 20)),
            Verdict::Skip(SkipReason::TooLarge)
        );

        let config = config.with_max_size(0);
        let selector = Selector::new(&config, &ignore);
        assert!(selector.admit(&file("big.go", u64::MAX)));
    }
}
