/*!
 * Directory traversal
 *
 * A pre-order, lexically sorted walk built on `walkdir`. Without symlink
 * following, links are reported as they are and never resolved. With
 * symlink following, each link met during the walk is resolved once:
 * file targets are visited under the target's path, directory targets
 * are walked without following the links found inside them.
 *
 * Links that are not resolved reach the selection policy as symlink
 * entries and are never admitted, even when they point at a file.
 */

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, ScopyError};
use crate::types::Entry;
use crate::utils::clean_path;

/// What the walk should do after a visit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Keep going
    Continue,
    /// Do not descend into the directory just visited
    SkipSubtree,
}

/// Sequential directory walker
#[derive(Debug, Clone, Copy, Default)]
pub struct Walker {
    follow_symlinks: bool,
}

impl Walker {
    pub fn new(follow_symlinks: bool) -> Self {
        Self { follow_symlinks }
    }

    /// Walk `root`, calling `visit` for every entry.
    ///
    /// An `Err` from the visitor aborts the walk and is returned as-is.
    pub fn walk<F>(&self, root: &Path, mut visit: F) -> Result<()>
    where
        F: FnMut(&Entry) -> Result<WalkAction>,
    {
        self.walk_tree(root, true, &mut visit)
    }

    fn walk_tree<F>(&self, root: &Path, top_level: bool, visit: &mut F) -> Result<()>
    where
        F: FnMut(&Entry) -> Result<WalkAction>,
    {
        let mut it = WalkDir::new(root).sort_by_file_name().into_iter();

        while let Some(next) = it.next() {
            let dent = match next {
                Ok(dent) => dent,
                Err(err) => {
                    let err = ScopyError::from(err);
                    if self.swallows(&err) {
                        debug!("skipping vanished path: {}", err);
                        continue;
                    }
                    return Err(err);
                }
            };

            let resolve =
                top_level && self.follow_symlinks && dent.depth() > 0 && dent.path_is_symlink();
            if resolve {
                self.visit_link(dent.path(), visit)?;
                continue;
            }

            let entry = match to_entry(&dent, top_level) {
                Ok(entry) => entry,
                Err(err) if self.swallows(&err) => {
                    debug!("skipping vanished path: {}", err);
                    continue;
                }
                Err(err) => return Err(err),
            };

            if visit(&entry)? == WalkAction::SkipSubtree && dent.file_type().is_dir() {
                it.skip_current_dir();
            }
        }

        Ok(())
    }

    /// Resolve a link and visit its target; unresolvable links are skipped
    fn visit_link<F>(&self, link: &Path, visit: &mut F) -> Result<()>
    where
        F: FnMut(&Entry) -> Result<WalkAction>,
    {
        let Some(target) = resolve_link(link) else {
            debug!("skipping unresolvable link {}", link.display());
            return Ok(());
        };

        let Ok(meta) = fs::metadata(&target) else {
            debug!("skipping dangling link {} -> {}", link.display(), target.display());
            return Ok(());
        };

        trace!("following {} -> {}", link.display(), target.display());

        if meta.is_dir() {
            self.walk_tree(&target, false, visit)
        } else {
            let entry = Entry {
                path: clean_path(&target),
                is_dir: false,
                is_symlink: false,
                size: meta.len(),
                is_root: false,
            };
            visit(&entry).map(|_| ())
        }
    }

    /// Missing paths are tolerated only while links are not followed
    fn swallows(&self, err: &ScopyError) -> bool {
        !self.follow_symlinks && err.is_not_found()
    }
}

/// Target of a link, relative targets taken from the link's directory
fn resolve_link(link: &Path) -> Option<PathBuf> {
    let target = fs::read_link(link).ok()?;
    if target.is_absolute() {
        return Some(target);
    }
    let dir = link.parent().unwrap_or_else(|| Path::new(""));
    Some(dir.join(target))
}

fn to_entry(dent: &DirEntry, top_level: bool) -> Result<Entry> {
    let meta = dent.metadata()?;
    Ok(Entry {
        path: clean_path(dent.path()),
        is_dir: dent.file_type().is_dir(),
        is_symlink: dent.path_is_symlink(),
        size: meta.len(),
        is_root: top_level && dent.depth() == 0,
    })
}
