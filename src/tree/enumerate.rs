//! Recursive relative-path enumeration
//!
//! Walks one root depth-first with `std::fs::read_dir` and lists every entry
//! as a path relative to that root. Directories are descended into only when
//! the entry itself is a directory; a symlink to a directory is listed but not
//! followed. Order of the listing is whatever the platform returns and must
//! not be relied upon.

use super::types::{path_sequence, RelativePath};
use crate::error::{EnumerateError, SequenceResult};
use crate::sequence::Sequence;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Options applied while enumerating
#[derive(Debug, Clone, Default)]
pub struct EnumerateOptions {
    /// Relative paths matching any of these are skipped, subtree included
    pub exclude: Vec<Regex>,
}

impl EnumerateOptions {
    /// Check if a relative path should be excluded
    pub fn is_excluded(&self, path: &RelativePath) -> bool {
        if self.exclude.is_empty() {
            return false;
        }
        let text = path.as_path().to_string_lossy();
        self.exclude.iter().any(|re| re.is_match(&text))
    }
}

/// Paths found under a root plus the directories that could not be read
#[derive(Debug)]
pub struct TreeListing {
    pub paths: Sequence<RelativePath>,
    pub errors: Vec<EnumerateError>,
}

impl TreeListing {
    fn new() -> SequenceResult<Self> {
        Ok(Self {
            paths: path_sequence(0)?,
            errors: Vec::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// List every path under `root`
pub fn enumerate(root: &Path, options: &EnumerateOptions) -> SequenceResult<TreeListing> {
    let listing = enumerate_from(root, &RelativePath::root(), options)?;
    debug!(
        root = %root.display(),
        paths = listing.len(),
        errors = listing.errors.len(),
        "Enumerated tree"
    );
    Ok(listing)
}

/// List every path under `root/prefix`, each prefixed with `prefix`
///
/// Unreadable directories and entries are recorded in
/// [`TreeListing::errors`] and contribute nothing further. Only container
/// allocation failure is returned as an error.
pub fn enumerate_from(
    root: &Path,
    prefix: &RelativePath,
    options: &EnumerateOptions,
) -> SequenceResult<TreeListing> {
    let mut listing = TreeListing::new()?;
    let dir = prefix.resolve(root);

    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "Failed to read directory");
            listing.errors.push(EnumerateError::ReadDirFailed {
                path: dir,
                reason: e.to_string(),
            });
            return Ok(listing);
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "Failed to read directory entry");
                listing.errors.push(EnumerateError::EntryFailed {
                    path: dir.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let name = entry.file_name();
        if name == "." || name == ".." {
            continue;
        }

        let relative = prefix.join(&name);
        if options.is_excluded(&relative) {
            debug!(path = %relative, "Excluded");
            continue;
        }

        // file_type() does not follow symlinks
        let is_dir = match entry.file_type() {
            Ok(file_type) => file_type.is_dir(),
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "Failed to read entry type");
                listing.errors.push(EnumerateError::EntryFailed {
                    path: entry.path(),
                    reason: e.to_string(),
                });
                false
            }
        };

        listing.paths.append(&relative)?;

        if is_dir {
            let sub = enumerate_from(root, &relative, options)?;
            listing.paths.concat(&sub.paths)?;
            listing.errors.extend(sub.errors);
        }
    }

    Ok(listing)
}
