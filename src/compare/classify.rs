//! Pair classification
//!
//! Precedence, first match wins:
//!
//! ```text
//! neither exists          → MismatchNeitherExists
//! only one exists         → MismatchOnlyFirstExists / MismatchOnlySecondExists
//! kinds differ            → MismatchType
//! both directories        → Match
//! both regular files      → Match / MismatchContent (byte equality)
//! any other shared kind   → Match
//! ```
//!
//! Symbolic links are never followed. A link is its own kind, so a link to
//! a regular file against an identical regular file is `MismatchType`, and
//! two links match without their targets being read.

use super::content::ContentComparator;
use crate::tree::{FileKind, Outcome, PartialComparison};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Kind of the entry at `path`, or `None` if its metadata cannot be read
pub fn file_kind(path: &Path) -> Option<FileKind> {
    match fs::symlink_metadata(path) {
        Ok(metadata) => Some(FileKind::from_file_type(metadata.file_type())),
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                debug!(path = %path.display(), error = %e, "Treating unreadable entry as missing");
            }
            None
        }
    }
}

/// Classify one path pair
///
/// Kinds come from [`file_kind`], which reads link metadata rather than
/// following the link.
pub fn classify(
    first: &Path,
    second: &Path,
    comparator: &dyn ContentComparator,
) -> PartialComparison {
    match (file_kind(first), file_kind(second)) {
        (None, None) => PartialComparison::neither_exists(),
        (Some(kind), None) => PartialComparison::only_first(kind),
        (None, Some(kind)) => PartialComparison::only_second(kind),
        (Some(a), Some(b)) if a != b => PartialComparison::both(Outcome::MismatchType, a, b),
        (Some(kind), Some(_)) => {
            let outcome = if kind.is_file() && !comparator.equal(first, second) {
                Outcome::MismatchContent
            } else {
                Outcome::Match
            };
            PartialComparison::both(outcome, kind, kind)
        }
    }
}
