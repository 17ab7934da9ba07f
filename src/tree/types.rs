//! Tree entry types and comparison records
//!
//! These types describe what the enumerator finds under a root and what the
//! classifier decides about a pair of paths. Both record types are stored in
//! [`Sequence`]s through the element operations defined at the bottom of
//! this module.

use crate::error::SequenceResult;
use crate::sequence::{ElementOps, Sequence, SlotOps};
use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Type of filesystem entry, read without following symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FileKind {
    /// Regular file
    File = 0,
    /// Directory
    Directory = 1,
    /// Symbolic link
    Symlink = 2,
    /// Block device
    BlockDevice = 3,
    /// Character device
    CharDevice = 4,
    /// Named pipe (FIFO)
    Fifo = 5,
    /// Unix socket
    Socket = 6,
    /// Unknown type
    Unknown = 255,
}

impl FileKind {
    /// Convert from a `std::fs::FileType`
    pub fn from_file_type(file_type: fs::FileType) -> Self {
        if file_type.is_file() {
            return FileKind::File;
        }
        if file_type.is_dir() {
            return FileKind::Directory;
        }
        if file_type.is_symlink() {
            return FileKind::Symlink;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if file_type.is_block_device() {
                return FileKind::BlockDevice;
            }
            if file_type.is_char_device() {
                return FileKind::CharDevice;
            }
            if file_type.is_fifo() {
                return FileKind::Fifo;
            }
            if file_type.is_socket() {
                return FileKind::Socket;
            }
        }

        FileKind::Unknown
    }

    /// Check if this is a regular file
    pub fn is_file(&self) -> bool {
        *self == FileKind::File
    }

    /// Check if this is a directory
    pub fn is_dir(&self) -> bool {
        *self == FileKind::Directory
    }

    /// Short human-readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::File => "file",
            FileKind::Directory => "directory",
            FileKind::Symlink => "symlink",
            FileKind::BlockDevice => "block device",
            FileKind::CharDevice => "character device",
            FileKind::Fifo => "fifo",
            FileKind::Socket => "socket",
            FileKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path below a root, `/`-separated, with no leading root
///
/// Ordering and equality use the raw encoded bytes, so `a-b` sorts before
/// `a/b` exactly as a plain string comparison would.
#[derive(Debug, Clone, Default)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// The empty path, naming the root itself
    pub fn root() -> Self {
        Self(PathBuf::new())
    }

    /// Wrap an already-relative path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// True for the empty path
    pub fn is_root(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    /// Extend with one entry name
    pub fn join(&self, name: &OsStr) -> Self {
        if self.is_root() {
            Self(PathBuf::from(name))
        } else {
            Self(self.0.join(name))
        }
    }

    /// Resolve against a root directory
    pub fn resolve(&self, root: &Path) -> PathBuf {
        if self.is_root() {
            root.to_path_buf()
        } else {
            root.join(&self.0)
        }
    }

    /// Borrow as a `Path`
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Encoded bytes used for ordering
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_os_str().as_encoded_bytes()
    }
}

impl PartialEq for RelativePath {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for RelativePath {}

impl PartialOrd for RelativePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RelativePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl Hash for RelativePath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for RelativePath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Outcome of comparing one path pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Same kind; for regular files also byte-for-byte identical
    Match,
    /// Both exist but are of different kinds
    MismatchType,
    /// Both are regular files with different contents
    MismatchContent,
    /// Neither path exists
    MismatchNeitherExists,
    /// Only the first path exists
    MismatchOnlyFirstExists,
    /// Only the second path exists
    MismatchOnlySecondExists,
}

impl Outcome {
    /// Returns true if this outcome is a match
    pub fn is_match(&self) -> bool {
        matches!(self, Outcome::Match)
    }
}

/// Outcome plus the kinds observed on each side
///
/// A kind is only recorded for a side that exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialComparison {
    pub outcome: Outcome,
    pub first_kind: Option<FileKind>,
    pub second_kind: Option<FileKind>,
}

impl PartialComparison {
    pub fn neither_exists() -> Self {
        Self {
            outcome: Outcome::MismatchNeitherExists,
            first_kind: None,
            second_kind: None,
        }
    }

    pub fn only_first(kind: FileKind) -> Self {
        Self {
            outcome: Outcome::MismatchOnlyFirstExists,
            first_kind: Some(kind),
            second_kind: None,
        }
    }

    pub fn only_second(kind: FileKind) -> Self {
        Self {
            outcome: Outcome::MismatchOnlySecondExists,
            first_kind: None,
            second_kind: Some(kind),
        }
    }

    pub fn both(outcome: Outcome, first: FileKind, second: FileKind) -> Self {
        Self {
            outcome,
            first_kind: Some(first),
            second_kind: Some(second),
        }
    }

    /// True if either side is of `kind`
    pub fn involves(&self, kind: FileKind) -> bool {
        self.first_kind == Some(kind) || self.second_kind == Some(kind)
    }
}

/// A partial comparison together with the paths it was computed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullComparison {
    pub partial: PartialComparison,
    pub relative_path: RelativePath,
    pub first_path: PathBuf,
    pub second_path: PathBuf,
}

impl FullComparison {
    pub fn outcome(&self) -> Outcome {
        self.partial.outcome
    }
}

/// Sequence operations for relative paths
#[derive(Debug, Clone, Copy, Default)]
pub struct RelativePathOps;

impl ElementOps<RelativePath> for RelativePathOps {
    fn copy(&self, element: &RelativePath) -> RelativePath {
        element.clone()
    }

    fn order(&self, a: &RelativePath, b: &RelativePath) -> Ordering {
        a.cmp(b)
    }
}

/// Sequence operations for comparison records, ordered by relative path
#[derive(Debug, Clone, Copy, Default)]
pub struct FullComparisonOps;

impl ElementOps<FullComparison> for FullComparisonOps {
    fn copy(&self, element: &FullComparison) -> FullComparison {
        element.clone()
    }

    fn order(&self, a: &FullComparison, b: &FullComparison) -> Ordering {
        a.relative_path.cmp(&b.relative_path)
    }
}

/// Empty relative path sequence
pub fn path_sequence(capacity: usize) -> SequenceResult<Sequence<RelativePath>> {
    Sequence::new(capacity, Arc::new(RelativePathOps))
}

/// Empty comparison record sequence
pub fn comparison_sequence(capacity: usize) -> SequenceResult<Sequence<FullComparison>> {
    Sequence::new(capacity, Arc::new(FullComparisonOps))
}

/// `len` empty comparison slots, each filled in place by one worker
pub fn slot_sequence(len: usize) -> SequenceResult<Sequence<Option<FullComparison>>> {
    Sequence::filled(len, Arc::new(SlotOps::new(FullComparisonOps)), || None)
}
