//! Error types for cmp-tree
//!
//! This module defines the error types for the comparison engine:
//! - Sequence container allocation failures, the only fatal run error
//! - Directory enumeration failures (recoverable, collected per root)
//! - Configuration and CLI errors, returned by config parsing
//! - Worker thread errors, logged as the coordinator recovers
//!
//! Existence and content-read failures are not errors here: the classifier
//! folds them into its outcome space.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level error type for cmp-tree
///
/// Only container allocation can abort a run. Enumeration failures travel
/// with the listing, and worker failures are recovered by the coordinator.
#[derive(Error, Debug)]
pub enum CmpTreeError {
    /// Sequence container errors
    #[error("Sequence error: {0}")]
    Sequence(#[from] SequenceError),
}

/// Sequence container errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// Backing storage could not be grown
    #[error("Failed to allocate storage for {requested} elements")]
    Allocation { requested: usize },
}

/// Directory enumeration errors
///
/// These never abort a run. The subtree that failed contributes no further
/// entries and the error is handed back alongside the listing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnumerateError {
    /// Directory could not be opened
    #[error("Failed to read directory '{path}': {reason}")]
    ReadDirFailed { path: PathBuf, reason: String },

    /// A single directory entry could not be read
    #[error("Failed to read an entry of '{path}': {reason}")]
    EntryFailed { path: PathBuf, reason: String },
}

impl EnumerateError {
    /// Returns the directory associated with this error
    pub fn path(&self) -> &Path {
        match self {
            EnumerateError::ReadDirFailed { path, .. } => path,
            EnumerateError::EntryFailed { path, .. } => path,
        }
    }
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Invalid minimum comparisons per worker
    #[error("Invalid minimum comparisons per worker {count}: must be at least 1")]
    InvalidMinPerWorker { count: usize },

    /// Root path missing or not a directory
    #[error("Provided directory '{path}' {reason}")]
    InvalidRoot { path: PathBuf, reason: String },

    /// Invalid exclude pattern
    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidExcludePattern { pattern: String, reason: String },
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker thread could not be started
    #[error("Failed to spawn worker {id}: {reason}")]
    SpawnFailed { id: usize, reason: String },

    /// Worker panicked
    #[error("Worker {id} panicked: {message}")]
    Panicked { id: usize, message: String },
}

/// Result type alias for CmpTreeError
pub type Result<T> = std::result::Result<T, CmpTreeError>;

/// Result type alias for SequenceError
pub type SequenceResult<T> = std::result::Result<T, SequenceError>;
