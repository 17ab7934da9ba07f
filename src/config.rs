//! Configuration types for cmp-tree
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use crate::compare::ComparisonBackend;
use crate::error::ConfigError;
use crate::tree::EnumerateOptions;
use clap::Parser;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Maximum reasonable worker count
pub const MAX_WORKERS: usize = 512;

/// Below this many comparisons per worker, fewer workers are used
pub const DEFAULT_MIN_PER_WORKER: usize = 60;

/// Compare two directory trees, byte for byte
#[derive(Parser, Debug, Clone)]
#[command(
    name = "cmp-tree",
    version,
    about = "Compare two directory trees, byte for byte",
    long_about = "Compares every path found under either directory against the same relative path \
                  under the other.\n\n\
                  Regular files are compared byte for byte, directories and other entries by type \
                  only. Symlinks are never followed.",
    after_help = "EXAMPLES:\n    \
        cmp-tree backup/ live/\n    \
        cmp-tree -mpt old/ new/\n    \
        cmp-tree -w 8 --exclude '\\.git' a/ b/\n    \
        cmp-tree --external-cmp a/ b/   # use the system cmp utility\n\n\
        EXIT STATUS:\n    \
        0 if every entry matches, 1 if any mismatch was found, 2 on error"
)]
pub struct CliArgs {
    /// First directory
    #[arg(value_name = "FIRST_DIR")]
    pub first_dir: PathBuf,

    /// Second directory
    #[arg(value_name = "SECOND_DIR")]
    pub second_dir: PathBuf,

    /// Print matching entries as well as mismatches
    #[arg(short = 'm', long)]
    pub matches: bool,

    /// Colorize output
    #[arg(short = 'p', long)]
    pub pretty: bool,

    /// Print file and directory match totals when done
    #[arg(short = 't', long)]
    pub totals: bool,

    /// Number of worker threads (default: one per CPU)
    #[arg(short = 'w', long, value_name = "NUM")]
    pub workers: Option<usize>,

    /// Minimum comparisons per worker before the worker count is reduced
    #[arg(long, default_value_t = DEFAULT_MIN_PER_WORKER, value_name = "NUM")]
    pub min_per_worker: usize,

    /// Compare regular files with the external `cmp` utility
    #[arg(long)]
    pub external_cmp: bool,

    /// Exclude relative paths matching pattern (can be repeated)
    #[arg(long = "exclude", value_name = "PATTERN", action = clap::ArgAction::Append)]
    pub exclude_patterns: Vec<String>,

    /// Quiet mode - suppress the header
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Requested number of workers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorkerCount {
    /// One worker per logical CPU
    #[default]
    Auto,
    /// Exactly this many, subject to the per-worker minimum
    Fixed(usize),
}

impl WorkerCount {
    /// Count before the per-worker minimum is applied
    pub fn resolve(&self) -> usize {
        match self {
            WorkerCount::Auto => num_cpus::get().max(1),
            WorkerCount::Fixed(n) => (*n).max(1),
        }
    }
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct CompareConfig {
    /// Root of the first tree
    pub first_root: PathBuf,

    /// Root of the second tree
    pub second_root: PathBuf,

    /// Requested worker count
    pub workers: WorkerCount,

    /// Minimum comparisons per worker
    pub min_per_worker: usize,

    /// Byte-equality backend
    pub backend: ComparisonBackend,

    /// Compiled exclude patterns
    pub exclude_patterns: Vec<Regex>,

    /// Print matching entries
    pub print_matches: bool,

    /// Colorize output
    pub pretty: bool,

    /// Print totals
    pub print_totals: bool,

    /// Verbose logging
    pub verbose: bool,

    /// Print the header before comparing
    pub show_header: bool,
}

impl CompareConfig {
    /// Defaults for library callers, without validation
    pub fn new(first_root: impl Into<PathBuf>, second_root: impl Into<PathBuf>) -> Self {
        Self {
            first_root: first_root.into(),
            second_root: second_root.into(),
            workers: WorkerCount::Auto,
            min_per_worker: DEFAULT_MIN_PER_WORKER,
            backend: ComparisonBackend::Stream,
            exclude_patterns: Vec::new(),
            print_matches: false,
            pretty: false,
            print_totals: false,
            verbose: false,
            show_header: false,
        }
    }

    /// Create validated config from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        validate_root(&args.first_dir)?;
        validate_root(&args.second_dir)?;

        // Validate worker count
        let workers = match args.workers {
            None => WorkerCount::Auto,
            Some(n) if n == 0 || n > MAX_WORKERS => {
                return Err(ConfigError::InvalidWorkerCount {
                    count: n,
                    max: MAX_WORKERS,
                });
            }
            Some(n) => WorkerCount::Fixed(n),
        };

        if args.min_per_worker == 0 {
            return Err(ConfigError::InvalidMinPerWorker {
                count: args.min_per_worker,
            });
        }

        // Compile exclude patterns
        let exclude_patterns = args
            .exclude_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidExcludePattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let backend = if args.external_cmp {
            ComparisonBackend::External
        } else {
            ComparisonBackend::Stream
        };

        Ok(Self {
            first_root: args.first_dir,
            second_root: args.second_dir,
            workers,
            min_per_worker: args.min_per_worker,
            backend,
            exclude_patterns,
            print_matches: args.matches,
            pretty: args.pretty,
            print_totals: args.totals,
            verbose: args.verbose,
            show_header: !args.quiet,
        })
    }

    /// Enumeration options derived from this config
    pub fn enumerate_options(&self) -> EnumerateOptions {
        EnumerateOptions {
            exclude: self.exclude_patterns.clone(),
        }
    }
}

fn validate_root(path: &Path) -> Result<(), ConfigError> {
    match path.metadata() {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::InvalidRoot {
            path: path.to_path_buf(),
            reason: "is not a directory".into(),
        }),
        Err(_) => Err(ConfigError::InvalidRoot {
            path: path.to_path_buf(),
            reason: "does not exist".into(),
        }),
    }
}
