//! cmp-tree - Parallel Directory Tree Comparison
//!
//! Compares two directory trees and reports, for every relative path found
//! under either root, whether the two sides match, differ in content, differ
//! in type, or exist on one side only.
//!
//! # Features
//!
//! - **Byte-for-byte**: Regular files are compared in full, with a length
//!   check first so files of different size are never read.
//!
//! - **Parallel**: The combined path list is split into contiguous ranges and
//!   compared by a fixed pool of scoped threads, each writing into its own
//!   slice of one preallocated result buffer.
//!
//! - **Deterministic**: Results come back in sorted relative-path order no
//!   matter how many workers were used.
//!
//! - **No symlink following**: Entry types come from `symlink_metadata`.
//!
//! # Architecture
//!
//! ```text
//!   FIRST_DIR                         SECOND_DIR
//!      │                                  │
//!      ▼ enumerate                        ▼ enumerate
//! ┌──────────────┐                 ┌──────────────┐
//! │ Sequence<    │                 │ Sequence<    │
//! │ RelativePath>│                 │ RelativePath>│
//! └──────┬───────┘                 └──────┬───────┘
//!        └──────────────┬──────────────────┘
//!                       ▼ concat + sort + dedup
//!              ┌──────────────────┐
//!              │ combined universe│
//!              └────────┬─────────┘
//!                       ▼ partition
//!   ┌───────────┐ ┌───────────┐       ┌─────────────┐
//!   │ compare-0 │ │ compare-1 │  ...  │ coordinator │
//!   │ classify  │ │ classify  │       │ classify    │
//!   └─────┬─────┘ └─────┬─────┘       └──────┬──────┘
//!         ▼             ▼                    ▼
//!   ┌──────────────────────────────────────────────┐
//!   │  result slots (disjoint &mut per worker)      │
//!   └──────────────────────┬───────────────────────┘
//!                          ▼
//!              Sequence<FullComparison> → report
//! ```
//!
//! # Example
//!
//! ```bash
//! # Show mismatches only
//! cmp-tree backup/ live/
//!
//! # Show everything, colorized, with totals
//! cmp-tree -mpt old/ new/
//! ```

pub mod compare;
pub mod config;
pub mod error;
pub mod report;
pub mod scheduler;
pub mod sequence;
pub mod tree;

pub use compare::{classify, ComparisonBackend, ContentComparator};
pub use config::{CliArgs, CompareConfig, WorkerCount};
pub use error::{CmpTreeError, Result};
pub use scheduler::{TreeComparator, TreeComparison};
pub use sequence::{ElementOps, Sequence};
pub use tree::{FileKind, FullComparison, Outcome, PartialComparison, RelativePath};

/// Compare two trees with default settings
pub fn compare_trees(
    first_root: impl Into<std::path::PathBuf>,
    second_root: impl Into<std::path::PathBuf>,
) -> Result<TreeComparison> {
    TreeComparator::new(CompareConfig::new(first_root, second_root)).run()
}
