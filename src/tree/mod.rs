//! Directory tree model and enumeration

pub mod enumerate;
pub mod types;

pub use enumerate::{enumerate, enumerate_from, EnumerateOptions, TreeListing};
pub use types::{
    comparison_sequence, path_sequence, slot_sequence, FileKind, FullComparison,
    FullComparisonOps, Outcome, PartialComparison, RelativePath, RelativePathOps,
};
