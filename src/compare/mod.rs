//! Per-pair comparison
//!
//! [`classify`] turns two absolute paths into a
//! [`PartialComparison`](crate::tree::PartialComparison). Byte equality of regular files is
//! delegated to a [`ContentComparator`] chosen by [`ComparisonBackend`].

pub mod classify;
pub mod content;

pub use classify::{classify, file_kind};
pub use content::{
    readers_equal, ContentComparator, ExternalComparator, StreamComparator, BLOCK_SIZE,
};

/// Which byte-equality backend to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComparisonBackend {
    /// Read both files in-process
    #[default]
    Stream,
    /// Run the external `cmp` utility
    External,
}

impl ComparisonBackend {
    pub fn name(&self) -> &'static str {
        match self {
            ComparisonBackend::Stream => "stream",
            ComparisonBackend::External => "external",
        }
    }

    /// Build the comparator for this backend
    pub fn comparator(&self) -> Box<dyn ContentComparator> {
        match self {
            ComparisonBackend::Stream => Box::new(StreamComparator::default()),
            ComparisonBackend::External => Box::new(ExternalComparator::default()),
        }
    }
}
