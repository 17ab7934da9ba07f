//! Partitioned comparison scheduler
//!
//! The combined path universe is cut into contiguous index ranges, one per
//! worker. Each worker owns a disjoint `&mut` slice of the result buffer, so
//! no slot is ever shared and no locking is involved. The coordinating thread
//! runs the last range itself and joins the rest.
//!
//! ```text
//! universe: [ p0 p1 p2 | p3 p4 p5 | p6 p7 p8 p9 ]
//!              compare-0  compare-1  coordinator
//! slots:    [ r0 r1 r2 | r3 r4 r5 | r6 r7 r8 r9 ]
//! ```

pub mod coordinator;
pub mod partition;

pub use coordinator::{TreeComparator, TreeComparison};
pub use partition::{partition, worker_count};
