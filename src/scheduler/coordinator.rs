//! Comparison coordinator - runs one parallel tree comparison
//!
//! The coordinator is responsible for:
//! - Enumerating both roots and building the combined path universe
//! - Sizing the worker pool and partitioning the universe
//! - Running workers over disjoint slices of one preallocated result buffer
//! - Recovering from workers that fail to spawn or panic
//! - Stopping early when the shutdown flag is raised

use super::partition::{partition, worker_count};
use crate::compare::{classify, ContentComparator};
use crate::config::CompareConfig;
use crate::error::{EnumerateError, Result, WorkerError};
use crate::sequence::Sequence;
use crate::tree::{
    enumerate, slot_sequence, FullComparison, FullComparisonOps, RelativePath, TreeListing,
};
use std::any::Any;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Result of one tree comparison
#[derive(Debug)]
pub struct TreeComparison {
    /// One record per combined path, in sorted relative-path order
    pub comparisons: Sequence<FullComparison>,

    /// Directories that could not be read under either root
    pub enumeration_errors: Vec<EnumerateError>,

    /// Number of workers the universe was partitioned into
    pub workers: usize,

    /// False if the run was interrupted before every path was compared
    pub completed: bool,

    /// Time taken, enumeration included
    pub duration: Duration,
}

impl TreeComparison {
    /// True if every comparison matched
    pub fn all_match(&self) -> bool {
        self.comparisons.iter().all(|c| c.outcome().is_match())
    }

    /// Number of comparisons that did not match
    pub fn mismatches(&self) -> usize {
        self.comparisons
            .iter()
            .filter(|c| !c.outcome().is_match())
            .count()
    }
}

/// Coordinates a parallel comparison of two trees
pub struct TreeComparator {
    /// Configuration
    config: CompareConfig,

    /// Byte-equality backend shared by all workers
    comparator: Box<dyn ContentComparator>,

    /// Shutdown signal
    shutdown: Arc<AtomicBool>,
}

impl TreeComparator {
    /// Create a coordinator using the backend named in `config`
    pub fn new(config: CompareConfig) -> Self {
        let comparator = config.backend.comparator();
        Self::with_comparator(config, comparator)
    }

    /// Create a coordinator with a caller-supplied byte-equality backend
    pub fn with_comparator(config: CompareConfig, comparator: Box<dyn ContentComparator>) -> Self {
        Self {
            config,
            comparator,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a clone of the shutdown flag (for signal handlers)
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Run the comparison
    pub fn run(&self) -> Result<TreeComparison> {
        let start = Instant::now();
        let options = self.config.enumerate_options();

        info!(
            first = %self.config.first_root.display(),
            second = %self.config.second_root.display(),
            backend = self.comparator.name(),
            "Starting comparison"
        );

        let first = enumerate(&self.config.first_root, &options)?;
        let second = enumerate(&self.config.second_root, &options)?;
        let (universe, enumeration_errors) = combine(first, second)?;
        let paths = universe.as_slice();
        let len = paths.len();

        let workers = worker_count(len, self.config.workers, self.config.min_per_worker);
        let ranges = partition(len, workers);
        info!(paths = len, workers, "Comparing path universe");

        let mut slots = slot_sequence(len)?;

        self.run_partitions(paths, &ranges, slots.as_mut_slice());

        if !self.is_cancelled() {
            let recovered = self.fill_missing(paths, slots.as_mut_slice());
            if recovered > 0 {
                warn!(recovered, "Compared paths left over by failed workers");
            }
        }

        let completed = slots.iter().all(Option::is_some);
        if !completed {
            info!("Shutdown signal received, returning partial results");
        }

        let comparisons = slots.take_filled(Arc::new(FullComparisonOps))?;

        let duration = start.elapsed();
        info!(
            compared = comparisons.len(),
            completed,
            duration_ms = duration.as_millis() as u64,
            "Comparison finished"
        );

        Ok(TreeComparison {
            comparisons,
            enumeration_errors,
            workers,
            completed,
            duration,
        })
    }

    fn is_cancelled(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Run every range but the last on a scoped worker, the last inline
    fn run_partitions(
        &self,
        paths: &[RelativePath],
        ranges: &[Range<usize>],
        slots: &mut [Option<FullComparison>],
    ) {
        let Some((last, spawned)) = ranges.split_last() else {
            return;
        };
        let last_id = spawned.len();

        thread::scope(|scope| {
            let mut rest = slots;
            let mut handles = Vec::with_capacity(spawned.len());

            for (id, range) in spawned.iter().enumerate() {
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
                rest = tail;
                let chunk_paths = &paths[range.clone()];

                let spawn_result = thread::Builder::new()
                    .name(format!("compare-{}", id))
                    .spawn_scoped(scope, move || self.compare_range(id, chunk_paths, chunk));

                match spawn_result {
                    Ok(handle) => handles.push((id, handle)),
                    Err(e) => {
                        let err = WorkerError::SpawnFailed {
                            id,
                            reason: e.to_string(),
                        };
                        warn!(error = %err, "Range will be compared by the coordinator");
                    }
                }
            }

            debug!(count = handles.len(), "Workers spawned");
            self.compare_range(last_id, &paths[last.clone()], rest);

            for (id, handle) in handles {
                match handle.join() {
                    Ok(compared) => debug!(worker = id, compared, "Worker joined"),
                    Err(payload) => {
                        let err = WorkerError::Panicked {
                            id,
                            message: panic_message(payload.as_ref()),
                        };
                        error!(error = %err, "Worker failed, its remaining paths will be retried");
                    }
                }
            }
        });
    }

    /// Compare `paths[i]` into `slots[i]` until done or cancelled
    fn compare_range(
        &self,
        id: usize,
        paths: &[RelativePath],
        slots: &mut [Option<FullComparison>],
    ) -> usize {
        debug!(worker = id, paths = paths.len(), "Worker started");
        let mut compared = 0;
        for (relative, slot) in paths.iter().zip(slots.iter_mut()) {
            if self.is_cancelled() {
                debug!(worker = id, compared, "Worker stopping on shutdown");
                break;
            }
            *slot = Some(self.compare_one(relative));
            compared += 1;
        }
        compared
    }

    /// Compare every path whose slot is still empty
    fn fill_missing(&self, paths: &[RelativePath], slots: &mut [Option<FullComparison>]) -> usize {
        let mut filled = 0;
        for (relative, slot) in paths.iter().zip(slots.iter_mut()) {
            if slot.is_some() {
                continue;
            }
            if self.is_cancelled() {
                break;
            }
            *slot = Some(self.compare_one(relative));
            filled += 1;
        }
        filled
    }

    fn compare_one(&self, relative: &RelativePath) -> FullComparison {
        let first_path = relative.resolve(&self.config.first_root);
        let second_path = relative.resolve(&self.config.second_root);
        let partial = classify(&first_path, &second_path, self.comparator.as_ref());
        FullComparison {
            partial,
            relative_path: relative.clone(),
            first_path,
            second_path,
        }
    }
}

/// Merge both listings into one sorted, duplicate-free universe
fn combine(
    first: TreeListing,
    second: TreeListing,
) -> Result<(Sequence<RelativePath>, Vec<EnumerateError>)> {
    let TreeListing {
        paths: mut universe,
        mut errors,
    } = first;
    universe.concat(&second.paths)?;
    errors.extend(second.errors);

    universe.sort();
    universe.dedup_adjacent();
    Ok((universe, errors))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkerCount;
    use crate::tree::Outcome;
    use std::fs;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    fn trees() -> (TempDir, TempDir) {
        (tempdir().unwrap(), tempdir().unwrap())
    }

    fn config(a: &Path, b: &Path, workers: usize) -> CompareConfig {
        let mut config = CompareConfig::new(a, b);
        config.workers = WorkerCount::Fixed(workers);
        config.min_per_worker = 1;
        config
    }

    fn outcomes(result: &TreeComparison) -> Vec<(String, Outcome)> {
        result
            .comparisons
            .iter()
            .map(|c| (c.relative_path.to_string(), c.outcome()))
            .collect()
    }

    #[test]
    fn test_empty_trees() {
        let (a, b) = trees();
        let result = TreeComparator::new(config(a.path(), b.path(), 4)).run().unwrap();
        assert!(result.comparisons.is_empty());
        assert!(result.completed);
        assert_eq!(result.workers, 0);
        assert!(result.all_match());
    }

    #[test]
    fn test_results_sorted_and_deduplicated() {
        let (a, b) = trees();
        for name in ["c", "a", "b"] {
            fs::write(a.path().join(name), name).unwrap();
            fs::write(b.path().join(name), name).unwrap();
        }
        fs::write(b.path().join("a-b"), "x").unwrap();

        let result = TreeComparator::new(config(a.path(), b.path(), 2)).run().unwrap();
        assert_eq!(
            outcomes(&result),
            vec![
                ("a".to_string(), Outcome::Match),
                ("a-b".to_string(), Outcome::MismatchOnlySecondExists),
                ("b".to_string(), Outcome::Match),
                ("c".to_string(), Outcome::Match),
            ]
        );
        assert_eq!(result.mismatches(), 1);
        assert!(!result.all_match());
    }

    #[test]
    fn test_full_comparison_paths() {
        let (a, b) = trees();
        fs::create_dir(a.path().join("d")).unwrap();
        fs::write(a.path().join("d/f"), "1").unwrap();

        let result = TreeComparator::new(config(a.path(), b.path(), 1)).run().unwrap();
        let record = result.comparisons.get(1).unwrap();
        assert_eq!(record.relative_path, RelativePath::from("d/f"));
        assert_eq!(record.first_path, a.path().join("d/f"));
        assert_eq!(record.second_path, b.path().join("d/f"));
    }

    #[test]
    fn test_worker_count_independent_results() {
        let (a, b) = trees();
        for i in 0..40 {
            let name = format!("file{:02}", i);
            fs::write(a.path().join(&name), format!("{}", i)).unwrap();
            let other = if i % 3 == 0 { format!("{}!", i) } else { format!("{}", i) };
            fs::write(b.path().join(&name), other).unwrap();
        }

        let single = TreeComparator::new(config(a.path(), b.path(), 1)).run().unwrap();
        let many = TreeComparator::new(config(a.path(), b.path(), 40)).run().unwrap();
        assert_eq!(single.workers, 1);
        assert_eq!(many.workers, 40);
        assert_eq!(outcomes(&single), outcomes(&many));
    }

    #[test]
    fn test_cancelled_before_start() {
        let (a, b) = trees();
        fs::write(a.path().join("f"), "1").unwrap();

        let comparator = TreeComparator::new(config(a.path(), b.path(), 1));
        comparator.shutdown_flag().store(true, Ordering::Relaxed);
        let result = comparator.run().unwrap();
        assert!(!result.completed);
        assert!(result.comparisons.is_empty());
    }

    /// Panics on the first spawned worker thread only
    struct PanicsOnFirstWorker;

    impl ContentComparator for PanicsOnFirstWorker {
        fn name(&self) -> &'static str {
            "panicky"
        }

        fn equal(&self, _first: &Path, _second: &Path) -> bool {
            if thread::current().name() == Some("compare-0") {
                panic!("simulated worker failure");
            }
            true
        }
    }

    #[test]
    fn test_panicked_worker_range_is_recovered() {
        let (a, b) = trees();
        for i in 0..8 {
            let name = format!("f{}", i);
            fs::write(a.path().join(&name), "same").unwrap();
            fs::write(b.path().join(&name), "same").unwrap();
        }

        let comparator = TreeComparator::with_comparator(
            config(a.path(), b.path(), 4),
            Box::new(PanicsOnFirstWorker),
        );
        let result = comparator.run().unwrap();
        assert!(result.completed);
        assert_eq!(result.comparisons.len(), 8);
        assert!(result.all_match());
    }

    #[test]
    fn test_enumeration_errors_collected() {
        let (a, _b) = trees();
        let missing = a.path().join("missing");
        let result = TreeComparator::new(config(a.path(), &missing, 1)).run().unwrap();
        assert_eq!(result.enumeration_errors.len(), 1);
        assert!(result.completed);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
