//! Worker sizing and index partitioning

use crate::config::WorkerCount;
use std::ops::Range;

/// Number of workers to use for `len` comparisons
///
/// Starts from the requested count, drops to `max(len / min_per_worker, 1)`
/// when each worker would get fewer than `min_per_worker` comparisons, and
/// never exceeds `len`. Returns 0 only when `len` is 0.
pub fn worker_count(len: usize, requested: WorkerCount, min_per_worker: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let mut workers = requested.resolve();
    if min_per_worker > 0 && len / workers < min_per_worker {
        workers = (len / min_per_worker).max(1);
    }
    workers.min(len)
}

/// Split `[0, len)` into `workers` contiguous ranges
///
/// Every range holds `len / workers` indices and the last one also takes the
/// remainder. `workers` is clamped to `1..=len`; an empty list is returned
/// for `len == 0`.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, len);
    let chunk = len / workers;

    (0..workers)
        .map(|i| {
            let start = i * chunk;
            let end = if i + 1 == workers { len } else { start + chunk };
            start..end
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_covers_exactly() {
        for len in 1..=64 {
            for workers in 1..=len {
                let ranges = partition(len, workers);
                assert_eq!(ranges.len(), workers);
                assert_eq!(ranges[0].start, 0);
                assert_eq!(ranges[workers - 1].end, len);
                for pair in ranges.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start, "gap or overlap at len={len}");
                }
                let chunk = len / workers;
                for range in &ranges[..workers - 1] {
                    assert_eq!(range.len(), chunk);
                }
                assert_eq!(ranges[workers - 1].len(), chunk + len % workers);
            }
        }
    }

    #[test]
    fn test_partition_remainder_goes_last() {
        assert_eq!(partition(10, 3), vec![0..3, 3..6, 6..10]);
        assert_eq!(partition(5, 1), vec![0..5]);
    }

    #[test]
    fn test_partition_edge_cases() {
        assert!(partition(0, 4).is_empty());
        assert_eq!(partition(3, 0), vec![0..3]);
        assert_eq!(partition(2, 8), vec![0..1, 1..2]);
    }

    #[test]
    fn test_worker_count_respects_minimum() {
        // 100 paths, 8 requested, 60 minimum: drop to 100 / 60 = 1
        assert_eq!(worker_count(100, WorkerCount::Fixed(8), 60), 1);
        // 600 paths, 8 requested: 75 each is enough
        assert_eq!(worker_count(600, WorkerCount::Fixed(8), 60), 8);
        // 300 paths, 8 requested: 37 each, drop to 5
        assert_eq!(worker_count(300, WorkerCount::Fixed(8), 60), 5);
        // fewer paths than the minimum still get one worker
        assert_eq!(worker_count(10, WorkerCount::Fixed(4), 60), 1);
    }

    #[test]
    fn test_worker_count_never_exceeds_len() {
        assert_eq!(worker_count(3, WorkerCount::Fixed(16), 1), 3);
        assert_eq!(worker_count(0, WorkerCount::Fixed(16), 1), 0);
        assert!(worker_count(1000, WorkerCount::Auto, 1) >= 1);
    }
}
