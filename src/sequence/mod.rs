//! Generic growable sequence container
//!
//! `Sequence<T>` holds exclusively owned elements and delegates every
//! element-level decision (copying, ordering, releasing) to an
//! [`ElementOps`] object supplied at construction. The same container holds
//! relative path lists during enumeration and the comparison records the
//! scheduler produces.
//!
//! # Growth
//!
//! ```text
//! capacity:  c  →  2c + 1  →  2(2c + 1) + 1  → ...
//! ```
//!
//! An append into a full sequence grows capacity to `2n + 1`, so `N` appends
//! cost O(N) in total. `concat` grows at most once, to the exact size needed.
//! Allocation failure is reported as [`SequenceError::Allocation`] rather
//! than aborting.

pub mod ops;

pub use ops::{ElementOps, FnOps, NaturalOps, SlotOps};

use crate::error::{SequenceError, SequenceResult};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Growable array of elements governed by an [`ElementOps`]
pub struct Sequence<T> {
    /// Live elements, `items.len()` is the sequence length
    items: Vec<T>,

    /// Logical capacity, always `>= items.len()`
    capacity: usize,

    /// Copy/order/destroy behavior
    ops: Arc<dyn ElementOps<T>>,
}

impl<T> Sequence<T> {
    /// Create an empty sequence with room for `initial_capacity` elements
    pub fn new(initial_capacity: usize, ops: Arc<dyn ElementOps<T>>) -> SequenceResult<Self> {
        let mut items = Vec::new();
        items
            .try_reserve_exact(initial_capacity)
            .map_err(|_| SequenceError::Allocation {
                requested: initial_capacity,
            })?;

        Ok(Self {
            items,
            capacity: initial_capacity,
            ops,
        })
    }

    /// Create a sequence of exactly `len` elements, each produced by `fill`
    pub fn filled(
        len: usize,
        ops: Arc<dyn ElementOps<T>>,
        fill: impl FnMut() -> T,
    ) -> SequenceResult<Self> {
        let mut seq = Self::new(len, ops)?;
        seq.items.extend(std::iter::repeat_with(fill).take(len));
        Ok(seq)
    }

    /// Number of live elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the sequence holds no elements
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of elements the sequence can hold before growing
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Element at `index`, if live
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Live elements as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Mutable view of the live elements; the length cannot change through it
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Iterate over live elements in order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Append a copy of `element`, growing first if the sequence is full
    pub fn append(&mut self, element: &T) -> SequenceResult<()> {
        self.ensure_slot()?;
        let copy = self.ops.copy(element);
        self.items.push(copy);
        Ok(())
    }

    /// Move an owned element into the next slot without copying it
    pub fn push(&mut self, element: T) -> SequenceResult<()> {
        self.ensure_slot()?;
        self.items.push(element);
        Ok(())
    }

    /// Append a deep copy of every element of `source`
    ///
    /// `source` is left untouched. The target grows at most once, to exactly
    /// `self.len() + source.len()`.
    pub fn concat(&mut self, source: &Sequence<T>) -> SequenceResult<()> {
        let required = self.items.len() + source.items.len();
        if required > self.capacity {
            self.reserve_to(required)?;
        }

        for element in &source.items {
            let copy = self.ops.copy(element);
            self.items.push(copy);
        }
        Ok(())
    }

    /// Stable merge sort using the sequence's `order`
    pub fn sort(&mut self) {
        if self.items.len() < 2 {
            return;
        }

        // Draining keeps the backing allocation, so refilling never grows it
        let drained: Vec<T> = self.items.drain(..).collect();
        let sorted = merge_sort(drained, self.ops.as_ref());
        self.items.extend(sorted);
    }

    /// Remove consecutive runs of equal elements, keeping the first of each
    ///
    /// Only adjacent duplicates are detected, so the sequence should be
    /// sorted first. Removed elements are handed to `destroy`.
    pub fn dedup_adjacent(&mut self) {
        if self.items.len() < 2 {
            return;
        }

        let drained: Vec<T> = self.items.drain(..).collect();
        for element in drained {
            match self.items.last() {
                Some(previous) if self.ops.order(previous, &element) == Ordering::Equal => {
                    self.ops.destroy(element);
                }
                _ => self.items.push(element),
            }
        }
    }

    /// Destroy every live element and release the backing storage
    pub fn destroy(self) {
        drop(self);
    }

    fn ensure_slot(&mut self) -> SequenceResult<()> {
        if self.items.len() < self.capacity {
            return Ok(());
        }
        let grown = self
            .capacity
            .checked_mul(2)
            .and_then(|c| c.checked_add(1))
            .ok_or(SequenceError::Allocation {
                requested: usize::MAX,
            })?;
        self.reserve_to(grown)
    }

    fn reserve_to(&mut self, capacity: usize) -> SequenceResult<()> {
        let additional = capacity.saturating_sub(self.items.len());
        self.items
            .try_reserve_exact(additional)
            .map_err(|_| SequenceError::Allocation {
                requested: capacity,
            })?;
        self.capacity = capacity;
        Ok(())
    }
}

impl<T> Sequence<Option<T>> {
    /// Move every filled slot, in order, into a sequence governed by `ops`
    ///
    /// Elements are moved rather than copied. Empty slots are dropped.
    pub fn take_filled(mut self, ops: Arc<dyn ElementOps<T>>) -> SequenceResult<Sequence<T>> {
        let slots = std::mem::take(&mut self.items);
        let filled = slots.iter().filter(|slot| slot.is_some()).count();
        let mut taken = Sequence::new(filled, ops)?;
        taken.items.extend(slots.into_iter().flatten());
        Ok(taken)
    }
}

impl<T> Drop for Sequence<T> {
    fn drop(&mut self) {
        for element in self.items.drain(..) {
            self.ops.destroy(element);
        }
    }
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("len", &self.items.len())
            .field("capacity", &self.capacity)
            .field("items", &self.items)
            .finish()
    }
}

/// Top-down merge sort; ties keep the left element first
fn merge_sort<T>(mut items: Vec<T>, ops: &dyn ElementOps<T>) -> Vec<T> {
    if items.len() < 2 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let mut left = merge_sort(items, ops).into_iter().peekable();
    let mut right = merge_sort(right, ops).into_iter().peekable();

    let mut merged = Vec::with_capacity(left.len() + right.len());
    while let (Some(a), Some(b)) = (left.peek(), right.peek()) {
        let next = if ops.order(a, b) == Ordering::Greater {
            right.next()
        } else {
            left.next()
        };
        merged.extend(next);
    }
    merged.extend(left);
    merged.extend(right);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    struct CountingOps {
        copies: Arc<AtomicUsize>,
        destroyed: Arc<AtomicUsize>,
    }

    impl ElementOps<String> for CountingOps {
        fn copy(&self, element: &String) -> String {
            self.copies.fetch_add(1, AtomicOrdering::SeqCst);
            element.clone()
        }

        fn order(&self, a: &String, b: &String) -> Ordering {
            a.cmp(b)
        }

        fn destroy(&self, element: String) {
            self.destroyed.fetch_add(1, AtomicOrdering::SeqCst);
            drop(element);
        }
    }

    fn counting() -> (Arc<dyn ElementOps<String>>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let copies = Arc::new(AtomicUsize::new(0));
        let destroyed = Arc::new(AtomicUsize::new(0));
        let ops: Arc<dyn ElementOps<String>> = Arc::new(CountingOps {
            copies: Arc::clone(&copies),
            destroyed: Arc::clone(&destroyed),
        });
        (ops, copies, destroyed)
    }

    fn strings(values: &[&str]) -> Sequence<String> {
        let mut seq: Sequence<String> = Sequence::new(2, Arc::new(NaturalOps)).unwrap();
        for v in values {
            seq.append(&v.to_string()).unwrap();
        }
        seq
    }

    fn contents(seq: &Sequence<String>) -> Vec<&str> {
        seq.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_append_grows_two_n_plus_one() {
        let mut seq: Sequence<u32> = Sequence::new(2, Arc::new(NaturalOps)).unwrap();
        assert_eq!(seq.capacity(), 2);

        for i in 0..3u32 {
            seq.append(&i).unwrap();
        }
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.capacity(), 5);

        for i in 3..6u32 {
            seq.append(&i).unwrap();
        }
        assert_eq!(seq.capacity(), 11);
        assert!(seq.len() <= seq.capacity());
    }

    #[test]
    fn test_append_from_zero_capacity() {
        let mut seq: Sequence<u8> = Sequence::new(0, Arc::new(NaturalOps)).unwrap();
        seq.append(&1u8).unwrap();
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.capacity(), 1);
    }

    #[test]
    fn test_append_copies_element() {
        let (ops, copies, _) = counting();
        let mut seq = Sequence::new(1, ops).unwrap();
        let original = String::from("a");
        seq.append(&original).unwrap();
        seq.push(String::from("b")).unwrap();

        assert_eq!(copies.load(AtomicOrdering::SeqCst), 1);
        assert_eq!(original, "a");
        assert_eq!(seq.get(1).map(String::as_str), Some("b"));
    }

    #[test]
    fn test_concat_preserves_source_and_grows_exactly() {
        let mut target = strings(&["a"]);
        let source = strings(&["b", "c", "d"]);

        target.concat(&source).unwrap();

        assert_eq!(contents(&target), vec!["a", "b", "c", "d"]);
        assert_eq!(target.capacity(), 4);
        assert_eq!(contents(&source), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_concat_within_capacity_does_not_grow() {
        let mut target: Sequence<String> = Sequence::new(8, Arc::new(NaturalOps)).unwrap();
        target.append(&String::from("x")).unwrap();
        let source = strings(&["y", "z"]);

        target.concat(&source).unwrap();
        assert_eq!(target.capacity(), 8);
        assert_eq!(contents(&target), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_sort_then_dedup() {
        let mut seq = strings(&["a", "b", "a", "c", "b"]);
        seq.sort();
        assert_eq!(contents(&seq), vec!["a", "a", "b", "b", "c"]);

        seq.dedup_adjacent();
        assert_eq!(contents(&seq), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_is_stable() {
        #[derive(Debug)]
        struct Keyed(u8, &'static str);

        let ops = FnOps::<Keyed> {
            copy: |k| Keyed(k.0, k.1),
            order: |a, b| a.0.cmp(&b.0),
            destroy: drop,
        };
        let mut seq = Sequence::new(4, Arc::new(ops)).unwrap();
        for item in [Keyed(2, "first"), Keyed(1, "x"), Keyed(2, "second"), Keyed(0, "y")] {
            seq.push(item).unwrap();
        }

        seq.sort();
        let order: Vec<&str> = seq.iter().map(|k| k.1).collect();
        assert_eq!(order, vec!["y", "x", "first", "second"]);
    }

    #[test]
    fn test_sort_large_reverse_input() {
        let mut seq: Sequence<u32> = Sequence::new(2, Arc::new(NaturalOps)).unwrap();
        for i in (0..1000u32).rev() {
            seq.push(i).unwrap();
        }
        seq.sort();
        let expected: Vec<u32> = (0..1000).collect();
        assert_eq!(seq.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_dedup_only_adjacent() {
        let mut seq = strings(&["a", "b", "a"]);
        seq.dedup_adjacent();
        assert_eq!(contents(&seq), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_destroy_called_once_per_element() {
        let (ops, _, destroyed) = counting();
        let mut seq = Sequence::new(2, ops).unwrap();
        for i in 0..25 {
            seq.append(&i.to_string()).unwrap();
        }
        seq.destroy();
        assert_eq!(destroyed.load(AtomicOrdering::SeqCst), 25);
    }

    #[test]
    fn test_dedup_destroys_removed_elements() {
        let (ops, _, destroyed) = counting();
        let mut seq = Sequence::new(2, ops).unwrap();
        for v in ["a", "a", "a", "b"] {
            seq.append(&v.to_string()).unwrap();
        }

        seq.dedup_adjacent();
        assert_eq!(seq.len(), 2);
        assert_eq!(destroyed.load(AtomicOrdering::SeqCst), 2);

        drop(seq);
        assert_eq!(destroyed.load(AtomicOrdering::SeqCst), 4);
    }

    #[test]
    fn test_filled_slots_written_in_place() {
        let slot_ops = Arc::new(SlotOps::<String>::new(NaturalOps));
        let mut slots = Sequence::filled(4, slot_ops, || None).unwrap();
        assert_eq!(slots.len(), 4);
        assert_eq!(slots.capacity(), 4);

        let (left, right) = slots.as_mut_slice().split_at_mut(2);
        left[1] = Some(String::from("b"));
        right[0] = Some(String::from("c"));
        right[1] = Some(String::from("d"));

        let (ops, copies, destroyed) = counting();
        let taken = slots.take_filled(ops).unwrap();
        assert_eq!(contents(&taken), vec!["b", "c", "d"]);
        assert_eq!(taken.capacity(), 3);
        assert_eq!(copies.load(AtomicOrdering::SeqCst), 0);

        drop(taken);
        assert_eq!(destroyed.load(AtomicOrdering::SeqCst), 3);
    }
}
