//! Element operations supplied to a [`Sequence`](super::Sequence)
//!
//! A sequence never assumes anything about its element type beyond what the
//! operations object tells it: how to make an independent copy, how two
//! elements order, and how to release one.

use std::cmp::Ordering;

/// Copy, order and destroy behavior for one element type
pub trait ElementOps<T>: Send + Sync {
    /// Produce an independent, exclusively owned copy of `element`
    fn copy(&self, element: &T) -> T;

    /// Total order used by `sort` and `dedup_adjacent`
    fn order(&self, a: &T, b: &T) -> Ordering;

    /// Release an element the sequence no longer holds
    fn destroy(&self, element: T) {
        drop(element);
    }
}

/// Operations built from three plain function pointers
#[derive(Debug, Clone, Copy)]
pub struct FnOps<T> {
    pub copy: fn(&T) -> T,
    pub order: fn(&T, &T) -> Ordering,
    pub destroy: fn(T),
}

impl<T> ElementOps<T> for FnOps<T> {
    fn copy(&self, element: &T) -> T {
        (self.copy)(element)
    }

    fn order(&self, a: &T, b: &T) -> Ordering {
        (self.order)(a, b)
    }

    fn destroy(&self, element: T) {
        (self.destroy)(element)
    }
}

/// `Clone` + `Ord` for any element type that has them
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOps;

impl<T: Clone + Ord> ElementOps<T> for NaturalOps {
    fn copy(&self, element: &T) -> T {
        element.clone()
    }

    fn order(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Operations for `Option<T>` slots, lifting the inner operations
///
/// Filled slots order before empty ones.
pub struct SlotOps<T> {
    inner: Box<dyn ElementOps<T>>,
}

impl<T> SlotOps<T> {
    pub fn new(inner: impl ElementOps<T> + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }
}

impl<T> ElementOps<Option<T>> for SlotOps<T> {
    fn copy(&self, element: &Option<T>) -> Option<T> {
        element.as_ref().map(|inner| self.inner.copy(inner))
    }

    fn order(&self, a: &Option<T>, b: &Option<T>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => self.inner.order(a, b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    fn destroy(&self, element: Option<T>) {
        if let Some(inner) = element {
            self.inner.destroy(inner);
        }
    }
}
