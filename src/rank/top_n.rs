//! Bounded top-K selection over an unbounded stream.

use std::cmp::Ordering;

/// Keeps the `n` largest items seen, under a caller-supplied order.
///
/// The retained items live in a binary min-heap laid out in a `Vec`, so
/// the smallest retained item is always at index 0 and memory stays at
/// O(n) regardless of how many items are appended.
pub struct TopN<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    heap: Vec<T>,
    n: usize,
    cmp: F,
}

impl<T, F> TopN<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// Create a selector with capacity `n` ordered by `cmp`.
    pub fn new(n: usize, cmp: F) -> Self {
        Self {
            heap: Vec::with_capacity(n.min(4096)),
            n,
            cmp,
        }
    }

    /// Offer an item. It is kept if there is room, or if it is strictly
    /// greater than the current smallest retained item, which is evicted.
    pub fn append(&mut self, item: T) {
        if self.heap.len() < self.n {
            self.heap.push(item);
            self.sift_up(self.heap.len() - 1);
        } else if let Some(min) = self.heap.first() {
            if (self.cmp)(min, &item) == Ordering::Less {
                self.heap[0] = item;
                self.sift_down(0);
            }
        }
    }

    /// Drain every retained item, largest first.
    pub fn pop_all(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.heap.len());
        while let Some(item) = self.pop_min() {
            out.push(item);
        }
        out.reverse();
        out
    }

    /// Number of retained items.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Maximum number of retained items.
    pub fn capacity(&self) -> usize {
        self.n
    }

    /// The smallest retained item.
    pub fn peek_min(&self) -> Option<&T> {
        self.heap.first()
    }

    fn pop_min(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let min = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(min)
    }

    fn less(&self, a: usize, b: usize) -> bool {
        (self.cmp)(&self.heap[a], &self.heap[b]) == Ordering::Less
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.less(i, parent) {
                break;
            }
            self.heap.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.heap.swap(i, smallest);
            i = smallest;
        }
    }
}
