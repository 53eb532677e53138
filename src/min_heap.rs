//! MinHeap: binary min-heap stored in a flat array.
//!
//! Sibling of the hash map; the two share no state. Children of index `i`
//! live at `2i + 1` and `2i + 2`.

use core::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MinHeapError {
    #[error("heap is empty")]
    Empty,
}

#[derive(Clone, Debug)]
pub struct MinHeap<T> {
    heap: Vec<T>,
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self { heap: Vec::new() }
    }
}

impl<T: Ord> MinHeap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Array layout, root first.
    pub fn as_slice(&self) -> &[T] {
        &self.heap
    }

    pub fn add(&mut self, node: T) {
        self.heap.push(node);
        self.percolate_up(self.heap.len() - 1);
    }

    pub fn get_min(&self) -> Result<&T, MinHeapError> {
        self.heap.first().ok_or(MinHeapError::Empty)
    }

    /// Pop the smallest element: the last leaf moves to the root and sinks.
    pub fn remove_min(&mut self) -> Result<T, MinHeapError> {
        if self.heap.is_empty() {
            return Err(MinHeapError::Empty);
        }
        let min = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.percolate_down(0);
        }
        Ok(min)
    }

    /// Replace the contents with a copy of `items`, heapified bottom-up.
    pub fn build_heap(&mut self, items: &[T])
    where
        T: Clone,
    {
        self.heap = items.to_vec();
        for idx in (0..self.heap.len() / 2).rev() {
            self.percolate_down(idx);
        }
    }

    fn percolate_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.heap[idx] >= self.heap[parent] {
                break;
            }
            self.heap.swap(idx, parent);
            idx = parent;
        }
    }

    fn percolate_down(&mut self, mut idx: usize) {
        while let Some(child) = self.min_child(idx) {
            if self.heap[idx] <= self.heap[child] {
                break;
            }
            self.heap.swap(idx, child);
            idx = child;
        }
    }

    /// Smaller child of `idx`; the left one wins ties.
    fn min_child(&self, idx: usize) -> Option<usize> {
        let left = 2 * idx + 1;
        let right = left + 1;
        if left >= self.heap.len() {
            None
        } else if right >= self.heap.len() || self.heap[left] <= self.heap[right] {
            Some(left)
        } else {
            Some(right)
        }
    }
}

impl<T: Ord> FromIterator<T> for MinHeap<T> {
    /// Seeds the heap through repeated `add`, so the layout matches
    /// inserting the items one at a time.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut h = Self::new();
        for node in iter {
            h.add(node);
        }
        h
    }
}

impl<T: Ord> From<Vec<T>> for MinHeap<T> {
    fn from(v: Vec<T>) -> Self {
        v.into_iter().collect()
    }
}

impl<T: fmt::Debug> fmt::Display for MinHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HEAP {:?}", self.heap)
    }
}
