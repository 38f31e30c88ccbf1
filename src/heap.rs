//! Array-backed binary min-heap.
//!
//! `std::collections::BinaryHeap` is a max-heap and gives no control over how
//! equal elements settle, so tree construction uses this queue instead. The
//! smallest element under `Ord` is always at index 0.

use thiserror::Error;

/// Returned by [`MinHeap::pop`] when there is nothing left to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("pop from an empty queue")]
pub struct EmptyQueue;

#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<T>,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap {
            elements: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap {
            elements: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The minimum element, if any.
    pub fn peek(&self) -> Option<&T> {
        self.elements.first()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }
}

impl<T: Ord> MinHeap<T> {
    pub fn push(&mut self, value: T) {
        self.elements.push(value);
        self.sift_up(self.elements.len() - 1);
    }

    /// Removes and returns the minimum element.
    pub fn pop(&mut self) -> Result<T, EmptyQueue> {
        if self.elements.is_empty() {
            return Err(EmptyQueue);
        }
        let last = self.elements.len() - 1;
        self.elements.swap(0, last);
        let result = self.elements.pop().ok_or(EmptyQueue)?;
        if !self.elements.is_empty() {
            self.sift_down(0);
        }
        Ok(result)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = Self::parent(i);
            if self.elements[i] >= self.elements[p] {
                break;
            }
            self.elements.swap(i, p);
            i = p;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.elements.len();
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let mut smallest = i;

            if l < n && self.elements[l] < self.elements[smallest] {
                smallest = l;
            }
            if r < n && self.elements[r] < self.elements[smallest] {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }

    #[cfg(test)]
    fn valid_min_heap(&self) -> bool {
        (1..self.elements.len()).all(|i| self.elements[Self::parent(i)] <= self.elements[i])
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for MinHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = MinHeap::new();
        for value in iter {
            heap.push(value);
        }
        heap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_ascending_order() {
        let mut heap: MinHeap<i32> = [5, 3, 9, 1, 7, 1, 0].into_iter().collect();
        assert!(heap.valid_min_heap());
        assert_eq!(heap.len(), 7);

        let mut out = Vec::new();
        while let Ok(v) = heap.pop() {
            assert!(heap.valid_min_heap());
            out.push(v);
        }
        assert_eq!(out, vec![0, 1, 1, 3, 5, 7, 9]);
    }

    #[test]
    fn peek_does_not_remove() {
        let mut heap = MinHeap::new();
        assert_eq!(heap.peek(), None);
        heap.push("pear");
        heap.push("apple");
        assert_eq!(heap.peek(), Some(&"apple"));
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn empty_pop_fails() {
        let mut heap: MinHeap<u8> = MinHeap::default();
        assert!(heap.is_empty());
        assert_eq!(heap.pop(), Err(EmptyQueue));

        heap.push(4);
        assert_eq!(heap.pop(), Ok(4));
        assert_eq!(heap.pop(), Err(EmptyQueue));
    }
}
