//! Growable array with comparator-driven sorting and compression
//!
//! `GrowArray` keeps its active length separate from its allocated capacity:
//! compression shrinks the active length but never releases the buffer, so a
//! container can be refilled without reallocating. Allocation failure aborts
//! the process.

use std::cmp::Ordering;
use std::ops::Index;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowArray<T> {
    items: Vec<T>,
}

impl<T> Default for GrowArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GrowArray<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create an empty array. `hint` is only a starting capacity.
    pub fn with_capacity(hint: usize) -> Self {
        Self {
            items: Vec::with_capacity(hint),
        }
    }

    /// Number of active elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of elements the buffer can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn push(&mut self, value: T) {
        self.reserve_for(self.items.len());
        self.items.push(value);
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Drop all active elements, keeping the buffer.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Stable sort by a caller-supplied total order.
    pub fn sort_by<F>(&mut self, cmp: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.items.sort_by(cmp);
    }

    /// Collapse runs of elements that compare `Equal` under `cmp`, keeping the
    /// first of each run. The array must already be sorted by `cmp`.
    ///
    /// Returns true if any element was removed.
    pub fn compress_by<F>(&mut self, mut cmp: F) -> bool
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let before = self.items.len();
        self.items
            .dedup_by(|later, kept| cmp(kept, later) == Ordering::Equal);
        self.items.len() != before
    }

    /// Binary search in an array sorted by `cmp`: `Ok(index)` of an equal
    /// element, or `Err(position)` where `value` would be inserted.
    pub fn find_sorted<F>(&self, value: &T, mut cmp: F) -> Result<usize, usize>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.items.binary_search_by(|probe| cmp(probe, value))
    }

    /// Insert `value` at its sorted position unless an equal element is
    /// already present. Returns true if inserted.
    pub fn insert_sorted<F>(&mut self, value: T, cmp: F) -> bool
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        match self.find_sorted(&value, cmp) {
            Ok(_) => false,
            Err(position) => {
                self.reserve_for(self.items.len());
                self.items.insert(position, value);
                true
            }
        }
    }

    /// Remove the element equal to `value`, if any. Returns true if removed.
    pub fn remove_sorted<F>(&mut self, value: &T, cmp: F) -> bool
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        match self.find_sorted(value, cmp) {
            Ok(position) => {
                self.items.remove(position);
                true
            }
            Err(_) => false,
        }
    }

    // Grow by doubling so that `index` fits.
    fn reserve_for(&mut self, index: usize) {
        let capacity = self.items.capacity();
        if index >= capacity {
            let target = (index + 1).max(capacity * 2);
            self.items.reserve_exact(target - self.items.len());
        }
    }
}

impl<T: Default> GrowArray<T> {
    /// Mutable access to element `index`, extending the active length with
    /// default values if it does not reach that far yet.
    pub fn slot(&mut self, index: usize) -> &mut T {
        if index >= self.items.len() {
            self.reserve_for(index);
            self.items.resize_with(index + 1, T::default);
        }
        &mut self.items[index]
    }
}

impl<T> Index<usize> for GrowArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a GrowArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for GrowArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T> FromIterator<T> for GrowArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_key(a: &(u32, u32), b: &(u32, u32)) -> Ordering {
        a.0.cmp(&b.0)
    }

    #[test]
    fn test_slot_extends_active_length() {
        let mut array: GrowArray<u32> = GrowArray::with_capacity(2);
        *array.slot(4) = 9;
        assert_eq!(array.len(), 5);
        assert_eq!(array.as_slice(), &[0, 0, 0, 0, 9]);
        assert!(array.capacity() >= 5);

        *array.slot(1) = 3;
        assert_eq!(array.len(), 5);
        assert_eq!(array[1], 3);
    }

    #[test]
    fn test_slot_at_len_appends() {
        let mut array: GrowArray<u32> = GrowArray::new();
        for i in 0..100 {
            let n = array.len();
            *array.slot(n) = i;
        }
        assert_eq!(array.len(), 100);
        assert_eq!(array[99], 99);
    }

    #[test]
    fn test_compress_keeps_capacity() {
        let mut array: GrowArray<u32> = vec![1, 1, 2, 3, 3, 3, 4].into_iter().collect();
        let capacity = array.capacity();
        assert!(array.compress_by(|a, b| a.cmp(b)));
        assert_eq!(array.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(array.capacity(), capacity);
        assert!(!array.compress_by(|a, b| a.cmp(b)));
    }

    #[test]
    fn test_compress_keeps_first_of_run() {
        let mut array: GrowArray<(u32, u32)> =
            vec![(1, 10), (1, 11), (2, 20), (2, 21), (2, 22)].into_iter().collect();
        array.compress_by(by_key);
        assert_eq!(array.as_slice(), &[(1, 10), (2, 20)]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut array: GrowArray<(u32, u32)> =
            vec![(2, 0), (1, 0), (2, 1), (1, 1)].into_iter().collect();
        array.sort_by(by_key);
        assert_eq!(array.as_slice(), &[(1, 0), (1, 1), (2, 0), (2, 1)]);
    }

    #[test]
    fn test_sorted_insert_find_remove() {
        let mut array: GrowArray<u32> = GrowArray::new();
        for v in [5, 1, 3, 3, 9] {
            array.insert_sorted(v, |a, b| a.cmp(b));
        }
        assert_eq!(array.as_slice(), &[1, 3, 5, 9]);
        assert_eq!(array.find_sorted(&5, |a, b| a.cmp(b)), Ok(2));
        assert_eq!(array.find_sorted(&4, |a, b| a.cmp(b)), Err(2));

        assert!(array.remove_sorted(&3, |a, b| a.cmp(b)));
        assert!(!array.remove_sorted(&3, |a, b| a.cmp(b)));
        assert_eq!(array.as_slice(), &[1, 5, 9]);
    }

    #[test]
    fn test_clear_keeps_buffer() {
        let mut array: GrowArray<u8> = GrowArray::with_capacity(16);
        array.push(1);
        array.clear();
        assert!(array.is_empty());
        assert!(array.capacity() >= 16);
    }
}
