//! Indexed min priority queue with decrease-key, used by Prim's algorithm.
//!
//! Entries are addressed by an integer index in `0..capacity`. The heap stores
//! indices; `positions` maps an index back to its heap slot so that a key can
//! be changed in place.

/// Binary heap over indices `0..capacity` ordered by their associated keys.
#[derive(Debug, Clone)]
pub struct IndexMinPq<T> {
    /// 1-based binary heap of indices
    heap: Vec<usize>,
    /// Heap slot of each index, `None` when the index is not queued
    positions: Vec<Option<usize>>,
    keys: Vec<Option<T>>,
    len: usize,
}

impl<T: PartialOrd> IndexMinPq<T> {
    pub fn new(capacity: usize) -> Self {
        let mut keys = Vec::with_capacity(capacity);
        keys.resize_with(capacity, || None);
        IndexMinPq {
            heap: vec![0; capacity + 1],
            positions: vec![None; capacity],
            keys,
            len: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn contains(&self, index: usize) -> bool {
        self.positions.get(index).map_or(false, Option::is_some)
    }

    /// Queue `index` with `key`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range or already queued.
    pub fn insert(&mut self, index: usize, key: T) {
        assert!(index < self.positions.len(), "index {index} out of range");
        assert!(!self.contains(index), "index {index} is already queued");

        self.len += 1;
        self.positions[index] = Some(self.len);
        self.heap[self.len] = index;
        self.keys[index] = Some(key);
        self.swim(self.len);
    }

    /// Index with the smallest key.
    pub fn min_index(&self) -> Option<usize> {
        (self.len > 0).then(|| self.heap[1])
    }

    pub fn min_key(&self) -> Option<&T> {
        self.min_index().and_then(|index| self.keys[index].as_ref())
    }

    pub fn key_of(&self, index: usize) -> Option<&T> {
        self.keys.get(index).and_then(Option::as_ref)
    }

    /// Remove the smallest entry and return its index and key.
    pub fn pop_min(&mut self) -> Option<(usize, T)> {
        if self.len == 0 {
            return None;
        }

        let min = self.heap[1];
        self.exchange(1, self.len);
        self.len -= 1;
        self.sink(1);

        self.positions[min] = None;
        let key = self.keys[min].take()?;
        Some((min, key))
    }

    /// Replace the key of a queued index and restore heap order.
    ///
    /// # Panics
    ///
    /// Panics if the index is not queued.
    pub fn change_key(&mut self, index: usize, key: T) {
        let slot = self.positions[index].expect("index is not queued");
        self.keys[index] = Some(key);
        self.swim(slot);
        self.sink(slot);
    }

    /// Replace the key of a queued index only if the new key is smaller.
    ///
    /// Returns whether the key changed.
    pub fn decrease_key(&mut self, index: usize, key: T) -> bool {
        match self.key_of(index) {
            Some(current) if *current > key => {
                self.change_key(index, key);
                true
            }
            _ => false,
        }
    }

    fn greater(&self, i: usize, j: usize) -> bool {
        match (&self.keys[self.heap[i]], &self.keys[self.heap[j]]) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        }
    }

    fn exchange(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.positions[self.heap[i]] = Some(i);
        self.positions[self.heap[j]] = Some(j);
    }

    fn swim(&mut self, mut k: usize) {
        while k > 1 && self.greater(k / 2, k) {
            self.exchange(k, k / 2);
            k /= 2;
        }
    }

    fn sink(&mut self, mut k: usize) {
        while 2 * k <= self.len {
            let mut j = 2 * k;
            if j < self.len && self.greater(j, j + 1) {
                j += 1;
            }
            if !self.greater(k, j) {
                break;
            }
            self.exchange(k, j);
            k = j;
        }
    }
}
