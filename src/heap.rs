//! An array-backed binary max-heap over `i32` keys.

use std::iter::FromIterator;

use log::{debug, trace};

use crate::error::{HeapError, Result};

/// A binary max-heap stored in a vector.
///
/// The heap occupies the logical prefix `arr[..heap_size]` of the backing
/// vector. [`MaxHeap::heap_sort`] shrinks that prefix while moving the
/// largest keys behind it, leaving the whole vector in ascending order.
///
/// ```
/// use treeheap::MaxHeap;
/// let mut heap = MaxHeap::new(vec![5, 8, 4, 1, 7, 2, 6]);
/// heap.build_heap();
/// assert_eq!(heap.max(), Ok(8));
/// heap.heap_sort();
/// assert_eq!(heap.as_slice(), &[1, 2, 4, 5, 6, 7, 8]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaxHeap {
    arr: Vec<i32>,
    heap_size: usize,
}

impl MaxHeap {
    /// Wraps `array` as is. Call [`MaxHeap::build_heap`] to establish the
    /// heap property.
    pub fn new(array: Vec<i32>) -> Self {
        let heap_size = array.len();
        Self {
            arr: array,
            heap_size,
        }
    }

    /// Returns the number of keys in the logical heap.
    pub fn heap_size(&self) -> usize {
        self.heap_size
    }

    /// Returns true if the logical heap holds no keys.
    pub fn is_empty(&self) -> bool {
        self.heap_size == 0
    }

    /// Returns the whole backing array, including keys past `heap_size`.
    pub fn as_slice(&self) -> &[i32] {
        &self.arr
    }

    /// Consumes the heap and returns the whole backing array.
    pub fn into_vec(self) -> Vec<i32> {
        self.arr
    }

    /// Sifts the key at `index` down until the subtree rooted there is a
    /// max-heap. Both child subtrees must already be max-heaps.
    pub fn heapify(&mut self, mut index: usize) {
        while index < self.heap_size {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut largest = index;

            if left < self.heap_size && self.arr[left] > self.arr[largest] {
                largest = left;
            }
            if right < self.heap_size && self.arr[right] > self.arr[largest] {
                largest = right;
            }
            if largest == index {
                break;
            }

            trace!("sift down {} -> {}", index, largest);
            self.arr.swap(index, largest);
            index = largest;
        }
    }

    /// Establishes the max-heap property over the whole logical heap.
    pub fn build_heap(&mut self) {
        debug!("building heap of size {}", self.heap_size);
        for index in (0..self.heap_size / 2).rev() {
            self.heapify(index);
        }
    }

    /// Sorts the backing array in ascending order.
    ///
    /// Afterwards `heap_size` is at most one; call [`MaxHeap::build_heap`]
    /// after resetting the heap before using it as a heap again.
    pub fn heap_sort(&mut self) {
        self.build_heap();
        debug!("sorting heap of size {}", self.heap_size);
        for last in (1..self.heap_size).rev() {
            self.arr.swap(0, last);
            self.heap_size -= 1;
            self.heapify(0);
        }
    }

    /// Returns the largest key.
    pub fn max(&self) -> Result<i32> {
        if self.heap_size == 0 {
            return Err(HeapError::Empty);
        }
        Ok(self.arr[0])
    }

    /// Raises the key at `index` to `new_key` and moves it up to its place.
    ///
    /// Fails without touching the heap if `new_key` is smaller than the
    /// current key or `index` lies outside the logical heap.
    pub fn increase_key(&mut self, index: usize, new_key: i32) -> Result<()> {
        if index >= self.heap_size {
            return Err(HeapError::IndexOutOfRange {
                index,
                heap_size: self.heap_size,
            });
        }
        let current = self.arr[index];
        if new_key < current {
            return Err(HeapError::KeyDecrease {
                current,
                new: new_key,
            });
        }
        self.arr[index] = new_key;
        self.sift_up(index);
        Ok(())
    }

    /// Inserts `key` by appending the smallest possible key and raising it.
    ///
    /// Keys left behind the logical heap by [`MaxHeap::heap_sort`] are
    /// discarded first.
    pub fn insert(&mut self, key: i32) {
        let index = self.grow(i32::MIN);
        // Every key is at least i32::MIN
        let placed = self.increase_key(index, key);
        debug_assert!(placed.is_ok());
    }

    /// Inserts `key` by appending it and sifting it up directly.
    pub fn push(&mut self, key: i32) {
        let index = self.grow(key);
        self.sift_up(index);
    }

    /// Returns true if every parent key is at least as large as its children.
    pub fn is_max_heap(&self) -> bool {
        (1..self.heap_size).all(|index| self.arr[(index - 1) / 2] >= self.arr[index])
    }

    fn grow(&mut self, key: i32) -> usize {
        self.arr.truncate(self.heap_size);
        self.arr.push(key);
        self.heap_size += 1;
        self.heap_size - 1
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.arr[index] <= self.arr[parent] {
                break;
            }
            trace!("sift up {} -> {}", index, parent);
            self.arr.swap(index, parent);
            index = parent;
        }
    }
}

/// Builds a heap from the vector.
impl From<Vec<i32>> for MaxHeap {
    fn from(array: Vec<i32>) -> Self {
        let mut heap = Self::new(array);
        heap.build_heap();
        heap
    }
}

impl FromIterator<i32> for MaxHeap {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}
