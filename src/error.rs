/// Errors triggered by max-heap operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum HeapError {
    /// The heap holds no elements.
    #[error("heap is empty")]
    Empty,
    /// A key update would decrease the key at an index.
    #[error("new key {new} is smaller than current key {current}")]
    KeyDecrease { current: i32, new: i32 },
    /// An index lies outside the logical heap.
    #[error("index {index} out of range for heap of size {heap_size}")]
    IndexOutOfRange { index: usize, heap_size: usize },
}

pub type Result<T, E = HeapError> = std::result::Result<T, E>;
