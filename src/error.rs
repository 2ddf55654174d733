use thiserror::Error;

/// Errors surfaced by [`DHeap`](crate::DHeap) operations.
///
/// A rejected operation never modifies the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// An absent element was offered to [`DHeap::insert`](crate::DHeap::insert).
    #[error("cannot insert an absent element")]
    InvalidArgument,
    /// The heap already holds `capacity` elements.
    #[error("heap is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },
    /// The heap holds no elements.
    #[error("heap is empty")]
    EmptyHeap,
    /// A fan-out of zero was requested at construction.
    #[error("fan-out must be at least 1")]
    ZeroFanout,
}
