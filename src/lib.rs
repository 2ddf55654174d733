//! A fixed-capacity d-ary min-heap.
//!
//! [`DHeap`] generalizes the binary heap to an arbitrary fan-out `d`. A larger
//! fan-out gives a shallower tree, so inserts do fewer comparisons, but every
//! level of an extraction has to scan up to `d` children.

use core::fmt;

mod error;

pub use error::HeapError;

/// A priority queue implemented with a d-ary heap over a fixed buffer.
///
/// This will be a min-heap.
///
/// The heap is created with a fixed `capacity` and `fanout`. All storage is
/// allocated up front and never grows: pushing into a full heap fails with
/// [`HeapError::CapacityExceeded`] instead of reallocating.
///
/// It is a logic error for an item to be modified in such a way that the
/// item's ordering relative to any other item, as determined by the [`Ord`]
/// trait, changes while it is in the heap. This is normally only possible
/// through [`Cell`], [`RefCell`], global state, I/O, or unsafe code. The
/// behavior resulting from such a logic error is not specified, but will not
/// be undefined behavior.
///
/// Equal elements come out in no particular order.
///
/// # Examples
///
/// ```
/// use d_heap::{DHeap, HeapError};
///
/// // A ternary heap with room for four elements.
/// let mut heap = DHeap::new(4, 3);
///
/// assert_eq!(heap.peek(), None);
///
/// heap.push(5)?;
/// heap.push(1)?;
/// heap.push(8)?;
/// heap.push(3)?;
///
/// // The heap is full now.
/// assert_eq!(heap.push(2), Err(HeapError::CapacityExceeded { capacity: 4 }));
///
/// assert_eq!(heap.peek(), Some(&1));
/// assert_eq!(heap.len(), 4);
///
/// // Extracting gives the elements back smallest first.
/// assert_eq!(heap.extract_min(), Ok(1));
/// assert_eq!(heap.extract_min(), Ok(3));
/// assert_eq!(heap.extract_min(), Ok(5));
/// assert_eq!(heap.extract_min(), Ok(8));
/// assert_eq!(heap.extract_min(), Err(HeapError::EmptyHeap));
/// # Ok::<(), HeapError>(())
/// ```
///
/// # Time complexity
///
/// | [push]              | [extract\_min]            | [peek] |
/// |---------------------|---------------------------|--------|
/// | *O*(log*d*(*n*))    | *O*(*d* log*d*(*n*))      | *O*(1) |
///
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
/// [push]: DHeap::push
/// [extract\_min]: DHeap::extract_min
/// [peek]: DHeap::peek
#[derive(Clone)]
pub struct DHeap<T> {
    // Slots `[0, len)` are `Some`, slots `[len, capacity)` are `None`.
    data: Box<[Option<T>]>,
    parent: Box<[usize]>,
    child: Box<[usize]>,
    fanout: usize,
    len: usize,
}

impl<T: Ord> DHeap<T> {
    /// Creates an empty heap holding at most `capacity` elements, where every
    /// node has up to `fanout` children.
    ///
    /// # Panics
    ///
    /// Panics if `fanout` is zero. Use [`DHeap::try_new`] to get an error
    /// instead.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// use d_heap::DHeap;
    /// let mut heap = DHeap::new(16, 4);
    /// heap.push("Steven").unwrap();
    /// ```
    #[must_use]
    pub fn new(capacity: usize, fanout: usize) -> DHeap<T> {
        assert!(fanout > 0, "fan-out must be at least 1");
        Self::with_tables(capacity, fanout)
    }

    /// Creates an empty heap like [`DHeap::new`], returning
    /// [`HeapError::ZeroFanout`] when `fanout` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use d_heap::{DHeap, HeapError};
    ///
    /// assert!(DHeap::<u32>::try_new(8, 3).is_ok());
    /// assert_eq!(DHeap::<u32>::try_new(8, 0).err(), Some(HeapError::ZeroFanout));
    /// ```
    pub fn try_new(capacity: usize, fanout: usize) -> Result<DHeap<T>, HeapError> {
        if fanout == 0 {
            return Err(HeapError::ZeroFanout);
        }
        Ok(Self::with_tables(capacity, fanout))
    }

    /// Creates an empty binary heap (`fanout = 2`).
    ///
    /// # Examples
    ///
    /// ```
    /// use d_heap::DHeap;
    /// let heap = DHeap::<i64>::binary(10);
    /// assert_eq!(heap.fanout(), 2);
    /// ```
    #[must_use]
    pub fn binary(capacity: usize) -> DHeap<T> {
        Self::with_tables(capacity, 2)
    }

    fn with_tables(capacity: usize, fanout: usize) -> DHeap<T> {
        debug_assert!(fanout > 0);
        // The root is its own parent.
        let parent = (0..capacity).map(|i| i.saturating_sub(1) / fanout).collect();
        // A saturated index is never below `len`, so it is never visited.
        let child = (0..capacity)
            .map(|i| i.saturating_mul(fanout).saturating_add(1))
            .collect();
        let data = (0..capacity).map(|_| None).collect();

        DHeap {
            data,
            parent,
            child,
            fanout,
            len: 0,
        }
    }

    /// Pushes an item onto the heap.
    ///
    /// Fails with [`HeapError::CapacityExceeded`] when the heap is full, in
    /// which case `element` is dropped and the heap is left untouched.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// use d_heap::DHeap;
    /// let mut heap = DHeap::new(3, 2);
    /// heap.push(3).unwrap();
    /// heap.push(5).unwrap();
    /// heap.push(1).unwrap();
    ///
    /// assert_eq!(heap.len(), 3);
    /// assert_eq!(heap.peek(), Some(&1));
    /// assert!(heap.push(7).is_err());
    /// ```
    ///
    /// # Time complexity
    ///
    /// At most one comparison per level, so *O*(log*d*(*n*)).
    pub fn push(&mut self, element: T) -> Result<(), HeapError> {
        if self.is_full() {
            return Err(HeapError::CapacityExceeded {
                capacity: self.capacity(),
            });
        }

        let pos = self.len;
        self.data[pos] = Some(element);
        self.sift_up(pos);
        self.len += 1;
        Ok(())
    }

    /// Inserts an element that may be absent.
    ///
    /// `None` is rejected with [`HeapError::InvalidArgument`]; anything else
    /// behaves like [`DHeap::push`].
    ///
    /// # Examples
    ///
    /// ```
    /// use d_heap::{DHeap, HeapError};
    /// let mut heap = DHeap::new(2, 2);
    ///
    /// assert_eq!(heap.insert(None::<u8>), Err(HeapError::InvalidArgument));
    /// assert!(heap.is_empty());
    ///
    /// heap.insert(Some(4)).unwrap();
    /// assert_eq!(heap.len(), 1);
    /// ```
    pub fn insert(&mut self, element: Option<T>) -> Result<(), HeapError> {
        let element = element.ok_or(HeapError::InvalidArgument)?;
        self.push(element)
    }

    /// Removes the smallest item from the heap and returns it.
    ///
    /// Fails with [`HeapError::EmptyHeap`] when there is nothing to remove.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// use d_heap::{DHeap, HeapError};
    /// let mut heap = DHeap::new(2, 2);
    /// heap.push(3).unwrap();
    /// heap.push(1).unwrap();
    ///
    /// assert_eq!(heap.extract_min(), Ok(1));
    /// assert_eq!(heap.extract_min(), Ok(3));
    /// assert_eq!(heap.extract_min(), Err(HeapError::EmptyHeap));
    /// ```
    ///
    /// # Time complexity
    ///
    /// Up to `d` comparisons per level, so *O*(*d* log*d*(*n*)).
    pub fn extract_min(&mut self) -> Result<T, HeapError> {
        if self.is_empty() {
            return Err(HeapError::EmptyHeap);
        }

        self.len -= 1;
        let last = self.len;
        // The last element becomes the root and the old root's slot is cleared.
        self.data.swap(0, last);
        let root = self.data[last].take();
        self.sift_down(0);

        root.ok_or(HeapError::EmptyHeap)
    }

    /// Removes the smallest item from the heap and returns it, or `None` if
    /// it is empty.
    ///
    /// ```
    /// use d_heap::DHeap;
    /// let mut heap = DHeap::new(2, 2);
    /// heap.push(1).unwrap();
    ///
    /// assert_eq!(heap.pop(), Some(1));
    /// assert_eq!(heap.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        self.extract_min().ok()
    }

    /// Consumes the heap and returns its elements in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use d_heap::DHeap;
    ///
    /// let mut heap = DHeap::new(5, 3);
    /// for x in [4, 1, 5, 2, 3] {
    ///     heap.push(x).unwrap();
    /// }
    ///
    /// assert_eq!(heap.into_sorted_vec(), [1, 2, 3, 4, 5]);
    /// ```
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len);
        while let Ok(element) = self.extract_min() {
            sorted.push(element);
        }
        sorted
    }

    /// Verifies the heap property over every stored element.
    ///
    /// Every child must compare greater than or equal to its parent, every
    /// slot below `len` must be occupied and every slot above it empty.
    pub fn check_integrity(&self) -> bool {
        let (live, unused) = self.data.split_at(self.len);

        live.iter().all(Option::is_some)
            && unused.iter().all(Option::is_none)
            && (1..self.len).all(|i| live[self.parent[i]] <= live[i])
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = self.parent[pos];
            if self.data[pos] >= self.data[parent] {
                break;
            }
            self.data.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        while let Some(child) = self.min_child(pos) {
            self.data.swap(pos, child);
            pos = child;
        }
    }

    /// Returns the child of `pos` holding the smallest value, provided it is
    /// strictly smaller than the value at `pos`.
    ///
    /// Only a strictly smaller candidate replaces the running minimum, so the
    /// leftmost of several equal children wins.
    fn min_child(&self, pos: usize) -> Option<usize> {
        let from = self.child[pos];
        let to = self.len.min(from.saturating_add(self.fanout));

        let mut min = pos;
        for child in from..to {
            if self.data[child] < self.data[min] {
                min = child;
            }
        }

        (min != pos).then_some(min)
    }
}

impl<T> DHeap<T> {
    /// Returns the smallest item in the heap, or `None` if it is empty.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// use d_heap::DHeap;
    /// let mut heap = DHeap::new(3, 2);
    /// assert_eq!(heap.peek(), None);
    ///
    /// heap.push(1).unwrap();
    /// heap.push(5).unwrap();
    /// heap.push(2).unwrap();
    /// assert_eq!(heap.peek(), Some(&1));
    /// ```
    ///
    /// # Time complexity
    ///
    /// Cost is *O*(1) in the worst case.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.data[..self.len].first().and_then(Option::as_ref)
    }

    /// Returns the smallest item in the heap, or [`HeapError::EmptyHeap`].
    ///
    /// ```
    /// use d_heap::{DHeap, HeapError};
    /// let mut heap = DHeap::new(1, 2);
    /// assert_eq!(heap.peek_min(), Err(HeapError::EmptyHeap));
    ///
    /// heap.push('a').unwrap();
    /// assert_eq!(heap.peek_min(), Ok(&'a'));
    /// ```
    pub fn peek_min(&self) -> Result<&T, HeapError> {
        self.peek().ok_or(HeapError::EmptyHeap)
    }

    /// Returns the number of elements in the heap.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks if the heap is empty.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```
    /// use d_heap::DHeap;
    /// let mut heap = DHeap::new(3, 2);
    ///
    /// assert!(heap.is_empty());
    ///
    /// heap.push(3).unwrap();
    ///
    /// assert!(!heap.is_empty());
    /// ```
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Checks if the heap holds `capacity` elements.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Returns the maximum number of elements the heap can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of children per node.
    #[must_use]
    pub fn fanout(&self) -> usize {
        self.fanout
    }

    /// Drops all items from the heap. Capacity and fan-out are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use d_heap::DHeap;
    /// let mut heap = DHeap::new(2, 2);
    /// heap.push(1).unwrap();
    /// heap.push(3).unwrap();
    ///
    /// heap.clear();
    ///
    /// assert!(heap.is_empty());
    /// assert_eq!(heap.capacity(), 2);
    /// ```
    pub fn clear(&mut self) {
        for slot in &mut self.data[..self.len] {
            *slot = None;
        }
        self.len = 0;
    }
}

impl<T: fmt::Debug> fmt::Debug for DHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elements: Vec<&T> = self.data[..self.len].iter().flatten().collect();
        f.debug_struct("DHeap")
            .field("capacity", &self.capacity())
            .field("fanout", &self.fanout)
            .field("elements", &elements)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_tables_follow_fanout() {
        let heap = DHeap::<u8>::new(10, 3);
        assert_eq!(&*heap.parent, &[0, 0, 0, 0, 1, 1, 1, 2, 2, 2]);
        assert_eq!(&*heap.child, &[1, 4, 7, 10, 13, 16, 19, 22, 25, 28]);
    }

    #[test]
    fn unary_heap_is_a_chain() {
        let heap = DHeap::<u8>::new(4, 1);
        assert_eq!(&*heap.parent, &[0, 0, 1, 2]);
        assert_eq!(&*heap.child, &[1, 2, 3, 4]);
    }

    #[test]
    fn child_index_saturates() {
        let heap = DHeap::<u8>::new(3, usize::MAX);
        assert_eq!(heap.child[2], usize::MAX);
        assert_eq!(heap.min_child(2), None);
    }

    // Ordered by key only.
    #[derive(Debug)]
    struct Keyed(u32, char);

    impl PartialEq for Keyed {
        fn eq(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }

    impl Eq for Keyed {}

    impl PartialOrd for Keyed {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Keyed {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.0.cmp(&other.0)
        }
    }

    #[test]
    fn min_child_prefers_leftmost_of_equals() {
        let mut heap = DHeap::new(4, 3);
        heap.data[0] = Some(Keyed(5, 'r'));
        heap.data[1] = Some(Keyed(7, 'a'));
        heap.data[2] = Some(Keyed(2, 'b'));
        heap.data[3] = Some(Keyed(2, 'c'));
        heap.len = 4;
        assert_eq!(heap.min_child(0), Some(2));
    }

    #[test]
    fn min_child_ignores_child_equal_to_parent() {
        let mut heap = DHeap::new(3, 2);
        heap.data[0] = Some(4);
        heap.data[1] = Some(4);
        heap.data[2] = Some(9);
        heap.len = 3;
        assert_eq!(heap.min_child(0), None);
    }

    #[test]
    fn extraction_clears_vacated_slot() {
        let mut heap = DHeap::new(3, 2);
        for x in [3, 1, 2] {
            heap.push(x).unwrap();
        }
        heap.extract_min().unwrap();
        assert!(heap.data[2].is_none());
        assert!(heap.check_integrity());
    }

    #[test]
    fn rejected_push_leaves_storage_alone() {
        let mut heap = DHeap::new(2, 2);
        heap.push(2).unwrap();
        heap.push(1).unwrap();
        let before = heap.data.clone();
        assert!(heap.push(0).is_err());
        assert_eq!(heap.data, before);
    }
}
