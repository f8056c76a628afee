//! Support for the `Stack` collection type.
//!
//! A `Stack` holds handles in insertion order. Handles may be added or
//! removed at either end or at any position, and located by identity or,
//! once a [`Comparator`] is installed, by a binary search over the sorted
//! slots.

use core::fmt;
use core::mem::{self, ManuallyDrop};
use core::ops::Deref;
use core::ptr;
use core::slice;

use crate::alloc::{AllocatorDefault, Global};
use crate::capacity::{max_capacity, Grow, Index, MIN_CAPACITY};
use crate::error::{StorageError, UpdateError};
use crate::handle::Handle;
use crate::storage::{Inserter, SlotBuffer};

pub use self::config::{Custom, StackConfig};
pub use self::into_iter::IntoIter;
pub use self::order::{Comparator, FindMode};

mod bulk;
mod config;
mod into_iter;
mod order;

/// A `Stack` which zeroizes its slot storage when it is released or grown.
#[cfg(feature = "zeroize")]
pub type ZeroizingStack<T> = Stack<T, crate::alloc::ZeroizingAlloc<Global>>;

/// A growable sequence of handles with an optional ordering.
///
/// The stack owns its handles, but not the values behind them: dropping a
/// stack of references or raw pointers leaves the referenced values alone.
/// Use [`Stack::pop_free`] to pass every handle to a release function.
pub struct Stack<T, C: StackConfig = Global> {
    buffer: SlotBuffer<T, C::Index, C::Alloc>,
    comparator: Option<Comparator<T>>,
    sorted: bool,
}

impl<T, C: StackConfig> Stack<T, C>
where
    C::Alloc: AllocatorDefault,
{
    /// Constructs a new, empty `Stack` without a comparator.
    ///
    /// The stack will not allocate until handles are pushed onto it.
    ///
    /// # Examples
    ///
    /// ```
    /// # #![allow(unused_mut)]
    /// # #[cfg(feature = "alloc")]
    /// # {
    /// use flex_stack::Stack;
    /// let mut stack: Stack<u32> = Stack::new();
    /// assert!(stack.is_empty());
    /// # }
    /// ```
    pub const fn new() -> Self {
        Self::from_buffer(
            SlotBuffer::dangling(<C::Alloc as AllocatorDefault>::DEFAULT),
            None,
        )
    }

    /// Constructs a new, empty `Stack` ordered by `cmp`.
    pub const fn with_comparator(cmp: Comparator<T>) -> Self {
        Self::from_buffer(
            SlotBuffer::dangling(<C::Alloc as AllocatorDefault>::DEFAULT),
            Some(cmp),
        )
    }

    /// Try to construct a new `Stack` with room for at least `reserve`
    /// handles. A zero reservation does not allocate.
    pub fn try_with_reserve(
        cmp: Option<Comparator<T>>,
        reserve: C::Index,
    ) -> Result<Self, StorageError> {
        let mut stack = Self::new();
        stack.comparator = cmp;
        if reserve != C::Index::ZERO {
            stack.try_reserve(reserve)?;
        }
        Ok(stack)
    }

    /// Construct a new `Stack` with room for at least `reserve` handles,
    /// panicking if the storage cannot be allocated.
    pub fn with_reserve(cmp: Option<Comparator<T>>, reserve: C::Index) -> Self {
        match Self::try_with_reserve(cmp, reserve) {
            Ok(stack) => stack,
            Err(error) => error.panic(),
        }
    }
}

impl<T, C: StackConfig> Stack<T, C> {
    #[inline]
    const fn from_buffer(
        buffer: SlotBuffer<T, C::Index, C::Alloc>,
        comparator: Option<Comparator<T>>,
    ) -> Self {
        Self {
            buffer,
            comparator,
            sorted: false,
        }
    }

    /// Constructs a new, empty `Stack` using the allocator and index type
    /// defined by `config`.
    pub fn new_in(config: C) -> Self {
        Self::from_buffer(SlotBuffer::dangling(config.into_alloc()), None)
    }

    /// Try to construct a new `Stack` in `config` with room for at least
    /// `reserve` handles.
    pub fn try_with_reserve_in(
        config: C,
        cmp: Option<Comparator<T>>,
        reserve: C::Index,
    ) -> Result<Self, StorageError> {
        let mut stack = Self::from_buffer(SlotBuffer::dangling(config.into_alloc()), cmp);
        if reserve != C::Index::ZERO {
            stack.try_reserve(reserve)?;
        }
        Ok(stack)
    }

    /// Construct a new `Stack` in `config` with room for at least `reserve`
    /// handles, panicking if the storage cannot be allocated.
    pub fn with_reserve_in(config: C, cmp: Option<Comparator<T>>, reserve: C::Index) -> Self {
        match Self::try_with_reserve_in(config, cmp, reserve) {
            Ok(stack) => stack,
            Err(error) => error.panic(),
        }
    }

    /// Get a reference to the allocator instance.
    #[inline]
    pub fn allocator(&self) -> &C::Alloc {
        self.buffer.allocator()
    }

    /// Access the live handles as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.buffer.as_slice()
    }

    /// The number of allocated slots.
    #[inline]
    pub fn capacity(&self) -> C::Index {
        self.buffer.capacity()
    }

    /// Iterate over the live handles.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Check whether the stack holds no handles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.length() == C::Index::ZERO
    }

    /// The number of live handles.
    #[inline]
    pub fn len(&self) -> C::Index {
        self.buffer.length()
    }

    /// The number of live handles in an optional stack. `None` stands for
    /// "no stack" and is distinct from an empty one.
    #[inline]
    pub fn len_of(stack: Option<&Self>) -> Option<C::Index> {
        stack.map(Self::len)
    }

    /// Reserve room for exactly `reserve` more handles, panicking if the
    /// storage cannot be allocated.
    #[inline]
    pub fn reserve(&mut self, reserve: C::Index) {
        match self.try_reserve(reserve) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Try to reserve room for exactly `reserve` more handles. An
    /// unallocated stack receives at least [`MIN_CAPACITY`] slots. The
    /// capacity is never reduced.
    #[inline]
    pub fn try_reserve(&mut self, reserve: C::Index) -> Result<(), StorageError> {
        self.reserve_slots(reserve.to_usize(), true)
    }

    fn reserve_slots(&mut self, additional: usize, exact: bool) -> Result<(), StorageError> {
        let max = max_capacity::<T, C::Index>();
        let Some(needed) = self.buffer.length().to_usize().checked_add(additional) else {
            return Err(StorageError::CapacityLimit);
        };
        if needed > max {
            trace_event!(debug, "stack capacity limit of {} slots reached", max);
            return Err(StorageError::CapacityLimit);
        }
        let buf_cap = self.buffer.capacity();
        let capacity = if !self.buffer.is_allocated() || exact {
            needed.max(MIN_CAPACITY.min(max))
        } else if buf_cap.to_usize() >= needed {
            return Ok(());
        } else {
            match C::Grow::next_capacity::<T, C::Index>(buf_cap, C::Index::from_usize(needed)) {
                Some(cap) => cap.to_usize(),
                None => return Err(StorageError::CapacityLimit),
            }
        };
        if capacity <= buf_cap.to_usize() {
            return Ok(());
        }
        trace_event!(trace, "growing stack from {} to {} slots", buf_cap, capacity);
        self.buffer.try_grow(C::Index::from_usize(capacity))
    }

    /// Append a handle, returning the new length of the stack.
    pub fn push(&mut self, value: T) -> C::Index {
        match self.try_push(value) {
            Ok(len) => len,
            Err(error) => error.panic(),
        }
    }

    /// Try to append a handle, returning the new length of the stack. On
    /// failure the handle is returned within the error.
    #[inline]
    pub fn try_push(&mut self, value: T) -> Result<C::Index, UpdateError<T>> {
        self.try_insert(self.buffer.length(), value)
    }

    /// Prepend a handle, returning the new length of the stack.
    pub fn unshift(&mut self, value: T) -> C::Index {
        match self.try_unshift(value) {
            Ok(len) => len,
            Err(error) => error.panic(),
        }
    }

    /// Try to prepend a handle, returning the new length of the stack.
    #[inline]
    pub fn try_unshift(&mut self, value: T) -> Result<C::Index, UpdateError<T>> {
        self.try_insert(C::Index::ZERO, value)
    }

    /// Insert a handle at `index`, returning the new length of the stack.
    /// An index past the end appends the handle.
    pub fn insert(&mut self, index: C::Index, value: T) -> C::Index {
        match self.try_insert(index, value) {
            Ok(len) => len,
            Err(error) => error.panic(),
        }
    }

    /// Try to insert a handle at `index`, shifting later handles toward the
    /// end. An index past the end appends the handle. The stack is left
    /// unchanged on failure.
    pub fn try_insert(&mut self, index: C::Index, value: T) -> Result<C::Index, UpdateError<T>> {
        let prev_len = self.buffer.length().to_usize();
        if let Err(error) = self.reserve_slots(1, false) {
            return Err(UpdateError::new(error, value));
        }
        let index = index.to_usize().min(prev_len);
        let tail_count = prev_len - index;
        unsafe {
            let head = self.buffer.data_ptr_mut().add(index);
            if tail_count > 0 {
                ptr::copy(head, head.add(1), tail_count);
            }
            head.write(value);
        }
        let len = C::Index::from_usize(prev_len + 1);
        // SAFETY: the slot at `prev_len` was reserved above
        unsafe { self.buffer.set_length(len) };
        self.sorted = false;
        Ok(len)
    }

    /// Remove and return the handle at `index`, shifting later handles
    /// toward the start. Returns `None` if the index is out of range.
    pub fn remove(&mut self, index: C::Index) -> Option<T> {
        let len = self.buffer.length().to_usize();
        let index = index.to_usize();
        if index >= len {
            return None;
        }
        let copy_count = len - index - 1;
        let result = unsafe {
            let head = self.buffer.data_ptr_mut().add(index);
            let result = ptr::read(head);
            if copy_count > 0 {
                ptr::copy(head.add(1), head, copy_count);
            }
            self.buffer.set_length(C::Index::from_usize(len - 1));
            result
        };
        self.sorted = false;
        Some(result)
    }

    /// Remove and return the last handle.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        let len = self.buffer.length().to_usize();
        if len == 0 {
            return None;
        }
        self.remove(C::Index::from_usize(len - 1))
    }

    /// Remove and return the first handle.
    #[inline]
    pub fn shift(&mut self) -> Option<T> {
        self.remove(C::Index::ZERO)
    }

    /// Remove the first handle which is the same handle as `value`.
    pub fn remove_handle(&mut self, value: &T) -> Option<T>
    where
        T: Handle,
    {
        let index = self.iter().position(|h| h.same_handle(value))?;
        self.remove(C::Index::from_usize(index))
    }

    /// Get a reference to the handle at `index`.
    #[inline]
    pub fn get(&self, index: C::Index) -> Option<&T> {
        self.as_slice().get(index.to_usize())
    }

    /// Replace the handle at `index`, returning the previous handle. An
    /// index out of range hands `value` back as the error.
    pub fn set(&mut self, index: C::Index, value: T) -> Result<T, T> {
        match self.buffer.as_mut_slice().get_mut(index.to_usize()) {
            Some(slot) => {
                self.sorted = false;
                Ok(mem::replace(slot, value))
            }
            None => Err(value),
        }
    }

    /// Drop every handle, retaining the allocated slots.
    pub fn clear(&mut self) {
        let len = self.buffer.length().to_usize();
        if len > 0 {
            unsafe {
                self.buffer.set_length(C::Index::ZERO);
                ptr::drop_in_place(slice::from_raw_parts_mut(self.buffer.data_ptr_mut(), len));
            }
        }
    }

    /// Release the stack and its slot storage. The values behind the
    /// handles are not touched beyond dropping each handle.
    #[inline]
    pub fn free(self) {
        drop(self);
    }

    #[inline]
    fn into_inner(self) -> SlotBuffer<T, C::Index, C::Alloc> {
        let me = ManuallyDrop::new(self);
        unsafe { ptr::read(&me.buffer) }
    }
}

impl<T, C: StackConfig> Drop for Stack<T, C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, C: StackConfig> AsRef<[T]> for Stack<T, C> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: fmt::Debug, C: StackConfig> fmt::Debug for Stack<T, C> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().fmt(f)
    }
}

impl<T, C: StackConfig> Default for Stack<T, C>
where
    C::Alloc: AllocatorDefault,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: StackConfig> Deref for Stack<T, C> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, C: StackConfig> Extend<T> for Stack<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut iter = iter.into_iter();
        let (min_len, _) = iter.size_hint();
        if min_len > 0 {
            if let Err(error) = self.reserve_slots(min_len, false) {
                error.panic();
            }
        }
        loop {
            let mut insert = Inserter::for_buffer(&mut self.buffer);
            while !insert.full() {
                match iter.next() {
                    Some(value) => insert.push(value),
                    None => break,
                }
            }
            let (count, end) = insert.complete();
            if count > 0 {
                // SAFETY: the inserter only writes within the buffer capacity
                unsafe { self.buffer.set_length(C::Index::from_usize(end)) };
                self.sorted = false;
            }
            match iter.next() {
                Some(value) => {
                    self.push(value);
                }
                None => break,
            }
        }
    }
}

impl<T, C: StackConfig> FromIterator<T> for Stack<T, C>
where
    C::Alloc: AllocatorDefault,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut stack = Self::new();
        stack.extend(iter);
        stack
    }
}

impl<T, C: StackConfig> IntoIterator for Stack<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T, C>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.into_inner())
    }
}

impl<'a, T, C: StackConfig> IntoIterator for &'a Stack<T, C> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T1, C1, T2, C2> PartialEq<Stack<T2, C2>> for Stack<T1, C1>
where
    C1: StackConfig,
    C2: StackConfig,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &Stack<T2, C2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, C: StackConfig> Eq for Stack<T, C> {}

impl<T1, C1, T2> PartialEq<[T2]> for Stack<T1, C1>
where
    C1: StackConfig,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &[T2]) -> bool {
        self.as_slice() == other
    }
}

impl<T1, C1, T2, const N: usize> PartialEq<[T2; N]> for Stack<T1, C1>
where
    C1: StackConfig,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &[T2; N]) -> bool {
        self.as_slice() == other
    }
}

#[cfg(feature = "zeroize")]
impl<T, A: crate::alloc::Allocator> zeroize::ZeroizeOnDrop
    for Stack<T, crate::alloc::ZeroizingAlloc<A>>
{
}
