use core::alloc::Layout;
use core::fmt;
use core::marker::PhantomData;
use core::mem::size_of;
use core::ptr::NonNull;
use core::slice;

use crate::alloc::Allocator;
use crate::capacity::{max_capacity, Index};
use crate::error::StorageError;

#[inline]
fn array_layout<T>(count: usize) -> Result<Layout, StorageError> {
    Layout::array::<T>(count).map_err(StorageError::LayoutError)
}

/// The bookkeeping for a slot buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SlotHeader<I: Index = usize> {
    pub capacity: I,
    pub length: I,
}

impl<I: Index> SlotHeader<I> {
    const EMPTY: Self = SlotHeader {
        capacity: I::ZERO,
        length: I::ZERO,
    };
}

/// A contiguous allocation of `capacity` slots, of which the first `length`
/// are initialized.
///
/// The buffer releases its allocation when dropped, but never drops the
/// values in its slots. That is left to the owning collection.
pub(crate) struct SlotBuffer<T, I: Index, A: Allocator> {
    header: SlotHeader<I>,
    data: NonNull<T>,
    alloc: A,
    _marker: PhantomData<T>,
}

impl<T, I: Index, A: Allocator> SlotBuffer<T, I, A> {
    /// Create a buffer without an allocation.
    #[inline]
    pub const fn dangling(alloc: A) -> Self {
        Self {
            header: SlotHeader::EMPTY,
            data: NonNull::dangling(),
            alloc,
            _marker: PhantomData,
        }
    }

    /// Create a buffer with exactly `capacity` slots.
    pub fn try_with_capacity(capacity: I, alloc: A) -> Result<Self, StorageError> {
        let mut buf = Self::dangling(alloc);
        buf.try_grow(capacity)?;
        Ok(buf)
    }

    #[inline]
    pub fn capacity(&self) -> I {
        self.header.capacity
    }

    #[inline]
    pub fn length(&self) -> I {
        self.header.length
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.header.capacity != I::ZERO
    }

    /// # Safety
    /// The first `len` slots must be initialized, and `len` may not exceed
    /// the capacity of the buffer.
    #[inline]
    pub unsafe fn set_length(&mut self, len: I) {
        debug_assert!(len <= self.header.capacity);
        self.header.length = len;
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    #[inline]
    pub fn data_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline]
    pub fn data_ptr_mut(&mut self) -> *mut T {
        self.data.as_ptr()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.data_ptr(), self.header.length.to_usize()) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.data_ptr_mut(), self.header.length.to_usize()) }
    }

    /// Grow the allocation to exactly `capacity` slots, preserving the
    /// initialized slots. A capacity at or below the current one is a no-op.
    /// On failure the buffer is left unchanged.
    pub fn try_grow(&mut self, capacity: I) -> Result<(), StorageError> {
        let cap = capacity.to_usize();
        let prev_cap = self.header.capacity.to_usize();
        if cap <= prev_cap {
            return Ok(());
        }
        if cap > max_capacity::<T, I>() {
            return Err(StorageError::CapacityLimit);
        }
        let layout = array_layout::<T>(cap)?;
        if layout.size() == 0 {
            // zero-sized slots never touch the allocator
            self.header.capacity = capacity;
            return Ok(());
        }
        let result = if prev_cap == 0 {
            self.alloc.allocate(layout)
        } else {
            let prev_layout = array_layout::<T>(prev_cap)?;
            unsafe { self.alloc.grow(self.data.cast(), prev_layout, layout) }
        };
        let Ok(ptr) = result else {
            trace_event!(debug, "slot allocation of {} bytes failed", layout.size());
            return Err(StorageError::AllocError(layout));
        };
        self.data = ptr.cast();
        self.header.capacity = capacity;
        Ok(())
    }
}

impl<T, I: Index, A: Allocator> Drop for SlotBuffer<T, I, A> {
    fn drop(&mut self) {
        let cap = self.header.capacity.to_usize();
        if cap == 0 || size_of::<T>() == 0 {
            return;
        }
        if let Ok(layout) = array_layout::<T>(cap) {
            unsafe { self.alloc.deallocate(self.data.cast(), layout) };
        }
    }
}

impl<T, I: Index, A: Allocator> fmt::Debug for SlotBuffer<T, I, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotBuffer")
            .field("capacity", &self.header.capacity)
            .field("length", &self.header.length)
            .finish_non_exhaustive()
    }
}

unsafe impl<T: Send, I: Index, A: Allocator + Send> Send for SlotBuffer<T, I, A> {}
unsafe impl<T: Sync, I: Index, A: Allocator + Sync> Sync for SlotBuffer<T, I, A> {}
