use core::mem::MaybeUninit;
use core::ptr;
use core::slice;

use crate::alloc::Allocator;
use crate::capacity::Index;

use super::buffer::SlotBuffer;

/// Writes values into the spare slots of a buffer. Values written before
/// the inserter is completed are dropped if it is abandoned, for instance
/// when a clone panics.
pub(crate) struct Inserter<'a, T> {
    buf: &'a mut [MaybeUninit<T>],
    start: usize,
    end: usize,
}

impl<'a, T> Inserter<'a, T> {
    #[inline]
    pub fn for_buffer<I: Index, A: Allocator>(buf: &'a mut SlotBuffer<T, I, A>) -> Self {
        let cap = buf.capacity().to_usize();
        let len = buf.length().to_usize();
        Self {
            buf: unsafe { slice::from_raw_parts_mut(buf.data_ptr_mut().cast(), cap) },
            start: len,
            end: len,
        }
    }

    #[inline]
    pub fn extend_from_slice(&mut self, data: &[T])
    where
        T: Clone,
    {
        for item in data {
            self.push(item.clone());
        }
    }

    #[inline]
    pub fn push(&mut self, val: T) {
        self.buf[self.end].write(val);
        self.end += 1;
    }

    #[inline]
    pub const fn full(&self) -> bool {
        self.end == self.buf.len()
    }

    /// Accept the written values, returning the number written and the new
    /// length of the buffer.
    #[inline]
    pub fn complete(mut self) -> (usize, usize) {
        let count = self.end - self.start;
        self.start = self.end;
        (count, self.end)
    }
}

impl<T> Drop for Inserter<'_, T> {
    #[inline]
    fn drop(&mut self) {
        if self.start != self.end {
            unsafe {
                ptr::drop_in_place(
                    &mut self.buf[self.start..self.end] as *mut [MaybeUninit<T>] as *mut [T],
                )
            };
        }
    }
}
