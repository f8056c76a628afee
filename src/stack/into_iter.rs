use core::fmt;
use core::iter::FusedIterator;
use core::ops::Range;
use core::ptr;
use core::slice;

use crate::alloc::Global;
use crate::capacity::Index;
use crate::storage::SlotBuffer;

use super::StackConfig;

/// An iterator which takes the handles out of a `Stack`.
pub struct IntoIter<T, C: StackConfig = Global> {
    remain: Range<usize>,
    buf: SlotBuffer<T, C::Index, C::Alloc>,
}

impl<T, C: StackConfig> IntoIter<T, C> {
    pub(super) fn new(mut buf: SlotBuffer<T, C::Index, C::Alloc>) -> Self {
        let end = buf.length().to_usize();
        // SAFETY: the handles are owned by the iterator from here on
        unsafe { buf.set_length(C::Index::ZERO) };
        Self {
            remain: Range { start: 0, end },
            buf,
        }
    }

    /// Access the remaining handles as a slice.
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.data_ptr().add(self.remain.start), self.len()) }
    }

    fn clear(&mut self) {
        let remain_len = self.len();
        if remain_len > 0 {
            let head = unsafe { self.buf.data_ptr_mut().add(self.remain.start) };
            self.remain.start = self.remain.end;
            unsafe {
                ptr::drop_in_place(slice::from_raw_parts_mut(head, remain_len));
            }
        }
    }
}

impl<T, C: StackConfig> AsRef<[T]> for IntoIter<T, C> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: fmt::Debug, C: StackConfig> fmt::Debug for IntoIter<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, C: StackConfig> Iterator for IntoIter<T, C> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.remain.start;
        if index != self.remain.end {
            self.remain.start = index + 1;
            unsafe { Some(ptr::read(self.buf.data_ptr().add(index))) }
        } else {
            None
        }
    }

    #[inline]
    fn count(self) -> usize
    where
        Self: Sized,
    {
        self.len()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<T, C: StackConfig> DoubleEndedIterator for IntoIter<T, C> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let mut index = self.remain.end;
        if index != self.remain.start {
            index -= 1;
            self.remain.end = index;
            unsafe { Some(ptr::read(self.buf.data_ptr().add(index))) }
        } else {
            None
        }
    }
}

impl<T, C: StackConfig> ExactSizeIterator for IntoIter<T, C> {
    #[inline]
    fn len(&self) -> usize {
        self.remain.end - self.remain.start
    }
}

impl<T, C: StackConfig> FusedIterator for IntoIter<T, C> {}

impl<T, C: StackConfig> Drop for IntoIter<T, C> {
    fn drop(&mut self) {
        self.clear();
    }
}
