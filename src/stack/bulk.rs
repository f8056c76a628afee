use crate::capacity::{max_capacity, Index, MIN_CAPACITY};
use crate::error::{CopyError, StorageError};
use crate::handle::Handle;
use crate::storage::{Inserter, SlotBuffer};

use super::{Stack, StackConfig};

impl<T, C: StackConfig> Stack<T, C> {
    /// Try to create a shallow copy of this stack. The copy has the same
    /// handles, capacity, comparator and sorted state, and shares the values
    /// behind the handles with this stack.
    pub fn try_dup(&self) -> Result<Self, StorageError>
    where
        T: Clone,
        C::Alloc: Clone,
    {
        let mut buffer =
            SlotBuffer::try_with_capacity(self.buffer.capacity(), self.allocator().clone())?;
        let mut insert = Inserter::for_buffer(&mut buffer);
        insert.extend_from_slice(self.as_slice());
        let (_, end) = insert.complete();
        // SAFETY: the copied handles occupy the first `end` slots
        unsafe { buffer.set_length(C::Index::from_usize(end)) };
        Ok(Self {
            buffer,
            comparator: self.comparator,
            sorted: self.sorted,
        })
    }

    /// Create a copy of this stack which owns new values, produced by
    /// calling `copy` on each handle in order. Absent handles are carried
    /// over without calling `copy`.
    ///
    /// If `copy` fails, every value it produced so far is passed to
    /// `release`, last first, and the error is returned along with the
    /// position of the failing handle. This stack is never modified.
    pub fn deep_copy<F, R, E>(&self, mut copy: F, mut release: R) -> Result<Self, CopyError<E>>
    where
        T: Handle + Clone,
        C::Alloc: Clone,
        F: FnMut(&T) -> Result<T, E>,
        R: FnMut(T),
    {
        let len = self.buffer.length().to_usize();
        let capacity = if len == 0 {
            0
        } else {
            len.max(MIN_CAPACITY.min(max_capacity::<T, C::Index>()))
        };
        let buffer = SlotBuffer::try_with_capacity(
            C::Index::from_usize(capacity),
            self.allocator().clone(),
        )?;
        let mut copied = Self {
            buffer,
            comparator: self.comparator,
            sorted: false,
        };
        for (index, item) in self.iter().enumerate() {
            let value = if item.is_absent() {
                item.clone()
            } else {
                match copy(item) {
                    Ok(value) => value,
                    Err(error) => {
                        trace_event!(debug, "deep copy failed at index {}, rolling back", index);
                        while let Some(value) = copied.pop() {
                            if !value.is_absent() {
                                release(value);
                            }
                        }
                        return Err(CopyError::Element { index, error });
                    }
                }
            };
            // SAFETY: the copy has capacity for every handle of the source
            unsafe {
                copied.buffer.data_ptr_mut().add(index).write(value);
                copied.buffer.set_length(C::Index::from_usize(index + 1));
            }
        }
        copied.sorted = self.sorted;
        Ok(copied)
    }

    /// Release the stack, passing every present handle to `release` in
    /// order. Absent handles are dropped.
    pub fn pop_free<R>(self, mut release: R)
    where
        T: Handle,
        R: FnMut(T),
    {
        for value in self {
            if !value.is_absent() {
                release(value);
            }
        }
    }

    /// Drop every handle, retaining the allocated slots. This is the same
    /// operation as [`Stack::clear`].
    #[inline]
    pub fn zero(&mut self) {
        self.clear();
    }
}

impl<T: Clone, C: StackConfig> Clone for Stack<T, C>
where
    C::Alloc: Clone,
{
    fn clone(&self) -> Self {
        match self.try_dup() {
            Ok(stack) => stack,
            Err(error) => error.panic(),
        }
    }
}
