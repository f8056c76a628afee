//! Ordering and search for `Stack` instances.
//!
//! The sorted state of a stack is cached. Any insertion, removal or
//! replacement of a handle clears it, as does installing a different
//! comparator, and the next search sorts the slots again.

use core::cmp::Ordering;
use core::fmt;

use crate::capacity::Index;
use crate::handle::Handle;

use super::{Stack, StackConfig};

/// A total order over handles.
///
/// Two comparators are equal when they wrap the same function.
pub struct Comparator<T>(fn(&T, &T) -> Ordering);

impl<T> Comparator<T> {
    /// Wrap an ordering function.
    #[inline]
    pub const fn new(f: fn(&T, &T) -> Ordering) -> Self {
        Self(f)
    }

    /// Compare two handles.
    #[inline]
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }

    #[inline]
    fn addr(&self) -> usize {
        self.0 as usize
    }
}

impl<T> Clone for Comparator<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Comparator<T> {}

impl<T> PartialEq for Comparator<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl<T> Eq for Comparator<T> {}

impl<T> fmt::Debug for Comparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Comparator({:#x})", self.addr())
    }
}

impl<T> From<fn(&T, &T) -> Ordering> for Comparator<T> {
    #[inline]
    fn from(f: fn(&T, &T) -> Ordering) -> Self {
        Self(f)
    }
}

/// Selects the result of a search when the key is duplicated or missing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindMode {
    /// Return the first of the equal handles, or nothing if there is none.
    #[default]
    First,
    /// Return an equal handle if there is one, otherwise the position where
    /// the key would be inserted to keep the stack in order.
    Nearest,
}

/// Binary search over sorted `slots`.
pub(crate) fn search<T>(
    slots: &[T],
    key: &T,
    cmp: Comparator<T>,
    mode: FindMode,
) -> Option<usize> {
    let mut l = 0;
    let mut h = slots.len();
    while l < h {
        let i = l + (h - l) / 2;
        match cmp.compare(key, &slots[i]) {
            Ordering::Less => h = i,
            Ordering::Greater => l = i + 1,
            Ordering::Equal => {
                if mode == FindMode::Nearest {
                    return Some(i);
                }
                let mut first = i;
                while first > 0 && cmp.compare(key, &slots[first - 1]) == Ordering::Equal {
                    first -= 1;
                }
                return Some(first);
            }
        }
    }
    match mode {
        FindMode::First => None,
        FindMode::Nearest => Some(l),
    }
}

impl<T, C: StackConfig> Stack<T, C> {
    /// The current comparator, if any.
    #[inline]
    pub fn comparator(&self) -> Option<Comparator<T>> {
        self.comparator
    }

    /// Install a comparator, returning the previous one. Installing a
    /// different comparator marks the stack as unsorted.
    pub fn set_comparator(&mut self, cmp: Option<Comparator<T>>) -> Option<Comparator<T>> {
        let prev = core::mem::replace(&mut self.comparator, cmp);
        if prev != cmp {
            self.sorted = false;
        }
        prev
    }

    /// Check whether the stack is known to be sorted. This never sorts.
    #[inline]
    pub fn is_sorted(&self) -> bool {
        self.sorted || self.buffer.length().to_usize() <= 1
    }

    /// Sort the handles with the current comparator, if they are not
    /// already sorted. Without a comparator this does nothing.
    pub fn sort(&mut self) {
        if self.sorted {
            return;
        }
        let Some(cmp) = self.comparator else {
            return;
        };
        if self.buffer.length().to_usize() > 1 {
            self.buffer
                .as_mut_slice()
                .sort_unstable_by(|a, b| cmp.compare(a, b));
        }
        self.sorted = true;
    }

    /// Find the first handle equal to `key`.
    ///
    /// With a comparator installed the stack is sorted first, and equality
    /// is decided by the comparator. Otherwise handles are compared by
    /// identity in insertion order.
    #[inline]
    pub fn find(&mut self, key: &T) -> Option<C::Index>
    where
        T: Handle,
    {
        self.find_with(key, FindMode::First)
    }

    /// Find a handle equal to `key`, or the position where `key` would be
    /// inserted to keep the stack in order. Only an empty stack returns
    /// `None` when a comparator is installed.
    #[inline]
    pub fn find_nearest(&mut self, key: &T) -> Option<C::Index>
    where
        T: Handle,
    {
        self.find_with(key, FindMode::Nearest)
    }

    /// Find `key` using the given mode.
    pub fn find_with(&mut self, key: &T, mode: FindMode) -> Option<C::Index>
    where
        T: Handle,
    {
        if self.is_empty() {
            return None;
        }
        let Some(cmp) = self.comparator else {
            let index = self.iter().position(|h| h.same_handle(key))?;
            return Some(C::Index::from_usize(index));
        };
        self.sort();
        if key.is_absent() {
            return None;
        }
        let index = search(self.as_slice(), key, cmp, mode)?;
        Some(C::Index::from_usize(index))
    }
}
