//! Types used to define the length and capacity of stacks, and the growth
//! policy applied when a stack runs out of slots.

use core::fmt::{Debug, Display};
use core::mem::size_of;

/// The smallest number of slots allocated for a stack.
pub const MIN_CAPACITY: usize = 4;

/// Types which may be used to index and define the length and capacity of stacks.
///
/// A narrow index type also bounds the number of slots a stack may hold.
pub trait Index:
    Copy + Clone + Debug + Display + PartialEq + Eq + PartialOrd + Ord + Send + Sync + Sized + 'static
{
    /// The zero value
    const ZERO: Self;
    /// The maximum representable value of this type as a `usize`
    const MAX_USIZE: usize;

    /// Create an instance of this type from a usize known to be in range
    fn from_usize(val: usize) -> Self;

    /// Try to create an instance of this type from a usize
    fn try_from_usize(val: usize) -> Option<Self>;

    /// Convert this instance into a `usize`
    fn to_usize(self) -> usize;
}

macro_rules! impl_index {
    ($($ty:ty),+) => {
        $(
            impl Index for $ty {
                const ZERO: Self = 0;
                const MAX_USIZE: usize = <$ty>::MAX as usize;

                #[inline]
                fn from_usize(val: usize) -> Self {
                    debug_assert!(val <= Self::MAX_USIZE);
                    val as Self
                }

                #[inline]
                fn try_from_usize(val: usize) -> Option<Self> {
                    val.try_into().ok()
                }

                #[inline]
                fn to_usize(self) -> usize {
                    self as usize
                }
            }
        )+
    };
}

impl_index!(u8, u16, u32);

impl Index for usize {
    const ZERO: Self = 0usize;
    const MAX_USIZE: usize = usize::MAX;

    #[inline]
    fn from_usize(val: usize) -> Self {
        val
    }

    #[inline]
    fn try_from_usize(val: usize) -> Option<Self> {
        Some(val)
    }

    #[inline]
    fn to_usize(self) -> usize {
        self
    }
}

/// The maximum number of slots for elements of type `T` indexed by `I`.
///
/// This is bounded both by the index type and by the largest allocation
/// size (`isize::MAX` bytes), so that the byte size of the slot storage can
/// never overflow.
pub const fn max_capacity<T, I: Index>() -> usize {
    let size = size_of::<T>();
    let by_size = if size == 0 {
        usize::MAX
    } else {
        isize::MAX as usize / size
    };
    if by_size < I::MAX_USIZE {
        by_size
    } else {
        I::MAX_USIZE
    }
}

/// Growth behavior for stacks which have exceeded their available slots.
pub trait Grow: Debug {
    /// Calculate the next capacity to request from the allocator, given the
    /// current capacity and the number of slots required. Returns `None`
    /// when no capacity within `max_capacity::<T, I>()` satisfies `target`.
    fn next_capacity<T, I: Index>(current: I, target: I) -> Option<I>;
}

/// Growth behavior which requests exactly the required number of slots.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct GrowExact;

impl Grow for GrowExact {
    #[inline]
    fn next_capacity<T, I: Index>(_current: I, target: I) -> Option<I> {
        if target.to_usize() <= max_capacity::<T, I>() {
            Some(target)
        } else {
            None
        }
    }
}

/// Growth behavior which expands the capacity by half of its current size
/// until the target is met, clamping to the maximum capacity.
///
/// A factor below the golden ratio lets released blocks be reused by later
/// allocations, and 3/2 keeps the overflow bound simple to compute.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct GrowHalf;

impl GrowHalf {
    /// The largest capacity which can be expanded by half without
    /// exceeding `max`.
    #[inline]
    const fn expand_limit(max: usize) -> usize {
        (max / 3) * 2 + if max % 3 != 0 { 1 } else { 0 }
    }
}

impl Grow for GrowHalf {
    fn next_capacity<T, I: Index>(current: I, target: I) -> Option<I> {
        let max = max_capacity::<T, I>();
        let target = target.to_usize();
        if target > max {
            return None;
        }
        let limit = Self::expand_limit(max);
        let mut current = current.to_usize();
        if current < 2 {
            // expanding by half would never advance from here
            current = MIN_CAPACITY.min(max);
        }
        while current < target {
            if current >= max {
                return None;
            }
            current = if current < limit {
                match current.checked_add(current / 2) {
                    Some(next) => next.min(max),
                    None => max,
                }
            } else {
                max
            };
        }
        Some(I::from_usize(current))
    }
}
