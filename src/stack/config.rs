//! `Stack` configuration types and trait definitions.

use core::fmt;
use core::marker::PhantomData;

use const_default::ConstDefault;

use crate::alloc::{Allocator, AllocatorDefault};
use crate::capacity::{Grow, GrowHalf, Index};

/// Define the associated types for `Stack` instances.
pub trait StackConfig {
    /// The allocator providing slot storage.
    type Alloc: Allocator;

    /// The growth strategy.
    type Grow: Grow;

    /// The index type used to define the capacity and length.
    type Index: Index;

    /// Convert this configuration into the allocator instance.
    fn into_alloc(self) -> Self::Alloc;
}

impl<A: Allocator> StackConfig for A {
    type Alloc = A;
    type Grow = GrowHalf;
    type Index = usize;

    #[inline]
    fn into_alloc(self) -> A {
        self
    }
}

/// Parameterize `Stack` with a custom index type or growth behavior.
///
/// A narrow index type bounds the number of slots: a stack configured with
/// a `u8` index holds at most 255 handles.
pub struct Custom<A: Allocator, I: Index = usize, G: Grow = GrowHalf> {
    alloc: A,
    _pd: PhantomData<(I, G)>,
}

impl<A: Allocator, I: Index, G: Grow> Custom<A, I, G> {
    /// Create a configuration using the allocator `alloc`.
    #[inline]
    pub const fn new_in(alloc: A) -> Self {
        Self {
            alloc,
            _pd: PhantomData,
        }
    }
}

impl<A: AllocatorDefault, I: Index, G: Grow> ConstDefault for Custom<A, I, G> {
    /// An instance of this custom `Stack` definition.
    const DEFAULT: Self = Self::new_in(A::DEFAULT);
}

impl<A: AllocatorDefault, I: Index, G: Grow> Default for Custom<A, I, G> {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl<A: Allocator + fmt::Debug, I: Index, G: Grow> fmt::Debug for Custom<A, I, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom")
            .field("alloc", &self.alloc)
            .field("index", &core::any::type_name::<I>())
            .field("grow", &core::any::type_name::<G>())
            .finish()
    }
}

impl<A: Allocator, I: Index, G: Grow> StackConfig for Custom<A, I, G> {
    type Alloc = A;
    type Grow = G;
    type Index = I;

    #[inline]
    fn into_alloc(self) -> A {
        self.alloc
    }
}
