//! Element handles stored in stack slots.
//!
//! A stack never looks through its handles except through a [`Comparator`]
//! supplied by the caller. Without one, lookups only compare handle
//! identity: two reference-like handles are the same when they point to the
//! same place, and two plain ids are the same when they are equal.
//!
//! [`Comparator`]: crate::Comparator

use core::ptr::{self, NonNull};

#[cfg(feature = "alloc")]
use alloc_crate::{boxed::Box, rc::Rc, sync::Arc};

/// A value which may be held in a [`Stack`](crate::Stack) slot.
pub trait Handle {
    /// Check whether two handles refer to the same element.
    fn same_handle(&self, other: &Self) -> bool;

    /// Check whether this is the absent handle. Absent handles are carried
    /// over by deep copies and skipped by bulk release.
    #[inline]
    fn is_absent(&self) -> bool {
        false
    }
}

impl<T: ?Sized> Handle for &T {
    #[inline]
    fn same_handle(&self, other: &Self) -> bool {
        ptr::eq(*self, *other)
    }
}

impl<T: ?Sized> Handle for &mut T {
    #[inline]
    fn same_handle(&self, other: &Self) -> bool {
        ptr::eq(&**self, &**other)
    }
}

impl<T: ?Sized> Handle for *const T {
    #[inline]
    fn same_handle(&self, other: &Self) -> bool {
        ptr::eq(*self, *other)
    }

    #[inline]
    fn is_absent(&self) -> bool {
        self.is_null()
    }
}

impl<T: ?Sized> Handle for *mut T {
    #[inline]
    fn same_handle(&self, other: &Self) -> bool {
        ptr::eq(*self, *other)
    }

    #[inline]
    fn is_absent(&self) -> bool {
        self.is_null()
    }
}

impl<T: ?Sized> Handle for NonNull<T> {
    #[inline]
    fn same_handle(&self, other: &Self) -> bool {
        ptr::eq(self.as_ptr(), other.as_ptr())
    }
}

#[cfg(feature = "alloc")]
impl<T: ?Sized> Handle for Box<T> {
    #[inline]
    fn same_handle(&self, other: &Self) -> bool {
        ptr::eq(&**self, &**other)
    }
}

#[cfg(feature = "alloc")]
impl<T: ?Sized> Handle for Rc<T> {
    #[inline]
    fn same_handle(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

#[cfg(feature = "alloc")]
impl<T: ?Sized> Handle for Arc<T> {
    #[inline]
    fn same_handle(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<H: Handle> Handle for Option<H> {
    #[inline]
    fn same_handle(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same_handle(b),
            (None, None) => true,
            _ => false,
        }
    }

    #[inline]
    fn is_absent(&self) -> bool {
        match self {
            Some(h) => h.is_absent(),
            None => true,
        }
    }
}

macro_rules! impl_id_handle {
    ($($ty:ty),+) => {
        $(
            impl Handle for $ty {
                #[inline]
                fn same_handle(&self, other: &Self) -> bool {
                    *self == *other
                }
            }
        )+
    };
}

impl_id_handle!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

#[cfg(test)]
mod tests {
    use super::Handle;

    #[test]
    fn reference_identity() {
        let a = 5u32;
        let b = 5u32;
        assert!(<&u32 as Handle>::same_handle(&&a, &&a));
        assert!(!<&u32 as Handle>::same_handle(&&a, &&b));
        assert!(a.same_handle(&b));
    }

    #[test]
    fn pointer_absent() {
        let a = 1u8;
        let p: *const u8 = &a;
        assert!(!p.is_absent());
        assert!(core::ptr::null::<u8>().is_absent());
        assert!(p.same_handle(&(&a as *const u8)));
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn shared_identity() {
        use std::{boxed::Box, rc::Rc};

        let a = Rc::new(1);
        let b = Rc::new(1);
        assert!(a.same_handle(&a.clone()));
        assert!(!a.same_handle(&b));
        let x = Box::new(3);
        let y = Box::new(3);
        assert!(x.same_handle(&x));
        assert!(!x.same_handle(&y));
    }

    #[test]
    fn option_handles() {
        let a = 1i32;
        assert!(None::<&i32>.is_absent());
        assert!(!Some(&a).is_absent());
        assert!(Some(&a).same_handle(&Some(&a)));
        assert!(!Some(&a).same_handle(&None));
        assert!(None::<&i32>.same_handle(&None));
        assert!(Some(core::ptr::null::<i32>()).is_absent());
    }

    #[test]
    fn id_handles() {
        assert!(7u64.same_handle(&7));
        assert!(!7u64.same_handle(&8));
    }
}
