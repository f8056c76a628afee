//! Allocators for stack slot storage.
//!
//! With the `allocator-api2` feature the [`Allocator`] trait and [`Global`]
//! allocator are re-exported from that crate, so any allocator written for it
//! may back a [`Stack`](crate::Stack). Otherwise a compatible subset of the
//! trait is defined here.

use core::alloc::Layout;
#[cfg(not(feature = "allocator-api2"))]
use core::fmt;
#[cfg(not(feature = "allocator-api2"))]
use core::ptr;
use core::ptr::NonNull;
#[cfg(feature = "zeroize")]
use core::slice;

#[cfg(all(feature = "alloc", not(feature = "allocator-api2")))]
use alloc_crate::alloc::{alloc as raw_alloc, dealloc as raw_dealloc, realloc as raw_realloc};

#[cfg(all(feature = "alloc", feature = "allocator-api2"))]
pub use allocator_api2::alloc::Global;
#[cfg(feature = "allocator-api2")]
pub use allocator_api2::alloc::{AllocError, Allocator};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

#[cfg(all(not(test), feature = "alloc"))]
pub use alloc_crate::alloc::handle_alloc_error;

#[cfg(any(test, not(feature = "alloc")))]
/// Custom allocation error handler.
pub fn handle_alloc_error(layout: Layout) -> ! {
    panic!("memory allocation of {} bytes failed", layout.size());
}

/// The AllocError error indicates an allocation failure that may be due to
/// resource exhaustion or to an unsupported layout.
#[cfg(not(feature = "allocator-api2"))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AllocError;

#[cfg(not(feature = "allocator-api2"))]
impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("memory allocation failed")
    }
}

#[cfg(all(feature = "std", not(feature = "allocator-api2")))]
impl std::error::Error for AllocError {}

/// An implementation of `Allocator` can allocate, grow and deallocate
/// blocks of memory described by a `Layout`.
///
/// Stacks only ever grow their slot storage, so shrinking is not part of
/// this interface.
///
/// # Safety
/// - Memory blocks returned from an allocator must point to valid memory and
///   remain valid until the instance and all of its clones are dropped.
/// - Cloning or moving the allocator must not invalidate memory blocks
///   returned from it.
/// - If `grow` returns an error, the block passed to it must remain valid
///   and unchanged.
#[cfg(not(feature = "allocator-api2"))]
pub unsafe trait Allocator {
    /// Try to allocate a block of memory fitting `layout`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError>;

    /// Release a block of memory produced by this allocator.
    ///
    /// # Safety
    /// The value `ptr` must represent a block currently allocated by this
    /// allocator, and `layout` must be the layout it was allocated with.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Try to extend a block of memory to fit `new_layout`, preserving
    /// its contents.
    ///
    /// # Safety
    /// The value `ptr` must represent a block currently allocated by this
    /// allocator with `old_layout`, and `new_layout` must not be smaller.
    unsafe fn grow(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        debug_assert!(
            new_layout.size() >= old_layout.size(),
            "`new_layout.size()` must be greater than or equal to `old_layout.size()`"
        );

        // Allocate a new block and move the contents. This path is also what
        // lets `ZeroizingAlloc` wipe every block it gives up.
        let new_ptr = self.allocate(new_layout)?;
        let cp_len = old_layout.size().min(new_ptr.len());
        if cp_len > 0 {
            ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.as_ptr().cast(), cp_len);
        }
        self.deallocate(ptr, old_layout);
        Ok(new_ptr)
    }
}

#[cfg(not(feature = "allocator-api2"))]
unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }

    #[inline]
    unsafe fn grow(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        (**self).grow(ptr, old_layout, new_layout)
    }
}

/// Allocators supporting a constant initializer, allowing `const`
/// construction of empty stacks.
pub trait AllocatorDefault: Allocator + Clone + Default {
    /// The constant initializer for this allocator.
    const DEFAULT: Self;
}

/// The global memory allocator.
///
/// When the `alloc` feature is enabled, this type forwards to the allocator
/// registered with the `#[global_allocator]` attribute, or the `std`
/// default.
#[cfg(any(not(feature = "alloc"), not(feature = "allocator-api2")))]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "alloc", derive(Default, Copy))]
pub struct Global;

#[cfg(all(feature = "alloc", not(feature = "allocator-api2")))]
#[inline]
fn layout_dangling(layout: Layout) -> NonNull<u8> {
    // SAFETY: layout alignments are guaranteed to be non-zero.
    unsafe { NonNull::new_unchecked(layout.align() as *mut u8) }
}

#[cfg(all(feature = "alloc", not(feature = "allocator-api2")))]
unsafe impl Allocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        let ptr = if layout.size() == 0 {
            layout_dangling(layout)
        } else {
            let Some(ptr) = NonNull::new(unsafe { raw_alloc(layout) }) else {
                return Err(AllocError);
            };
            ptr
        };
        Ok(NonNull::slice_from_raw_parts(ptr, layout.size()))
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() > 0 {
            raw_dealloc(ptr.as_ptr(), layout);
        }
    }

    #[inline]
    unsafe fn grow(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        if old_layout.size() == 0 || old_layout.align() != new_layout.align() {
            let new_ptr = self.allocate(new_layout)?;
            if old_layout.size() > 0 {
                ptr::copy_nonoverlapping(
                    ptr.as_ptr(),
                    new_ptr.as_ptr().cast::<u8>(),
                    old_layout.size(),
                );
                self.deallocate(ptr, old_layout);
            }
            return Ok(new_ptr);
        }
        let Some(new_ptr) = NonNull::new(raw_realloc(ptr.as_ptr(), old_layout, new_layout.size()))
        else {
            return Err(AllocError);
        };
        Ok(NonNull::slice_from_raw_parts(new_ptr, new_layout.size()))
    }
}

#[cfg(not(feature = "alloc"))]
// Stub implementation to allow Global as the default allocator type
// even when the `alloc` feature is not enabled. Any usage as an allocator
// will result in a panic.
unsafe impl Allocator for Global {
    fn allocate(&self, _layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        unimplemented!();
    }

    unsafe fn deallocate(&self, _ptr: NonNull<u8>, _layout: Layout) {
        unimplemented!();
    }
}

#[cfg(feature = "alloc")]
impl AllocatorDefault for Global {
    const DEFAULT: Self = Global;
}

#[cfg(feature = "zeroize")]
/// An allocator which allocates via `A` and zeroizes every block it releases,
/// including the old block left behind when slot storage grows.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroizingAlloc<A>(pub A);

#[cfg(feature = "zeroize")]
unsafe impl<A: Allocator> Allocator for ZeroizingAlloc<A> {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        self.0.allocate(layout)
    }

    // The provided `grow` allocates a new block and releases the old one
    // through `deallocate` below.

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() > 0 {
            let mem = slice::from_raw_parts_mut(ptr.as_ptr(), layout.size());
            mem.zeroize();
        }
        self.0.deallocate(ptr, layout)
    }
}

#[cfg(feature = "zeroize")]
impl<A: AllocatorDefault> AllocatorDefault for ZeroizingAlloc<A> {
    const DEFAULT: Self = ZeroizingAlloc(A::DEFAULT);
}
