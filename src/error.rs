//! Error handling.

use core::alloc::{Layout, LayoutError};
use core::fmt;

/// An enumeration of error types raised when stack storage cannot be provided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// A memory allocation failed.
    AllocError(Layout),
    /// The requested number of slots exceeds the maximum for the element
    /// and index types.
    CapacityLimit,
    /// The slot layout was not allocatable.
    LayoutError(LayoutError),
}

impl StorageError {
    /// Generic description of this error.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllocError(_) => "Allocation error",
            Self::CapacityLimit => "Exceeded stack capacity limit",
            Self::LayoutError(_) => "Layout error",
        }
    }

    /// Generate a panic with this error as the reason.
    #[cold]
    #[inline(never)]
    pub fn panic(self) -> ! {
        if let Self::AllocError(layout) = self {
            crate::alloc::handle_alloc_error(layout);
        } else {
            panic!("{}", self.as_str())
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LayoutError> for StorageError {
    fn from(err: LayoutError) -> Self {
        Self::LayoutError(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StorageError {}

/// An error raised by stack insertions when storage was not available.
/// Carries the handle that could not be stored.
#[derive(Clone)]
pub struct UpdateError<T> {
    pub(crate) error: StorageError,
    pub(crate) value: T,
}

impl<T> UpdateError<T> {
    pub(crate) fn new(error: StorageError, value: T) -> Self {
        Self { error, value }
    }

    /// Generic description of this error
    pub fn as_str(&self) -> &'static str {
        "Update error"
    }

    /// Get a reference to the contained `StorageError`
    pub fn error(&self) -> &StorageError {
        &self.error
    }

    /// Unwrap the handle which was not inserted
    pub fn into_value(self) -> T {
        self.value
    }

    /// Generate a panic with this error as the reason
    #[cold]
    #[inline(never)]
    pub fn panic(self) -> ! {
        if let StorageError::AllocError(layout) = self.error {
            crate::alloc::handle_alloc_error(layout);
        }
        panic!("{}: {}", self.as_str(), self.error.as_str());
    }
}

impl<T> fmt::Debug for UpdateError<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for UpdateError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}: {}", self.as_str(), self.error))
    }
}

#[cfg(feature = "std")]
impl<T> std::error::Error for UpdateError<T> {}

/// An error raised by [`Stack::deep_copy`](crate::Stack::deep_copy).
///
/// When an element copy fails, every copy produced before it has already
/// been passed to the release callback and the partial stack discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CopyError<E> {
    /// Storage for the new stack could not be allocated.
    Storage(StorageError),
    /// The copy callback failed for the element at `index`.
    Element {
        /// Position of the element in the source stack.
        index: usize,
        /// The error returned by the copy callback.
        error: E,
    },
}

impl<E> CopyError<E> {
    /// Generic description of this error.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Storage(err) => err.as_str(),
            Self::Element { .. } => "Element copy failed",
        }
    }

    /// The position of the element whose copy failed, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Storage(_) => None,
            Self::Element { index, .. } => Some(*index),
        }
    }
}

impl<E> From<StorageError> for CopyError<E> {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl<E: fmt::Display> fmt::Display for CopyError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(err) => fmt::Display::fmt(err, f),
            Self::Element { index, error } => {
                write!(f, "{} at index {}: {}", self.as_str(), index, error)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug + fmt::Display> std::error::Error for CopyError<E> {}

#[cfg(test)]
mod tests {
    use super::{CopyError, StorageError, UpdateError};
    use core::alloc::Layout;
    use std::string::ToString;

    #[test]
    #[should_panic(expected = "memory allocation of 8 bytes failed")]
    fn alloc_error_panic() {
        // When testing, crate::alloc::handle_alloc_error is replaced with an
        // explicit panic, as #[should_panic] does not capture the standard
        // out-of-memory handler.
        let a = StorageError::AllocError(Layout::new::<usize>());
        a.panic();
    }

    #[test]
    #[should_panic(expected = "Exceeded stack capacity limit")]
    fn capacity_limit_panic() {
        StorageError::CapacityLimit.panic();
    }

    #[test]
    #[should_panic(expected = "Update error: Exceeded stack capacity limit")]
    fn update_error_panic() {
        UpdateError::new(StorageError::CapacityLimit, 5u8).panic();
    }

    #[test]
    fn update_error_returns_value() {
        let err = UpdateError::new(StorageError::CapacityLimit, "handle");
        assert_eq!(err.error(), &StorageError::CapacityLimit);
        assert_eq!(err.into_value(), "handle");
    }

    #[test]
    fn copy_error_display() {
        let err = CopyError::Element {
            index: 2,
            error: "out of memory",
        };
        assert_eq!(err.index(), Some(2));
        assert_eq!(
            err.to_string(),
            "Element copy failed at index 2: out of memory"
        );
        let err: CopyError<&str> = StorageError::CapacityLimit.into();
        assert_eq!(err.index(), None);
        assert_eq!(err.to_string(), "Exceeded stack capacity limit");
    }
}
