//! Growable stacks of element handles with lazy sorting and search.
//!
//! A [`Stack`] stores opaque handles (references, pointers, shared pointers or
//! plain ids) in a contiguous slot buffer. It never owns the payloads behind
//! those handles unless asked to through [`Stack::deep_copy`] or
//! [`Stack::pop_free`]. When a [`Comparator`] is installed, lookups sort the
//! slots on demand and use a binary search; without one, lookups compare
//! handle identity.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

#[cfg(test)]
#[macro_use]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc as alloc_crate;

#[macro_use]
mod macros;

pub mod alloc;

pub mod capacity;

pub(crate) mod error;

pub mod handle;

pub mod stack;

pub(crate) mod storage;

pub use self::{
    error::{CopyError, StorageError, UpdateError},
    handle::Handle,
    stack::{Comparator, FindMode, Stack},
};
