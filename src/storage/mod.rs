//! Backing storage for stack slots.

mod buffer;
mod insert;

pub(crate) use self::buffer::SlotBuffer;
pub(crate) use self::insert::Inserter;
