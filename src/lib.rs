//! In-memory emulation of an erasable, NAND-flash-like block device.
//!
//! A [`BlockDevice`] owns `block_count * block_size` bytes reachable through a virtual address
//! range that starts at a block aligned base address. Writes AND into the stored bytes, so they
//! can only clear bits; erases reset whole blocks to `0xFF`.
#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod device;
pub mod dump;
mod error;
pub mod handle;
mod storage;
mod util;

#[cfg(test)]
mod tests_util;

pub use device::BlockDevice;
pub use error::ErrorKind;
pub use storage::{Geometry, Storage};
pub use util::ERASE_STATE;
