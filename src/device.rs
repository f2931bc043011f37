use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use log::{debug, error, trace, warn};

use crate::error::ErrorKind;
use crate::storage::{Geometry, Storage};
use crate::util::{CRC, ERASE_STATE};

/// In-memory emulation of a NAND-like block device.
///
/// The device exposes `block_count * block_size` bytes at the virtual addresses
/// `[start_address, start_address + block_count * block_size)`. A write ANDs the new data into
/// the existing contents so it can only clear bits. Only an erase sets bits back to 1, and it
/// always does so for whole blocks.
pub struct BlockDevice {
    block_count: usize,
    block_size: usize,
    start_address: usize,
    buffer: Vec<u8>,
}

impl fmt::Debug for BlockDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockDevice")
            .field("block_count", &self.block_count)
            .field("block_size", &self.block_size)
            .field("start_address", &format_args!("0x{:x}", self.start_address))
            .finish()
    }
}

impl BlockDevice {
    /// Create a device with every byte in the erased state.
    ///
    /// The block size must be even and non-zero, and the start address a multiple of it. The
    /// block size is only checked for parity, so a size such as 6 is accepted.
    pub fn new(
        block_count: usize,
        block_size: usize,
        start_address: usize,
    ) -> Result<Self, ErrorKind> {
        if block_size == 0 || block_size % 2 != 0 || start_address % block_size != 0 {
            error!(
                "Invalid geometry block size: {} start address: 0x{:x}",
                block_size, start_address
            );
            return Err(ErrorKind::InvalidGeometry);
        }

        let capacity = block_count
            .checked_mul(block_size)
            .filter(|capacity| start_address.checked_add(*capacity).is_some())
            .ok_or_else(|| {
                error!(
                    "Device of {} blocks of {} bytes at 0x{:x} exceeds address space",
                    block_count, block_size, start_address
                );
                ErrorKind::InvalidGeometry
            })?;

        let mut buffer = Vec::new();
        buffer.try_reserve_exact(capacity).map_err(|_| {
            error!("Failure to allocate {} bytes for block device.", capacity);
            ErrorKind::AllocationFailure
        })?;
        buffer.resize(capacity, ERASE_STATE);

        debug!(
            "Created block device blocks: {} block size: {} start: 0x{:x}",
            block_count, block_size, start_address
        );
        Ok(BlockDevice {
            block_count,
            block_size,
            start_address,
            buffer,
        })
    }

    pub fn block_count(&self) -> usize {
        self.block_count
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn start_address(&self) -> usize {
        self.start_address
    }

    /// One past the last valid virtual address.
    pub fn end_address(&self) -> usize {
        self.start_address + self.buffer.len()
    }

    /// Size of the device in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn geometry(&self) -> Geometry {
        Geometry {
            block_size: self.block_size,
            num_blocks: self.block_count,
            start_address: self.start_address,
        }
    }

    /// Raw view of the whole medium, indexed by physical offset.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// CRC-32 of the whole medium.
    pub fn checksum(&self) -> u32 {
        CRC.checksum(&self.buffer)
    }

    /// Whether `address` lies within the device.
    pub fn is_valid(&self, address: usize) -> bool {
        address >= self.start_address && address < self.end_address()
    }

    /// Whether the whole span `[address, address + len)` lies within the device.
    ///
    /// The start address must itself be valid even for an empty span.
    pub fn is_valid_span(&self, address: usize, len: usize) -> bool {
        self.is_valid(address)
            && self
                .to_physical(address)
                .checked_add(len)
                .map_or(false, |end| end <= self.buffer.len())
    }

    /// Offset into the buffer of a virtual address. The address must be valid.
    pub fn to_physical(&self, address: usize) -> usize {
        address.wrapping_sub(self.start_address)
    }

    /// Virtual address of the first byte of the block holding `address`.
    pub fn block_base(&self, address: usize) -> usize {
        (self.to_physical(address) / self.block_size) * self.block_size + self.start_address
    }

    /// Zero based index of the block holding `address`.
    pub fn block_index(&self, address: usize) -> Result<usize, ErrorKind> {
        if !self.is_valid(address) {
            return Err(ErrorKind::OutOfRange);
        }
        Ok(self.to_physical(address) / self.block_size)
    }

    /// Virtual address span covered by block `index`.
    pub fn block_range(&self, index: usize) -> Result<Range<usize>, ErrorKind> {
        if index >= self.block_count {
            return Err(ErrorKind::OutOfRange);
        }
        let start = self.start_address + index * self.block_size;
        Ok(start..start + self.block_size)
    }

    /// Copy `data.len()` bytes starting at `address` into `data`.
    pub fn read(&self, address: usize, data: &mut [u8]) -> Result<(), ErrorKind> {
        let span = self.physical_span(address, data.len())?;
        trace!("rd address: 0x{:x} len: {}", address, data.len());
        data.copy_from_slice(&self.buffer[span]);
        Ok(())
    }

    /// AND `data` into the contents starting at `address`.
    ///
    /// Bits that are already clear stay clear, so the stored value is the AND of everything
    /// written since the region was last erased.
    pub fn write(&mut self, address: usize, data: &[u8]) -> Result<(), ErrorKind> {
        let span = self.physical_span(address, data.len())?;
        trace!("wr address: 0x{:x} len: {}", address, data.len());
        for (cell, byte) in self.buffer[span].iter_mut().zip(data) {
            *cell &= *byte;
        }
        Ok(())
    }

    /// Erase every block touched by `[address, address + len)`.
    ///
    /// Whole blocks are reset even when the span covers only part of them.
    pub fn erase(&mut self, address: usize, len: usize) -> Result<(), ErrorKind> {
        self.physical_span(address, len)?;
        trace!("erase address: 0x{:x} len: {}", address, len);

        let mut cursor = address;
        let mut remaining = len;
        while remaining > 0 {
            let block = self.block_base(cursor);
            self.reset_block(block);

            let offset = self.to_physical(cursor) % self.block_size;
            let advance = self.block_size - offset;
            remaining = remaining.saturating_sub(advance);
            cursor += advance;
        }
        Ok(())
    }

    /// Erase the block at `index`.
    pub fn erase_block(&mut self, index: usize) -> Result<(), ErrorKind> {
        let range = self.block_range(index).map_err(|e| {
            warn!("Rejected erase of block {} of {}", index, self.block_count);
            e
        })?;
        self.reset_block(range.start);
        Ok(())
    }

    /// Reset the entire device to the erased state.
    pub fn erase_all(&mut self) {
        trace!("erase all {} bytes", self.buffer.len());
        self.buffer.fill(ERASE_STATE);
    }

    fn reset_block(&mut self, block: usize) {
        let start = self.to_physical(block);
        trace!("reset block at 0x{:x}", block);
        self.buffer[start..start + self.block_size].fill(ERASE_STATE);
    }

    fn physical_span(&self, address: usize, len: usize) -> Result<Range<usize>, ErrorKind> {
        if !self.is_valid_span(address, len) {
            warn!(
                "Rejected access at 0x{:x} len: {} outside of 0x{:x}..0x{:x}",
                address,
                len,
                self.start_address,
                self.end_address()
            );
            return Err(ErrorKind::OutOfRange);
        }
        let start = self.to_physical(address);
        Ok(start..start + len)
    }
}

impl Storage for BlockDevice {
    fn read(&self, address: usize, data: &mut [u8]) -> Result<(), ErrorKind> {
        BlockDevice::read(self, address, data)
    }

    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), ErrorKind> {
        BlockDevice::write(self, address, data)
    }

    fn erase(&mut self, address: usize, len: usize) -> Result<(), ErrorKind> {
        BlockDevice::erase(self, address, len)
    }

    fn erase_all(&mut self) -> Result<(), ErrorKind> {
        BlockDevice::erase_all(self);
        Ok(())
    }

    fn geometry(&self) -> Geometry {
        BlockDevice::geometry(self)
    }
}
