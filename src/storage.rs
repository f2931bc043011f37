use crate::error::ErrorKind;

/// Shape of an erasable medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub block_size: usize,
    pub num_blocks: usize,
    pub start_address: usize,
}

impl Geometry {
    pub const fn capacity(&self) -> usize {
        self.block_size * self.num_blocks
    }
}

/// Flash-like storage addressed by virtual byte address.
///
/// Writes may only clear bits; `erase` returns whole blocks to the erased state.
pub trait Storage {
    fn read(&self, address: usize, data: &mut [u8]) -> Result<(), ErrorKind>;
    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), ErrorKind>;
    fn erase(&mut self, address: usize, len: usize) -> Result<(), ErrorKind>;
    fn erase_all(&mut self) -> Result<(), ErrorKind>;
    fn geometry(&self) -> Geometry;
}
