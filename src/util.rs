/// Value of every byte in an erased block.
pub const ERASE_STATE: u8 = 0xFF;

pub(crate) const CRC: crc::Crc<u32> = crc::Crc::<u32>::new(&crc::CRC_32_CKSUM);
