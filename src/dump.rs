use alloc::vec;
use core::fmt::{self, Write};

use log::error;

use crate::storage::Storage;

const BYTES_PER_LINE: usize = 16;

/// Write the contents of `storage` as upper case hex, sixteen bytes per line.
///
/// A line that can't be read is replaced by an error marker and the dump carries on.
pub fn hex_dump<S: Storage, W: Write>(storage: &S, out: &mut W) -> fmt::Result {
    let geometry = storage.geometry();
    let end = geometry.start_address + geometry.capacity();
    let mut line = vec![0u8; BYTES_PER_LINE];

    let mut address = geometry.start_address;
    while address < end {
        let len = core::cmp::min(BYTES_PER_LINE, end - address);
        match storage.read(address, &mut line[..len]) {
            Ok(()) => {
                for byte in &line[..len] {
                    write!(out, "{:02X} ", byte)?;
                }
            }
            Err(e) => {
                error!("Failure to read dump line at 0x{:x}: {}", address, e);
                out.write_str("ERROR reading data")?;
            }
        }
        out.write_char('\n')?;
        address += len;
    }
    Ok(())
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::error::ErrorKind;
    use crate::storage::Geometry;
    use crate::tests_util::*;

    #[test]
    fn test_dump_erased_device() {
        init();
        let device = make_device(2, 16, 0);
        let mut out = String::new();
        hex_dump(&device, &mut out).unwrap();

        let line = "FF ".repeat(16) + "\n";
        assert_eq!(out, line.repeat(2));
    }

    #[test]
    fn test_dump_written_bytes() {
        let mut device = make_device(1, 16, 0x100);
        device.write(0x100, b"ABCDEFGHIJKLMNOP").unwrap();
        let mut out = String::new();
        hex_dump(&device, &mut out).unwrap();
        assert_eq!(
            out,
            "41 42 43 44 45 46 47 48 49 4A 4B 4C 4D 4E 4F 50 \n"
        );
    }

    #[test]
    fn test_dump_partial_last_line() {
        let device = make_device(3, 6, 0);
        let mut out = String::new();
        hex_dump(&device, &mut out).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next().unwrap(), "FF ".repeat(16));
        assert_eq!(lines.next().unwrap(), "FF ".repeat(2));
        assert!(lines.next().is_none());
    }

    struct Unreadable;

    impl Storage for Unreadable {
        fn read(&self, _address: usize, _data: &mut [u8]) -> Result<(), ErrorKind> {
            Err(ErrorKind::OutOfRange)
        }
        fn write(&mut self, _address: usize, _data: &[u8]) -> Result<(), ErrorKind> {
            Err(ErrorKind::OutOfRange)
        }
        fn erase(&mut self, _address: usize, _len: usize) -> Result<(), ErrorKind> {
            Err(ErrorKind::OutOfRange)
        }
        fn erase_all(&mut self) -> Result<(), ErrorKind> {
            Err(ErrorKind::OutOfRange)
        }
        fn geometry(&self) -> Geometry {
            Geometry {
                block_size: 16,
                num_blocks: 1,
                start_address: 0,
            }
        }
    }

    #[test]
    fn test_dump_marks_read_errors() {
        init();
        let mut out = String::new();
        hex_dump(&Unreadable, &mut out).unwrap();
        assert_eq!(out, "ERROR reading data\n");
    }
}
