//! Nullable handle interface over [`BlockDevice`].
//!
//! A handle is `None` until created and again after [`destroy`]. Every operation on an empty
//! handle fails with [`ErrorKind::NullDevice`] without side effects.

use log::debug;

use crate::device::BlockDevice;
use crate::error::ErrorKind;

pub type Handle = Option<BlockDevice>;

pub fn create(
    block_count: usize,
    block_size: usize,
    start_address: usize,
) -> Result<Handle, ErrorKind> {
    BlockDevice::new(block_count, block_size, start_address).map(Some)
}

/// Release the device held by `handle`, if any.
pub fn destroy(handle: &mut Handle) {
    if let Some(device) = handle.take() {
        debug!("Destroying {:?}", device);
    }
}

fn device(handle: &Handle) -> Result<&BlockDevice, ErrorKind> {
    handle.as_ref().ok_or(ErrorKind::NullDevice)
}

fn device_mut(handle: &mut Handle) -> Result<&mut BlockDevice, ErrorKind> {
    handle.as_mut().ok_or(ErrorKind::NullDevice)
}

pub fn read(handle: &Handle, address: usize, data: &mut [u8]) -> Result<(), ErrorKind> {
    device(handle)?.read(address, data)
}

pub fn write(handle: &mut Handle, address: usize, data: &[u8]) -> Result<(), ErrorKind> {
    device_mut(handle)?.write(address, data)
}

pub fn erase(handle: &mut Handle, address: usize, len: usize) -> Result<(), ErrorKind> {
    device_mut(handle)?.erase(address, len)
}

pub fn erase_all(handle: &mut Handle) -> Result<(), ErrorKind> {
    device_mut(handle)?.erase_all();
    Ok(())
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::tests_util::*;
    use crate::util::ERASE_STATE;

    #[test]
    fn test_create_and_destroy() {
        init();
        let mut handle = create(10, 16, 0).unwrap();
        assert!(handle.is_some());
        write(&mut handle, 0, b"ABCD").unwrap();

        let mut data = [0u8; 4];
        read(&handle, 0, &mut data).unwrap();
        assert_eq!(&data, b"ABCD");

        destroy(&mut handle);
        assert!(handle.is_none());
        destroy(&mut handle);
        assert!(handle.is_none());
    }

    #[test]
    fn test_create_failure_returns_no_handle() {
        assert_eq!(create(10, 7, 0).unwrap_err(), ErrorKind::InvalidGeometry);
        assert_eq!(create(10, 16, 4).unwrap_err(), ErrorKind::InvalidGeometry);
    }

    #[test]
    fn test_null_handle_operations_fail() {
        init();
        let mut handle: Handle = None;
        let mut data = [0u8; 4];
        assert_eq!(read(&handle, 0, &mut data).unwrap_err(), ErrorKind::NullDevice);
        assert_eq!(write(&mut handle, 0, &data).unwrap_err(), ErrorKind::NullDevice);
        assert_eq!(erase(&mut handle, 0, 4).unwrap_err(), ErrorKind::NullDevice);
        assert_eq!(erase_all(&mut handle).unwrap_err(), ErrorKind::NullDevice);
        assert_eq!(data, [0u8; 4]);
    }

    #[test]
    fn test_erase_through_handle() {
        let mut handle = create(4, 16, 0).unwrap();
        write(&mut handle, 0, &[0u8; 64]).unwrap();
        erase(&mut handle, 17, 1).unwrap();

        let mut data = [0u8; 64];
        read(&handle, 0, &mut data).unwrap();
        assert!(data[..16].iter().all(|b| *b == 0));
        assert!(data[16..32].iter().all(|b| *b == ERASE_STATE));
        assert!(data[32..].iter().all(|b| *b == 0));

        erase_all(&mut handle).unwrap();
        read(&handle, 0, &mut data).unwrap();
        assert_eq!(data, [ERASE_STATE; 64]);
    }
}
