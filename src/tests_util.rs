use crate::BlockDevice;

pub(crate) fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn make_device(block_count: usize, block_size: usize, start: usize) -> BlockDevice {
    BlockDevice::new(block_count, block_size, start).unwrap()
}
