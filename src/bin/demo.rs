use blockemu::dump::hex_dump;
use blockemu::{handle, BlockDevice, ErrorKind};
use log::{error, info, LevelFilter};
use structopt::StructOpt;

const FIRST: &[u8] = b"ABCDEFGHIJKLMNOP";
const SECOND: &[u8] = b"QRSTUVWXYZ012345";
const YZY: &[u8] = b"YZYZYZYZYZYZYZYZ";
const ZYZ: &[u8] = b"ZYZYZYZYZYZYZYZY";

#[derive(StructOpt)]
#[structopt(about = "Run a fixed write and erase script against an emulated block device")]
struct Opt {
    /// Number of blocks in the device.
    #[structopt(long, default_value = "10")]
    blocks: usize,
    /// Bytes per block.
    #[structopt(long, default_value = "16")]
    block_size: usize,
    /// First virtual address of the device.
    #[structopt(long, default_value = "0")]
    start_address: usize,
    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

fn print_all(step: &str, device: &BlockDevice) {
    let mut out = String::new();
    if hex_dump(device, &mut out).is_ok() {
        println!("{} (crc 0x{:08x})\n{}", step, device.checksum(), out);
    }
}

fn run(device: &mut BlockDevice) -> Result<(), ErrorKind> {
    let base = device.start_address();
    let block_size = device.block_size();
    let block = |n: usize| base + n * block_size;
    let (b0, b1, b2, b3, b4, b5) = (block(0), block(1), block(2), block(3), block(4), block(5));

    print_all("created", device);

    device.write(b0, FIRST)?;
    print_all("write first to block 0", device);
    device.write(b1, SECOND)?;
    print_all("write second to block 1", device);
    device.write(b2, YZY)?;
    print_all("write yzy to block 2", device);
    device.write(b3, ZYZ)?;
    print_all("write zyz to block 3", device);

    device.write(b4, FIRST)?;
    device.write(b4, SECOND)?;
    print_all("write first then second to block 4", device);

    device.write(b5, YZY)?;
    device.write(b5, ZYZ)?;
    print_all("write yzy then zyz to block 5", device);

    device.erase(b0, 2)?;
    print_all("erase 2 bytes at block 0", device);

    device.erase(base + 30, 5)?;
    print_all("erase 5 bytes at offset 30", device);

    Ok(())
}

fn main() {
    let opt = Opt::from_args();
    env_logger::builder()
        .format_timestamp_nanos()
        .filter_level(opt.log_level)
        .init();

    let mut device = match handle::create(opt.blocks, opt.block_size, opt.start_address) {
        Ok(device) => device,
        Err(e) => {
            error!("Failed to create block device: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(dev) = device.as_mut() {
        if let Err(e) = run(dev) {
            error!("Demo script failed: {}", e);
            handle::destroy(&mut device);
            std::process::exit(1);
        }
    }

    handle::destroy(&mut device);
    info!("Block device released.");
}
