use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Block size is odd or zero, the start address is not block aligned, or the device size
    /// does not fit the address space.
    InvalidGeometry,
    /// The backing buffer could not be allocated.
    AllocationFailure,
    /// Requested span falls outside of the device address range.
    OutOfRange,
    /// Operation invoked on an absent or destroyed device handle.
    NullDevice,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ErrorKind::InvalidGeometry => "invalid block device geometry",
            ErrorKind::AllocationFailure => "failed to allocate block device buffer",
            ErrorKind::OutOfRange => "address out of range",
            ErrorKind::NullDevice => "no block device",
        };
        f.write_str(msg)
    }
}
