//! Implementation of the ARM semihosting protocol on top of [`aal::call_host`].
//!
//! This crate can be used by code running on a target under a debugger (or QEMU with
//! `-semihosting`) to use the host's console, files, clock and exit status.
//!
//! # Features
//!
//!  - `std` (default): build against the standard library and the simulated `aal` host backend
//!  - `aarch64`, `cortexa`: select the `aal` architecture family

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::missing_safety_doc)]
#![deny(missing_debug_implementations)]
#![deny(unsafe_op_in_unsafe_fn)]

use core::fmt;

use aal::{Register, SemihostingParamBlock, SemihostingResponse};

macro_rules! host_call {
    ($op:expr) => {
        $crate::call_direct($op, 0)
    };
    ($op:expr, $($arg:expr),+ $(,)?) => {
        $crate::call($op, &mut [$($arg as aal::SemihostingParamBlock),+])
    };
}

#[macro_use]
pub mod macros;

pub mod io;
pub mod process;
pub mod testing;

/// Semihosting operation numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Operation {
    /// Open a file or stream on the host.
    Open = 0x01,
    /// Close a host file.
    Close = 0x02,
    /// Write a character to the debug console.
    WriteC = 0x03,
    /// Write a NUL-terminated string to the debug console.
    Write0 = 0x04,
    /// Write to a host file.
    Write = 0x05,
    /// Read from a host file.
    Read = 0x06,
    /// Read a character from the debug console.
    ReadC = 0x07,
    /// Check whether a return code is an error.
    IsError = 0x08,
    /// Check whether a host file is an interactive device.
    IsTty = 0x09,
    /// Seek to an absolute position in a host file.
    Seek = 0x0A,
    /// Length of a host file.
    Flen = 0x0C,
    /// Temporary file name.
    TmpNam = 0x0D,
    /// Delete a host file.
    Remove = 0x0E,
    /// Rename a host file.
    Rename = 0x0F,
    /// Centiseconds since execution started.
    Clock = 0x10,
    /// Seconds since the Unix epoch.
    Time = 0x11,
    /// Run a command on the host.
    System = 0x12,
    /// Value of the host's C `errno` after the last call.
    Errno = 0x13,
    /// Command line the target was started with.
    GetCmdline = 0x15,
    /// Heap and stack placement.
    HeapInfo = 0x16,
    /// Report an exception (including application exit) to the debugger.
    Exit = 0x18,
    /// Report an exception with a subcode on 32-bit targets.
    ExitExtended = 0x20,
    /// Target ticks since execution started.
    Elapsed = 0x30,
    /// Frequency of the [`Operation::Elapsed`] ticks.
    TickFreq = 0x31,
}

impl From<Operation> for u32 {
    fn from(op: Operation) -> Self {
        op as u32
    }
}

/// A failed semihosting operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The host reported a failure, with its `errno` value.
    Host(i32),
    /// The host returned data that is not valid for the request.
    InvalidData,
    /// The host file ended before the buffer could be filled.
    UnexpectedEof,
    /// The host accepted no bytes of a write.
    WriteZero,
}

impl Error {
    /// Builds an error out of the host's current `errno`.
    pub fn last() -> Self {
        Error::Host(process::errno())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Host(errno) => write!(f, "host error (errno {})", errno),
            Error::InvalidData => write!(f, "invalid data"),
            Error::UnexpectedEof => write!(f, "unexpected EOF"),
            Error::WriteZero => write!(f, "write zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type for semihosting operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Issues `op` with a parameter block.
///
/// # Safety
///
/// Every pointer stored in `block` must be valid for the accesses `op` performs.
pub(crate) unsafe fn call(op: Operation, block: &mut [SemihostingParamBlock]) -> SemihostingResponse {
    // SAFETY: `block` is a live parameter block, its contents are the caller's responsibility
    unsafe { aal::call_host(op.into(), block.as_mut_ptr()) }
}

/// Issues `op` with an immediate value in place of the parameter block pointer.
///
/// # Safety
///
/// If `op` interprets `arg` as a pointer, it must be valid for the accesses `op` performs.
pub(crate) unsafe fn call_direct(op: Operation, arg: Register) -> SemihostingResponse {
    // SAFETY: forwarded to the caller
    unsafe { aal::call_host(op.into(), arg as *mut SemihostingParamBlock) }
}

/// Maps a negative response to the host's `errno`.
pub(crate) fn check(response: SemihostingResponse) -> Result<Register> {
    if response < 0 {
        Err(Error::last())
    } else {
        Ok(response as Register)
    }
}
