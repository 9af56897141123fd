//! Process control, clocks and environment queries.

use core::{ffi::CStr, mem, time::Duration};

use aal::{Register, SignedRegister};

use crate::{call, call_direct, check, Error, Operation, Result};

/// `ADP_Stopped_ApplicationExit`: the application finished.
pub const ADP_STOPPED_APPLICATION_EXIT: Register = 0x20026;

/// `ADP_Stopped_RunTimeErrorUnknown`: the application stopped on an unspecified error.
pub const ADP_STOPPED_RUN_TIME_ERROR_UNKNOWN: Register = 0x20023;

const WIDE_REGISTERS: bool = mem::size_of::<Register>() == 8;

/// Asks the host to terminate the application with exit status `code`.
///
/// If the host ignores the request, the core idles forever.
pub fn exit(code: i32) -> ! {
    report_stop(ADP_STOPPED_APPLICATION_EXIT, code);
    halt()
}

/// Asks the host to terminate the application abnormally.
pub fn abort() -> ! {
    report_stop(ADP_STOPPED_RUN_TIME_ERROR_UNKNOWN, 1);
    halt()
}

fn report_stop(reason: Register, subcode: i32) {
    StopRequest::new(reason, subcode, WIDE_REGISTERS).issue();
}

/// Wire form of a stop report, which depends on the register width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopRequest {
    /// `SYS_EXIT` with the reason in place of the block pointer. The status is lost.
    Immediate(Register),
    /// `op` with a `[reason, status]` parameter block.
    Block(Operation, [Register; 2]),
}

impl StopRequest {
    fn new(reason: Register, subcode: i32, wide: bool) -> Self {
        let status = subcode as SignedRegister as Register;

        if wide {
            StopRequest::Block(Operation::Exit, [reason, status])
        } else if subcode == 0 {
            StopRequest::Immediate(reason)
        } else {
            StopRequest::Block(Operation::ExitExtended, [reason, status])
        }
    }

    fn issue(self) {
        // SAFETY: the parameter block only carries integers
        unsafe {
            match self {
                StopRequest::Immediate(reason) => call_direct(Operation::Exit, reason),
                StopRequest::Block(op, mut block) => call(op, &mut block),
            };
        }
    }
}

fn halt() -> ! {
    loop {
        aal::wfi();
    }
}

/// Returns the processor time used since execution started, in centisecond resolution.
pub fn clock() -> Result<Duration> {
    // SAFETY: no pointers are involved
    let r = unsafe { host_call!(Operation::Clock) };
    check(r).map(|cs| Duration::from_millis(cs as u64 * 10))
}

/// Returns the number of seconds since 00:00 January 1, 1970.
pub fn time() -> Result<u64> {
    // SAFETY: no pointers are involved
    let r = unsafe { host_call!(Operation::Time) };
    check(r).map(|s| s as u64)
}

/// Returns the number of target ticks since execution started.
pub fn elapsed() -> Result<u64> {
    let mut block: [Register; 2] = [0; 2];

    // SAFETY: the host fills the 64-bit tick count into `block`
    let r = unsafe { call(Operation::Elapsed, &mut block) };
    if r != 0 {
        return Err(Error::last());
    }

    if WIDE_REGISTERS {
        Ok(block[0] as u64)
    } else {
        Ok((block[0] as u64) | ((block[1] as u64) << 32))
    }
}

/// Returns the frequency of the ticks counted by [`elapsed`], in Hz.
pub fn tickfreq() -> Result<u64> {
    // SAFETY: no pointers are involved
    let r = unsafe { host_call!(Operation::TickFreq) };
    check(r).map(|f| f as u64)
}

/// Returns the host's C library `errno` for the last semihosting call.
pub fn errno() -> i32 {
    // SAFETY: no pointers are involved
    let r = unsafe { host_call!(Operation::Errno) };
    r as i32
}

/// Copies the command line the application was started with into `buf`.
///
/// `buf` must have room for the terminating NUL the host writes.
pub fn command_line(buf: &mut [u8]) -> Result<&str> {
    let mut block = [buf.as_mut_ptr() as Register, buf.len() as Register];

    // SAFETY: `buf` is valid for `buf.len()` bytes of writes
    let r = unsafe { call(Operation::GetCmdline, &mut block) };
    if r != 0 {
        return Err(Error::last());
    }

    let len = block[1] as usize;
    let bytes = buf.get(..len).ok_or(Error::InvalidData)?;
    core::str::from_utf8(bytes).map_err(|_| Error::InvalidData)
}

/// Heap and stack placement reported by the host. Zero fields are unknown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeapInfo {
    /// Lowest address of the heap.
    pub heap_base: Register,
    /// Highest address of the heap.
    pub heap_limit: Register,
    /// Initial stack pointer.
    pub stack_base: Register,
    /// Lowest address of the stack.
    pub stack_limit: Register,
}

/// Queries where the host placed the heap and the stack.
pub fn heap_info() -> Result<HeapInfo> {
    let mut info: [Register; 4] = [0; 4];
    let mut block = [info.as_mut_ptr() as Register];

    // SAFETY: the host writes four words through the pointer in `block`
    let r = unsafe { call(Operation::HeapInfo, &mut block) };
    check(r)?;

    let [heap_base, heap_limit, stack_base, stack_limit] = info;
    Ok(HeapInfo {
        heap_base,
        heap_limit,
        stack_base,
        stack_limit,
    })
}

/// Runs `cmd` in the host's shell, returning its exit status.
pub fn system(cmd: &CStr) -> Result<i32> {
    let len = cmd.to_bytes().len();
    // SAFETY: `cmd` is NUL-terminated and outlives the call
    let r = unsafe { host_call!(Operation::System, cmd.as_ptr(), len) };
    check(r).map(|status| status as i32)
}
