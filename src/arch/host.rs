//! Simulated backend, driven by the [`Monitor`](crate::host::Monitor) attached to the thread.

use crate::host::{record, with_monitor};

/// Host machine word.
pub type Register = usize;

/// Signed host machine word.
pub type SignedRegister = isize;

/// Simulates a `nop`.
#[inline(always)]
pub fn nop() {
    record(|t| t.nops += 1);
}

/// Simulates a breakpoint trap.
///
/// # Panics
///
/// Panics if no monitor is attached, the way a real core faults on an unhandled debug trap.
pub fn bkpt() {
    record(|t| t.breakpoints += 1);

    if with_monitor(|m| m.breakpoint()).is_none() {
        panic!("breakpoint trap with no debugger attached");
    }
}

/// Simulates waiting for an interrupt.
pub fn wfi() {
    record(|t| t.waits += 1);

    if with_monitor(|m| m.wait_for_interrupt()).is_none() {
        std::thread::yield_now();
    }
}

/// Returns the address of a slot in the caller's stack frame.
#[inline(always)]
pub fn get_msp() -> Register {
    let slot = 0u8;
    core::hint::black_box(&slot) as *const u8 as Register
}

/// Forwards a semihosting request to the attached monitor.
///
/// Returns `-1` if there is none.
///
/// # Safety
///
/// `block` must be valid for the accesses the monitor performs for `reason`.
pub unsafe fn call_host(reason: u32, block: *mut Register) -> SignedRegister {
    record(|t| t.host_calls += 1);

    with_monitor(|m| m.call_host(reason, block)).unwrap_or(-1)
}
