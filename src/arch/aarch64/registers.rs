//! Access to AArch64 registers.

use core::arch::asm;

use super::Register;

/// Reads the stack pointer of the current exception level.
#[inline(always)]
pub fn get_msp() -> Register {
    let value: Register;
    // SAFETY: reading `sp` has no side effects
    unsafe {
        asm!("mov {}, sp", out(reg) value, options(nomem, nostack, preserves_flags));
    }
    value
}
