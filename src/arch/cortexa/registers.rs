//! Access to Cortex-A registers.

use core::arch::asm;

use super::Register;

/// Reads the stack pointer of the current mode.
///
/// `mov <reg>, sp` assembles in the A64, A32 and T32 encodings alike; only the operand width
/// differs, and that follows [`Register`].
#[inline(always)]
pub fn get_msp() -> Register {
    let value: Register;
    // SAFETY: reading `sp` has no side effects
    unsafe {
        asm!("mov {}, sp", out(reg) value, options(nomem, nostack, preserves_flags));
    }
    value
}
