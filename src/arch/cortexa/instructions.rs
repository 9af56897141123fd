//! Special Cortex-A instructions.

use core::arch::asm;

/// Executes the `nop` instruction, which performs no operation (ie. does nothing).
#[inline(always)]
pub fn nop() {
    // SAFETY: `nop` has no side effects
    unsafe {
        asm!("nop", options(nomem, nostack, preserves_flags));
    }
}

/// Raises a software breakpoint exception (`brk #0` on ARMv8-A, `bkpt #0` on ARMv7-A).
#[inline(always)]
pub fn bkpt() {
    // SAFETY: traps into the attached debugger, which may inspect and modify memory
    #[cfg(aal_variant = "cortexa-a64")]
    unsafe {
        asm!("brk #0", options(nostack));
    }

    // SAFETY: traps into the attached debugger, which may inspect and modify memory
    #[cfg(any(aal_variant = "cortexa-a32", aal_variant = "cortexa-t32"))]
    unsafe {
        asm!("bkpt #0", options(nostack));
    }
}

/// Halts the core until the next interrupt arrives.
#[inline(always)]
pub fn wfi() {
    // SAFETY: `wfi` has no side effects
    unsafe {
        asm!("wfi", options(nomem, nostack, preserves_flags));
    }
}
