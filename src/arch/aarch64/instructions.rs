//! Special AArch64 instructions.

use core::arch::asm;

/// Executes the `nop` instruction, which performs no operation (ie. does nothing).
#[inline(always)]
pub fn nop() {
    // SAFETY: `nop` has no side effects
    unsafe {
        asm!("nop", options(nomem, nostack, preserves_flags));
    }
}

/// Raises a software breakpoint exception.
///
/// Same encoding GDB uses for its own breakpoints (`0xd4200000`). The debugger has to step the
/// PC over it to resume.
#[inline(always)]
pub fn bkpt() {
    // SAFETY: traps into the attached debugger, which may inspect and modify memory
    unsafe {
        asm!("brk #0", options(nostack));
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
