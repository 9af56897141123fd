//! Portable special instructions.
//!
//! Each function forwards to the implementation of the family selected at build time and ends up
//! as a single inline instruction. Inline assembly blocks are volatile, so none of these calls can
//! be elided, merged or hoisted by the optimizer.

use crate::arch;

/// Executes the `nop` instruction, which performs no operation (ie. does nothing).
///
/// Exactly one instruction is retired and no register or flag is modified, which makes this
/// suitable for timing pads.
#[inline(always)]
pub fn nop() {
    arch::nop()
}

/// Executes the architecture's breakpoint instruction.
///
/// With a debugger attached, execution stops at the call site until the debugger resumes it.
/// Without one, the core takes a debug exception it has no handler for: in an untethered build
/// this call does not return. Only call it in configurations known to run under a debugger.
#[inline(always)]
pub fn brk() {
    arch::bkpt()
}

/// Halts the core until the next interrupt (or wake-up event) arrives.
///
/// Wake-up conditions are owned by the interrupt controller. There is no way to abort a pending
/// wait other than an interrupt, after which execution resumes at the next instruction.
#[inline(always)]
pub fn wfi() {
    arch::wfi()
}
