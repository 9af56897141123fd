//! Portable access to CPU registers.

use crate::{arch, Register};

/// Reads the current value of the stack pointer.
///
/// The value is sampled at the call site and has no persistence. This is a plain function so
/// upper layers can take its address (`let f: fn() -> Register = aal::get_sp;`) before the
/// family implementation is inlined into it.
///
/// There is intentionally no setter: moving the live stack pointer from portable code requires a
/// calling convention contract this layer does not define.
#[inline(always)]
pub fn get_sp() -> Register {
    arch::get_msp()
}
