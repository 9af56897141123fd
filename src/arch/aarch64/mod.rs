//! AArch64 architecture family.
//!
//! Assembles the type, instruction, register and semihosting layers of 64-bit ARMv8-A cores.

mod instructions;
mod registers;
mod types;

pub use self::instructions::{bkpt, nop, wfi};
pub use self::registers::get_msp;
pub(crate) use crate::semihosting::trap as call_host;
pub use self::types::{Register, SignedRegister};
