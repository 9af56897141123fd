//! Cortex-A architecture family.
//!
//! Covers ARMv8-A cores in the AArch64 execution state and ARMv7-A cores in the AArch32 state,
//! the latter compiled either to the ARM or to the Thumb encoding. The sub-variant is fixed at
//! build time by the `aal_variant` cfg; unknown ones never reach this module.

mod instructions;
mod registers;
mod types;

pub use self::instructions::{bkpt, nop, wfi};
pub use self::registers::get_msp;
pub(crate) use crate::semihosting::trap as call_host;
pub use self::types::{Register, SignedRegister};
