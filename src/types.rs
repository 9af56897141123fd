//! Portable machine word types.
//!
//! The width of these types always matches the general purpose register width of the active
//! family: 64 bits for AArch64 and Cortex-A in the AArch64 state, 32 bits for Cortex-A in the
//! AArch32 state.

/// Unsigned machine word, as wide as a general purpose register.
pub type Register = crate::arch::Register;

/// Signed machine word, used for values that may be negative (e.g. host call results).
pub type SignedRegister = crate::arch::SignedRegister;

const _: () = assert!(core::mem::size_of::<Register>() == core::mem::size_of::<SignedRegister>());
