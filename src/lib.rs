//! `aal` is the architecture abstraction layer for bare-metal ARM targets.
//!
//! It exposes a small, portable set of machine-level operations on top of the CPU family selected
//! at build time:
//!
//!  - [`nop`], [`brk`] and [`wfi`] special instructions;
//!  - [`get_sp`] stack pointer access;
//!  - [`call_host`], the semihosting trap used to request services from an attached debug host;
//!  - the [`Register`] and [`SignedRegister`] machine word types.
//!
//! Every operation compiles down to the family's inline assembly. There is no runtime dispatch.
//!
//! # Features
//!
//!  - `aarch64`: build for the AArch64 family
//!  - `cortexa`: build for the Cortex-A family (ARMv8-A AArch64 state, ARMv7-A ARM or Thumb)
//!  - `std` (default): link the standard library; without a family feature, use a simulated
//!    backend driven by a [`host::Monitor`], for testing upper layers on a development machine
//!
//! Targets must disable the default features and enable exactly one family.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![deny(missing_debug_implementations)]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(all(feature = "aarch64", feature = "cortexa"))]
compile_error!("Features \"aarch64\" and \"cortexa\" are mutually exclusive.");

#[cfg(all(feature = "aarch64", not(aal_variant = "aarch64")))]
compile_error!("Unsupported architecture: the \"aarch64\" family requires an AArch64 target.");

#[cfg(all(
    feature = "cortexa",
    not(any(
        aal_variant = "cortexa-a64",
        aal_variant = "cortexa-a32",
        aal_variant = "cortexa-t32"
    ))
))]
compile_error!(
    "Unsupported architecture: the \"cortexa\" family requires an ARMv8-A (AArch64) \
     or ARMv7-A (ARM or Thumb) target."
);

#[cfg(not(any(feature = "aarch64", feature = "cortexa", feature = "std", test)))]
compile_error!("No architecture family selected: enable the \"aarch64\" or \"cortexa\" feature.");

mod arch;

#[cfg(all(
    not(any(feature = "aarch64", feature = "cortexa")),
    any(test, feature = "std")
))]
pub mod host;
mod instructions;
mod registers;
mod semihosting;
// Also compiled into the build script, which uses the parts the library does not.
#[allow(dead_code)]
mod target;
mod types;

pub use instructions::{brk, nop, wfi};
pub use registers::get_sp;
pub use semihosting::{call_host, SemihostingParamBlock, SemihostingResponse};
pub use types::{Register, SignedRegister};
