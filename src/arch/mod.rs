//! Architecture families.
//!
//! Exactly one family module is compiled in, selected by the `aal_variant` cfg the build script
//! derives from the enabled family feature and the target. Its contents are re-exported here
//! under family-neutral names; the portable modules of the crate only ever go through these.

#[cfg(aal_variant = "aarch64")]
mod aarch64;
#[cfg(aal_variant = "aarch64")]
pub use self::aarch64::*;

#[cfg(any(
    aal_variant = "cortexa-a64",
    aal_variant = "cortexa-a32",
    aal_variant = "cortexa-t32"
))]
mod cortexa;
#[cfg(any(
    aal_variant = "cortexa-a64",
    aal_variant = "cortexa-a32",
    aal_variant = "cortexa-t32"
))]
pub use self::cortexa::*;

/// Simulated backend for hosts without an ARM target.
#[cfg(all(
    not(any(feature = "aarch64", feature = "cortexa")),
    any(test, feature = "std")
))]
mod host;
#[cfg(all(
    not(any(feature = "aarch64", feature = "cortexa")),
    any(test, feature = "std")
))]
pub use self::host::*;
