/// Cortex-A general purpose register.
#[cfg(aal_variant = "cortexa-a64")]
pub type Register = u64;
/// Signed Cortex-A general purpose register.
#[cfg(aal_variant = "cortexa-a64")]
pub type SignedRegister = i64;

/// Cortex-A general purpose register.
#[cfg(any(aal_variant = "cortexa-a32", aal_variant = "cortexa-t32"))]
pub type Register = u32;
/// Signed Cortex-A general purpose register.
#[cfg(any(aal_variant = "cortexa-a32", aal_variant = "cortexa-t32"))]
pub type SignedRegister = i32;

const _: () = assert!(core::mem::size_of::<Register>() == core::mem::size_of::<usize>());
