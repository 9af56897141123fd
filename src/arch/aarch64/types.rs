/// AArch64 general purpose register.
pub type Register = u64;

/// Signed AArch64 general purpose register.
pub type SignedRegister = i64;

const _: () = assert!(core::mem::size_of::<Register>() == core::mem::size_of::<usize>());
