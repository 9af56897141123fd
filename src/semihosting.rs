//! Semihosting host-call primitive.
//!
//! Semihosting lets code running on the target request services (console and file I/O, clock,
//! exit) from the host machine through an attached debugger. The request is a trap instruction
//! carrying a magic immediate that only a debug host recognizes: the reason code goes in the
//! first argument register, a pointer to a parameter block in the second, and the response is
//! read back from the first return register.
//!
//! The operation numbers and parameter block layouts belong to the semihosting protocol, not to
//! this layer, which only carries them. What is owned here is the trap encoding, which differs
//! per variant: a single table below expands into both the encoding descriptors and the `asm!`
//! block of the variant being built.

use bitflags::bitflags;

use crate::{arch, target::Variant, Register, SignedRegister};

/// Type of each entry in a parameter block.
pub type SemihostingParamBlock = Register;

/// Type of a host call result.
///
/// The sign carries the success/error convention of the protocol (negative values are errors for
/// most operations), so it is signed on every family.
pub type SemihostingResponse = SignedRegister;

bitflags! {
    /// Machine state a semihosting trap may modify, as declared to the compiler.
    pub(crate) struct Clobbers: u32 {
        /// General purpose register 0 (`x0` / `r0`).
        const GPR0 = 1 << 0;
        /// General purpose register 1 (`x1` / `r1`).
        const GPR1 = 1 << 1;
        /// General purpose register 2 (`x2` / `r2`).
        const GPR2 = 1 << 2;
        /// General purpose register 3 (`x3` / `r3`).
        const GPR3 = 1 << 3;
        /// Intra-procedure-call scratch register of AArch32 (`r12` / `ip`).
        const GPR12 = 1 << 12;
        /// Second intra-procedure-call scratch register of AArch64 (`x17`).
        const GPR17 = 1 << 17;
        /// Link register (`x30` / `lr`).
        const LINK = 1 << 29;
        /// Condition flags.
        const FLAGS = 1 << 30;
        /// Arbitrary memory, reachable through the parameter block.
        const MEMORY = 1 << 31;
    }
}

/// Trap instruction used to signal a semihosting request.
// Only the unit tests read `mnemonic` and `clobbers`; the trap itself is expanded from the same
// table row.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TrapEncoding {
    /// Mnemonic of the trap instruction.
    pub(crate) mnemonic: &'static str,
    /// Immediate operand identifying the trap as a semihosting request.
    pub(crate) magic: u32,
    /// State the trap may modify.
    pub(crate) clobbers: Clobbers,
}

/// Expands the trap table into [`TrapEncoding::of`] and into the `trap` function of the variant
/// being built.
///
/// Each row names the variant, its `aal_variant` cfg value, the trap mnemonic and magic, the two
/// argument registers and the scratch registers the host may clobber. Every listed register
/// becomes both an `asm!` operand and a [`Clobbers`] flag. The `asm!` block declares no options,
/// so flags and memory are clobbered on every row.
macro_rules! trap_table {
    ($(
        $variant:ident if $cfg:tt => $mnemonic:tt $magic:tt,
            ($arg0:tt: $flag0:ident, $arg1:tt: $flag1:ident)
            clobbers [$($reg:tt: $flag:ident),* $(,)?];
    )*) => {
        impl TrapEncoding {
            /// Returns the trap encoding of `variant`.
            pub(crate) const fn of(variant: Variant) -> Self {
                match variant {
                    $(Variant::$variant => TrapEncoding {
                        mnemonic: $mnemonic,
                        magic: $magic,
                        clobbers: Clobbers::from_bits_truncate(
                            Clobbers::$flag0.bits()
                                | Clobbers::$flag1.bits()
                                $(| Clobbers::$flag.bits())*
                                | Clobbers::FLAGS.bits()
                                | Clobbers::MEMORY.bits(),
                        ),
                    },)*
                }
            }
        }

        $(
            /// Issues a semihosting request with the trap of this build's variant.
            ///
            /// The reason is zero-extended into the first argument register, the block pointer
            /// goes in the second and the response comes back in the first.
            ///
            /// # Safety
            ///
            /// `block` must be valid for the accesses the host performs for `reason`.
            #[cfg(aal_variant = $cfg)]
            #[inline(always)]
            pub(crate) unsafe fn trap(reason: u32, block: *mut Register) -> SignedRegister {
                let mut response = Register::from(reason);

                // SAFETY: the caller guarantees `block` is valid for `reason`
                unsafe {
                    core::arch::asm!(
                        concat!($mnemonic, " #{magic}"),
                        magic = const TrapEncoding::of(Variant::$variant).magic,
                        inout($arg0) response,
                        inout($arg1) block => _,
                        $(out($reg) _,)*
                    );
                }

                response as SignedRegister
            }
        )*
    };
}

trap_table! {
    Aarch64 if "aarch64" => "hlt" 0xF000,
        ("x0": GPR0, "x1": GPR1) clobbers ["x2": GPR2, "x3": GPR3, "x17": GPR17, "x30": LINK];
    CortexA64 if "cortexa-a64" => "hlt" 0xF000,
        ("x0": GPR0, "x1": GPR1) clobbers ["x2": GPR2, "x3": GPR3, "x17": GPR17, "x30": LINK];
    CortexA32 if "cortexa-a32" => "svc" 0x12_3456,
        ("r0": GPR0, "r1": GPR1) clobbers ["r2": GPR2, "r3": GPR3, "r12": GPR12, "lr": LINK];
    CortexT32 if "cortexa-t32" => "svc" 0xAB,
        ("r0": GPR0, "r1": GPR1) clobbers ["r2": GPR2, "r3": GPR3, "r12": GPR12, "lr": LINK];
}

/// Requests a service from the debug host.
///
/// `reason` selects the operation and `block` points to its parameter block; both are defined by
/// the semihosting protocol. Some operations take an immediate value instead of a pointer in
/// `block`, in which case it is passed through unchanged.
///
/// The call acts as a full compiler memory barrier: the host may read and write any target memory
/// reachable through `block`.
///
/// If no debugger or semihosting server is attached, the trap is not handled and this call does
/// not return meaningfully.
///
/// # Safety
///
/// `block` must be valid for the accesses the host performs for `reason`, including every pointer
/// stored inside the block.
#[inline(always)]
pub unsafe fn call_host(reason: u32, block: *mut SemihostingParamBlock) -> SemihostingResponse {
    // SAFETY: the caller upholds the parameter block contract of `reason`
    unsafe { arch::call_host(reason, block) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a64_encoding() {
        let hlt = TrapEncoding::of(Variant::Aarch64);
        assert_eq!(hlt.mnemonic, "hlt");
        assert_eq!(hlt.magic, 0xF000);
        assert_eq!(
            hlt.clobbers,
            Clobbers::GPR0
                | Clobbers::GPR1
                | Clobbers::GPR2
                | Clobbers::GPR3
                | Clobbers::GPR17
                | Clobbers::LINK
                | Clobbers::FLAGS
                | Clobbers::MEMORY
        );

        // Cortex-A in the AArch64 state uses the very same trap
        assert_eq!(TrapEncoding::of(Variant::CortexA64), hlt);
    }

    #[test]
    fn aarch32_encodings() {
        let arm = TrapEncoding::of(Variant::CortexA32);
        let thumb = TrapEncoding::of(Variant::CortexT32);

        assert_eq!(arm.mnemonic, "svc");
        assert_eq!(thumb.mnemonic, "svc");
        assert_eq!(arm.magic, 0x12_3456);
        assert_eq!(thumb.magic, 0xAB);

        // Thumb `svc` only has an 8-bit immediate, ARM `svc` a 24-bit one
        assert!(thumb.magic <= 0xFF);
        assert!(arm.magic <= 0xFF_FFFF);

        assert_eq!(arm.clobbers, thumb.clobbers);
        assert!(arm.clobbers.contains(Clobbers::GPR12));
        assert!(!arm.clobbers.contains(Clobbers::GPR17));
    }

    #[test]
    fn every_variant_is_a_barrier() {
        let required = Clobbers::GPR0 | Clobbers::GPR1 | Clobbers::LINK | Clobbers::FLAGS;

        for variant in &Variant::ALL {
            let encoding = TrapEncoding::of(*variant);
            assert!(encoding.clobbers.contains(required), "{:?}", variant);
            assert!(encoding.clobbers.contains(Clobbers::MEMORY), "{:?}", variant);
        }
    }

    #[test]
    fn aarch64_rows_agree() {
        assert_eq!(
            TrapEncoding::of(Variant::Aarch64),
            TrapEncoding::of(Variant::CortexA64)
        );
    }
}
