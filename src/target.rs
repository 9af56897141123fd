//! Classification of the compilation target into the variants this crate supports.
//!
//! This module is shared with the build script, which uses it to emit the `aal_variant` cfg the
//! rest of the crate is keyed on. It must therefore stay free of dependencies and of any
//! `aal_variant`-dependent code.

/// Architecture family selected by the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// 64-bit ARMv8-A cores running in the AArch64 execution state.
    Aarch64,
    /// ARM application-class cores, either 64-bit ARMv8-A or 32-bit ARMv7-A.
    CortexA,
}

/// Version of the ARM architecture profile implemented by the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchVersion {
    /// ARMv7-A.
    V7A,
    /// ARMv8-A.
    V8A,
}

/// Instruction encoding the code is compiled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Isa {
    /// A64, the AArch64 instruction set.
    A64,
    /// A32, the classic 32-bit ARM encoding.
    A32,
    /// T32, the compact Thumb-2 encoding.
    T32,
}

/// What could be learned about the compilation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    /// Architecture profile, if it is one this crate knows about.
    pub version: Option<ArchVersion>,
    /// Instruction encoding, if the target is an ARM one.
    pub isa: Option<Isa>,
}

impl Target {
    /// Classifies a target given its `target_arch`, its full triple (e.g. `armv7a-none-eabi`) and
    /// the comma-separated list of enabled target features, if known.
    ///
    /// On ARM the Thumb encoding is active exactly when the `thumb-mode` feature is, whatever the
    /// triple says (`-C target-feature=+thumb-mode` on an `armv7a` triple builds Thumb code). The
    /// `thumb` triple prefix is only used when no feature list is available.
    pub fn detect(target_arch: &str, triple: &str, target_features: Option<&str>) -> Self {
        let arch = triple.split('-').next().unwrap_or("");

        match target_arch {
            "aarch64" => Self {
                version: Some(ArchVersion::V8A),
                isa: Some(Isa::A64),
            },
            "arm" => {
                let thumb = match target_features {
                    Some(features) => features.split(',').any(|f| f.trim() == "thumb-mode"),
                    None => arch.starts_with("thumb"),
                };
                let isa = if thumb { Isa::T32 } else { Isa::A32 };
                let version = if is_armv7a(arch) {
                    Some(ArchVersion::V7A)
                } else {
                    None
                };
                Self {
                    version,
                    isa: Some(isa),
                }
            }
            _ => Self {
                version: None,
                isa: None,
            },
        }
    }
}

/// Returns true if the architecture component of a triple names an ARMv7-A core.
///
/// `armv7` without a profile letter is the A profile (`armv7-unknown-linux-gnueabihf`), as is
/// `thumbv7neon`. The R and M profiles (`armv7r`, `thumbv7m`, `thumbv7em`) are not.
fn is_armv7a(arch: &str) -> bool {
    let sub = arch
        .strip_prefix("thumb")
        .or_else(|| arch.strip_prefix("arm"))
        .unwrap_or("");

    matches!(sub, "v7" | "v7neon") || sub.starts_with("v7a")
}

/// A supported (family, architecture, encoding) combination.
///
/// Every variant maps to exactly one instruction encoding matrix. Combinations not listed here
/// do not compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// AArch64 family.
    Aarch64,
    /// Cortex-A family, ARMv8-A in the AArch64 execution state.
    CortexA64,
    /// Cortex-A family, ARMv7-A compiled to the ARM encoding.
    CortexA32,
    /// Cortex-A family, ARMv7-A compiled to the Thumb encoding.
    CortexT32,
}

impl Variant {
    /// All supported variants.
    pub const ALL: [Variant; 4] = [
        Variant::Aarch64,
        Variant::CortexA64,
        Variant::CortexA32,
        Variant::CortexT32,
    ];

    /// Resolves the variant to build for `family` on `target`.
    ///
    /// Returns `None` for every unsupported combination; there is no fallback.
    pub fn resolve(family: Family, target: &Target) -> Option<Self> {
        match (family, target.version, target.isa) {
            (Family::Aarch64, Some(ArchVersion::V8A), Some(Isa::A64)) => Some(Variant::Aarch64),
            (Family::CortexA, Some(ArchVersion::V8A), Some(Isa::A64)) => Some(Variant::CortexA64),
            (Family::CortexA, Some(ArchVersion::V7A), Some(Isa::A32)) => Some(Variant::CortexA32),
            (Family::CortexA, Some(ArchVersion::V7A), Some(Isa::T32)) => Some(Variant::CortexT32),
            _ => None,
        }
    }

    /// The family this variant belongs to.
    pub const fn family(self) -> Family {
        match self {
            Variant::Aarch64 => Family::Aarch64,
            Variant::CortexA64 | Variant::CortexA32 | Variant::CortexT32 => Family::CortexA,
        }
    }

    /// The instruction encoding of this variant.
    pub const fn isa(self) -> Isa {
        match self {
            Variant::Aarch64 | Variant::CortexA64 => Isa::A64,
            Variant::CortexA32 => Isa::A32,
            Variant::CortexT32 => Isa::T32,
        }
    }

    /// Width of a general purpose register, in bits.
    pub const fn register_bits(self) -> u32 {
        match self.isa() {
            Isa::A64 => 64,
            Isa::A32 | Isa::T32 => 32,
        }
    }

    /// Value of the `aal_variant` cfg emitted by the build script for this variant.
    pub const fn cfg_value(self) -> &'static str {
        match self {
            Variant::Aarch64 => "aarch64",
            Variant::CortexA64 => "cortexa-a64",
            Variant::CortexA32 => "cortexa-a32",
            Variant::CortexT32 => "cortexa-t32",
        }
    }
}
