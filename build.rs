use std::env;

#[allow(dead_code)]
#[path = "src/target.rs"]
mod target;

use target::{Family, Target, Variant};

fn main() {
    let values = Variant::ALL
        .iter()
        .map(|v| format!("\"{}\"", v.cfg_value()))
        .collect::<Vec<_>>()
        .join(", ");
    println!("cargo:rustc-check-cfg=cfg(aal_variant, values({}))", values);

    let family = match (
        env::var_os("CARGO_FEATURE_AARCH64").is_some(),
        env::var_os("CARGO_FEATURE_CORTEXA").is_some(),
    ) {
        (true, false) => Some(Family::Aarch64),
        (false, true) => Some(Family::CortexA),
        // Both or neither: the library reports the misconfiguration itself
        _ => None,
    };

    if let Some(family) = family {
        let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap();
        let triple = env::var("TARGET").unwrap();
        let features = env::var("CARGO_CFG_TARGET_FEATURE").ok();
        let target = Target::detect(&arch, &triple, features.as_deref());

        if let Some(variant) = Variant::resolve(family, &target) {
            println!("cargo:rustc-cfg=aal_variant=\"{}\"", variant.cfg_value());
        }
    }

    println!("cargo:rerun-if-changed=src/target.rs");
    println!("cargo:rerun-if-changed=build.rs");
}
