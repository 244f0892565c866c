//! Build script for the pykustomer binding.
//!
//! The native `libkustomer` artifact is resolved at runtime when the module
//! is first used, so no compile-time linking happens here. This script only
//! carries the build contract: a header search path, a library search path,
//! and a library name, each overridable through the environment and
//! defaulting to the fixed project layout the native build installs into.

use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_INCLUDE_DIR: &str = "../.libs/include/kustomer";
const DEFAULT_LIB_DIR: &str = "../.libs";
const DEFAULT_LIB_NAME: &str = "kustomer";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=KUSTOMER_INCLUDE_DIR");
    println!("cargo:rerun-if-env-changed=KUSTOMER_LIB_DIR");
    println!("cargo:rerun-if-env-changed=KUSTOMER_LIB_NAME");

    let manifest_dir = PathBuf::from(
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is always set by cargo"),
    );

    let include_dir = resolve_dir(&manifest_dir, "KUSTOMER_INCLUDE_DIR", DEFAULT_INCLUDE_DIR);
    let lib_dir = resolve_dir(&manifest_dir, "KUSTOMER_LIB_DIR", DEFAULT_LIB_DIR);
    let lib_name = env::var("KUSTOMER_LIB_NAME").unwrap_or_else(|_| DEFAULT_LIB_NAME.to_string());

    if lib_name.is_empty() {
        panic!("KUSTOMER_LIB_NAME must not be empty");
    }

    // Bake the resolved contract into the crate so the runtime loader and the
    // diagnostics agree with the build configuration.
    println!(
        "cargo:rustc-env=KUSTOMER_DEFAULT_INCLUDE_DIR={}",
        include_dir.display()
    );
    println!(
        "cargo:rustc-env=KUSTOMER_DEFAULT_LIB_DIR={}",
        lib_dir.display()
    );
    println!("cargo:rustc-env=KUSTOMER_DEFAULT_LIB_NAME={}", lib_name);

    // Emit the search path so a statically-wired consumer of this crate can
    // still link against the same artifact the runtime loader would pick up.
    if lib_dir.is_dir() {
        println!("cargo:rustc-link-search=native={}", lib_dir.display());
    }
}

/// Resolves one directory parameter of the build contract.
///
/// An explicit override that points at a nonexistent directory is a
/// configuration error and aborts the build before anything is compiled.
/// The defaults are allowed to be absent: the artifact is a runtime
/// dependency and its absence is reported when the module is loaded.
fn resolve_dir(manifest_dir: &Path, var: &str, default: &str) -> PathBuf {
    match env::var(var) {
        Ok(value) => {
            let path = PathBuf::from(&value);
            if !path.is_dir() {
                panic!(
                    "{} is set to {:?}, which is not an existing directory; \
                     fix the path or unset the variable to use the default ({})",
                    var, value, default
                );
            }
            path
        }
        Err(_) => manifest_dir.join(default),
    }
}
