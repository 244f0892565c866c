//! This module is the Foreign Function Interface layer of the binding.
//!
//! It handles both directions of the "impedance mismatch": `abi` and
//! `library` bind the native `libkustomer` C API into Rust, and `python`
//! exposes the safe bridge to the CPython ecosystem.

//==================================================================================
// 1. Module Declarations
//==================================================================================
/// The native library's raw C ABI: return structs and symbol signatures.
pub mod abi;
/// Runtime loading and eager symbol resolution of the native artifact.
pub mod library;
/// Contains all logic for interfacing with the Python/CPython ecosystem.
pub mod python;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
// This section defines the public API of the FFI layer that the main
// `lib.rs` uses to construct the final Python module.
pub use self::python::{
    begin_ensure, build_date, dump_claims, end_ensure, err_numeric_text, initialize,
    instant_ensure, set_autorefresh, set_logger, uninitialize, version, wait_until_ready,
    PyKopanoProductClaims,
};
