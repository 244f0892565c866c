// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the sole safe API over the native library. It owns no
// license logic; its entire responsibility is marshaling arguments and
// results across the native boundary and translating status words into
// errors. It is the authoritative boundary between host callers (Python or
// Rust) and the opaque `libkustomer` artifact.
//
// Call Flow:
//
//   1. [Host surface (ffi::python / rlib consumers)]
//         |
//         `-> argument validation happens here or in `utils` marshaling ->
//
//   2. [Bridge (session / ensure)] -> takes the library call guard,
//         |                           crosses the boundary exactly once
//         `-> [ffi::library symbol table] -> native call
//
//   3. Status word + payload flow back; `error::check_status` turns nonzero
//      words into `KustomerError::Native`, native-owned strings are consumed
//      by `utils::take_native_string`, dumps are decoded by `claims`.
//
// ====================================================================================
pub mod claims;
pub mod ensure;
pub mod session;

// --- High-Level API Re-exports ---
pub use claims::{ProductClaims, ProductEntry};
pub use ensure::{EnsureTransaction, Operator};
