//! This file is the root of the `_pykustomer` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the binding (`bridge`, `ffi`,
//!     etc.) so the Rust compiler knows they exist.
//! 2.  Defining the `#[pymodule]` which acts as the main entry point when the
//!     compiled library is imported into Python.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod bridge;
pub mod config;
pub mod error;

mod ffi;
mod logging;
mod utils;

pub use error::KustomerError;

//==================================================================================
// 2. Python Module Definition
//==================================================================================
use ffi::python::exceptions;
use ffi::PyKopanoProductClaims;
use pyo3::prelude::*;

use crate::bridge::Operator;
use crate::error::{ensure, status};

/// The `_pykustomer` Python module, exposing the native library's functions.
#[pymodule]
fn _pykustomer(py: Python, m: &PyModule) -> PyResult<()> {
    // --- Global session functions ---
    m.add_function(wrap_pyfunction!(ffi::initialize, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::uninitialize, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::wait_until_ready, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::set_autorefresh, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::set_logger, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::version, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::build_date, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::err_numeric_text, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::dump_claims, m)?)?;

    // --- Ensure transactions ---
    m.add_function(wrap_pyfunction!(ffi::begin_ensure, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::instant_ensure, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::end_ensure, m)?)?;
    m.add_class::<PyKopanoProductClaims>()?;

    // --- Expose the custom error type ---
    m.add("Error", py.get_type::<exceptions::Error>())?;

    // --- Operator constants for the comparator checks ---
    m.add("OPERATOR_GREATER_THAN", Operator::GreaterThan.op_code())?;
    m.add(
        "OPERATOR_GREATER_THAN_OR_EQUAL",
        Operator::GreaterThanOrEqual.op_code(),
    )?;
    m.add("OPERATOR_LESSER_THAN", Operator::LesserThan.op_code())?;
    m.add(
        "OPERATOR_LESSER_THAN_OR_EQUAL",
        Operator::LesserThanOrEqual.op_code(),
    )?;

    // --- Numeric status constants, mirroring the native header ---
    m.add("ERR_STATUS_UNKNOWN", status::UNKNOWN)?;
    m.add("ERR_STATUS_INVALID_PRODUCT_NAME", status::INVALID_PRODUCT_NAME)?;
    m.add("ERR_STATUS_ALREADY_INITIALIZED", status::ALREADY_INITIALIZED)?;
    m.add("ERR_STATUS_NOT_INITIALIZED", status::NOT_INITIALIZED)?;
    m.add("ERR_STATUS_TIMEOUT", status::TIMEOUT)?;
    m.add("ERR_ENSURE_ONLINE_FAILED", ensure::ONLINE_FAILED)?;
    m.add("ERR_ENSURE_TRUSTED_FAILED", ensure::TRUSTED_FAILED)?;
    m.add("ERR_ENSURE_PRODUCT_NOT_FOUND", ensure::PRODUCT_NOT_FOUND)?;
    m.add(
        "ERR_ENSURE_PRODUCT_NOT_LICENSED",
        ensure::PRODUCT_NOT_LICENSED,
    )?;
    m.add("ERR_ENSURE_CLAIM_NOT_FOUND", ensure::CLAIM_NOT_FOUND)?;
    m.add(
        "ERR_ENSURE_CLAIM_VALUE_TYPE_MISMATCH",
        ensure::CLAIM_VALUE_TYPE_MISMATCH,
    )?;
    m.add(
        "ERR_ENSURE_CLAIM_VALUE_MISMATCH",
        ensure::CLAIM_VALUE_MISMATCH,
    )?;
    m.add("ERR_ENSURE_UNKNOWN_OPERATOR", ensure::UNKNOWN_OPERATOR)?;
    m.add(
        "ERR_ENSURE_INVALID_TRANSACTION",
        ensure::INVALID_TRANSACTION,
    )?;

    // --- Expose version string as a module attribute ---
    m.add("__version__", VERSION)?;

    Ok(())
}
