// In: src/bridge/session.rs

//! Safe wrappers for the native library's global session operations.
//!
//! The native side keeps one process-wide session: initialize it with a
//! product name, wait for the claim set to become ready, and uninitialize
//! when done. Every wrapper here follows the same shape: marshal arguments,
//! take the call guard, cross the boundary once, translate the status word.

use crate::bridge::claims::ProductClaims;
use crate::error::{check_status, KustomerError, StatusCode};
use crate::ffi::abi::DumpReturn;
use crate::ffi::library;
use crate::utils::{take_native_string, to_c_string_opt};

/// Initializes the native session.
///
/// `product_name` restricts the session to one product; `None` activates
/// claims for any product.
pub fn initialize(product_name: Option<&str>) -> Result<(), KustomerError> {
    let product = to_c_string_opt(product_name)?;
    let lib = library::global()?;
    let _guard = lib.call_guard();
    let status = unsafe {
        (lib.initialize)(
            product
                .as_ref()
                .map_or(std::ptr::null(), |p| p.as_ptr()),
        )
    };
    check_status(status)
}

/// Uninitializes the native session.
pub fn uninitialize() -> Result<(), KustomerError> {
    let lib = library::global()?;
    let _guard = lib.call_guard();
    check_status(unsafe { (lib.uninitialize)() })
}

/// Blocks until the native session's claim set is ready, or the timeout
/// (in seconds) elapses.
pub fn wait_until_ready(timeout_secs: u64) -> Result<(), KustomerError> {
    let lib = library::global()?;
    let _guard = lib.call_guard();
    check_status(unsafe { (lib.wait_until_ready)(timeout_secs) })
}

/// Toggles the native library's automatic claim refresh.
pub fn set_autorefresh(flag: bool) -> Result<(), KustomerError> {
    let lib = library::global()?;
    let _guard = lib.call_guard();
    check_status(unsafe { (lib.set_autorefresh)(flag as std::ffi::c_int) })
}

/// The native library's self-declared version string.
pub fn version() -> Result<String, KustomerError> {
    let lib = library::global()?;
    let _guard = lib.call_guard();
    let raw = unsafe { take_native_string((lib.version)()) }?;
    Ok(raw.unwrap_or_default())
}

/// The native library's build date string.
pub fn build_date() -> Result<String, KustomerError> {
    let lib = library::global()?;
    let _guard = lib.call_guard();
    let raw = unsafe { take_native_string((lib.build_date)()) }?;
    Ok(raw.unwrap_or_default())
}

/// Asks the native library for the readable name of a numeric status code.
///
/// Unlike [`crate::error::status_text`], this reflects whatever taxonomy the
/// loaded artifact actually ships.
pub fn err_numeric_text(code: StatusCode) -> Result<String, KustomerError> {
    let lib = library::global()?;
    let _guard = lib.call_guard();
    let raw = unsafe { take_native_string((lib.err_numeric_text)(code)) }?;
    Ok(raw.unwrap_or_default())
}

/// The raw claim dump document for the current session.
pub fn dump_claims_raw() -> Result<String, KustomerError> {
    let lib = library::global()?;
    let _guard = lib.call_guard();
    let ret = unsafe { (lib.dump_claims)() };
    consume_dump(ret)
}

/// The current session's claim set, decoded.
pub fn current_claims() -> Result<ProductClaims, KustomerError> {
    ProductClaims::from_json(&dump_claims_raw()?)
}

/// Consumes a dump return: releases the native buffer on every path, then
/// translates the status word.
pub(crate) fn consume_dump(ret: DumpReturn) -> Result<String, KustomerError> {
    let taken = unsafe { take_native_string(ret.json) };
    check_status(ret.status)?;
    taken?.ok_or_else(|| {
        KustomerError::Marshal("native dump returned success without a document".to_string())
    })
}
