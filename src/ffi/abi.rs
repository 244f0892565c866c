// In: src/ffi/abi.rs

//! The raw C ABI of `libkustomer`, transcribed from its public header.
//!
//! Everything here must match the native artifact symbol-for-symbol: the
//! status word convention (zero is success), the by-value struct returns the
//! native toolchain emits for multi-value functions, and the callback shape
//! for the log sink. No logic lives here; the safe wrappers are in `bridge`.

use std::ffi::{c_char, c_double, c_int, c_longlong, c_ulonglong, c_void};

/// The native API major version this binding was written against.
pub const KUSTOMER_API: u32 = 1;
/// The native API minor version this binding was written against.
pub const KUSTOMER_API_MINOR: u32 = 0;

/// Log sink callback: receives a native-allocated message the callee owns.
pub type LogCallback = unsafe extern "C" fn(*mut c_char);

//==================================================================================
// I. By-Value Return Structs
//==================================================================================

/// Return of `kustomer_begin_ensure` / `kustomer_instant_ensure`:
/// status word plus an opaque transaction handle.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TransactionReturn {
    pub status: c_ulonglong,
    pub transaction: *mut c_void,
}

/// Return of the dump operations: status word plus a native-allocated
/// JSON document. Ownership of the string transfers to the caller.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DumpReturn {
    pub status: c_ulonglong,
    pub json: *mut c_char,
}

/// Return of `kustomer_ensure_get_bool`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct GetBoolReturn {
    pub status: c_ulonglong,
    pub value: u8,
}

/// Return of `kustomer_ensure_get_string`. Ownership of the string
/// transfers to the caller.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct GetStringReturn {
    pub status: c_ulonglong,
    pub value: *mut c_char,
}

/// Return of `kustomer_ensure_get_int64`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct GetInt64Return {
    pub status: c_ulonglong,
    pub value: c_longlong,
}

/// Return of `kustomer_ensure_get_float64`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct GetFloat64Return {
    pub status: c_ulonglong,
    pub value: c_double,
}

//==================================================================================
// II. Symbol Signatures
//==================================================================================

// Function pointer types for every exported symbol, in header order. The
// loader resolves each one eagerly so a missing or renamed export is caught
// at load time rather than at call time.

pub type ErrNumericTextFn = unsafe extern "C" fn(c_ulonglong) -> *mut c_char;
pub type VersionFn = unsafe extern "C" fn() -> *mut c_char;
pub type BuildDateFn = unsafe extern "C" fn() -> *mut c_char;

pub type SetAutorefreshFn = unsafe extern "C" fn(c_int) -> c_ulonglong;
pub type SetLoggerFn = unsafe extern "C" fn(Option<LogCallback>, c_int) -> c_ulonglong;

pub type InitializeFn = unsafe extern "C" fn(*const c_char) -> c_ulonglong;
pub type UninitializeFn = unsafe extern "C" fn() -> c_ulonglong;
pub type WaitUntilReadyFn = unsafe extern "C" fn(c_ulonglong) -> c_ulonglong;
pub type DumpClaimsFn = unsafe extern "C" fn() -> DumpReturn;

pub type BeginEnsureFn = unsafe extern "C" fn() -> TransactionReturn;
pub type InstantEnsureFn =
    unsafe extern "C" fn(*const c_char, *const c_char, c_ulonglong) -> TransactionReturn;
pub type EndEnsureFn = unsafe extern "C" fn(*mut c_void) -> c_ulonglong;
pub type DumpEnsureFn = unsafe extern "C" fn(*mut c_void) -> DumpReturn;

pub type EnsureSetFlagFn = unsafe extern "C" fn(*mut c_void, c_int) -> c_ulonglong;
pub type EnsureOkFn = unsafe extern "C" fn(*mut c_void, *const c_char) -> c_ulonglong;

pub type EnsureGetBoolFn =
    unsafe extern "C" fn(*mut c_void, *const c_char, *const c_char) -> GetBoolReturn;
pub type EnsureEnsureBoolFn =
    unsafe extern "C" fn(*mut c_void, *const c_char, *const c_char, c_int) -> c_ulonglong;
pub type EnsureGetStringFn =
    unsafe extern "C" fn(*mut c_void, *const c_char, *const c_char) -> GetStringReturn;
pub type EnsureEnsureStringFn =
    unsafe extern "C" fn(*mut c_void, *const c_char, *const c_char, *const c_char) -> c_ulonglong;
pub type EnsureGetInt64Fn =
    unsafe extern "C" fn(*mut c_void, *const c_char, *const c_char) -> GetInt64Return;
pub type EnsureEnsureInt64Fn =
    unsafe extern "C" fn(*mut c_void, *const c_char, *const c_char, c_longlong) -> c_ulonglong;
pub type EnsureEnsureInt64OpFn = unsafe extern "C" fn(
    *mut c_void,
    *const c_char,
    *const c_char,
    c_longlong,
    c_int,
) -> c_ulonglong;
pub type EnsureGetFloat64Fn =
    unsafe extern "C" fn(*mut c_void, *const c_char, *const c_char) -> GetFloat64Return;
pub type EnsureEnsureFloat64Fn =
    unsafe extern "C" fn(*mut c_void, *const c_char, *const c_char, c_double) -> c_ulonglong;
pub type EnsureEnsureFloat64OpFn = unsafe extern "C" fn(
    *mut c_void,
    *const c_char,
    *const c_char,
    c_double,
    c_int,
) -> c_ulonglong;
pub type EnsureEnsureStringArrayValueFn =
    unsafe extern "C" fn(*mut c_void, *const c_char, *const c_char, *const c_char) -> c_ulonglong;
