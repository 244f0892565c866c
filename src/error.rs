// In: src/error.rs

//! This module defines the single, unified error type for the entire binding.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error
//! handling, and it carries the native library's numeric error taxonomy so a
//! failure can always be diagnosed from (code, text) alone.

use pyo3::PyErr;
use thiserror::Error;

use crate::ffi::python::exceptions;

//==================================================================================
// I. Native Numeric Status Codes
//==================================================================================

/// The status word returned by every native call. Zero is success.
pub type StatusCode = u64;

/// The success status as returned by the native library.
pub const STATUS_SUCCESS: StatusCode = 0;

/// Numeric status errors reported by the global session operations.
pub mod status {
    use super::StatusCode;

    const BASE: StatusCode = 1 << 8;

    pub const UNKNOWN: StatusCode = BASE + 1;
    pub const INVALID_PRODUCT_NAME: StatusCode = BASE + 2;
    pub const ALREADY_INITIALIZED: StatusCode = BASE + 3;
    pub const NOT_INITIALIZED: StatusCode = BASE + 4;
    pub const TIMEOUT: StatusCode = BASE + 5;
}

/// Numeric errors reported by the ensure comparison operations.
pub mod ensure {
    use super::StatusCode;

    const BASE: StatusCode = (1 << 16) + 1;

    pub const ONLINE_FAILED: StatusCode = BASE;
    pub const TRUSTED_FAILED: StatusCode = BASE + 1;
    pub const PRODUCT_NOT_FOUND: StatusCode = BASE + 2;
    pub const PRODUCT_NOT_LICENSED: StatusCode = BASE + 3;
    pub const CLAIM_NOT_FOUND: StatusCode = BASE + 4;
    pub const CLAIM_VALUE_TYPE_MISMATCH: StatusCode = BASE + 5;
    pub const CLAIM_VALUE_MISMATCH: StatusCode = BASE + 6;
    pub const UNKNOWN_OPERATOR: StatusCode = BASE + 7;
    pub const INVALID_TRANSACTION: StatusCode = BASE + 8;
}

/// Returns the readable name for a numeric status code, or the empty string
/// if the code is unknown to this binding.
pub fn status_text(code: StatusCode) -> &'static str {
    match code {
        status::UNKNOWN => "Unknown",
        status::INVALID_PRODUCT_NAME => "Invalid Product Name Value",
        status::ALREADY_INITIALIZED => "Already Initialized",
        status::NOT_INITIALIZED => "Not Initialized",
        status::TIMEOUT => "Timeout",

        ensure::ONLINE_FAILED => "Ensure failed, product claim set not online",
        ensure::TRUSTED_FAILED => "Ensure failed, product claim set not trusted",
        ensure::PRODUCT_NOT_FOUND => "Ensure failed, product entry not found",
        ensure::PRODUCT_NOT_LICENSED => "Ensure failed, product is not licensed",
        ensure::CLAIM_NOT_FOUND => "Ensure failed, product claim entry not found",
        ensure::CLAIM_VALUE_TYPE_MISMATCH => {
            "Ensure failed, product claim value type mismatch"
        }
        ensure::CLAIM_VALUE_MISMATCH => "Ensure failed, product claim value mismatch",
        ensure::UNKNOWN_OPERATOR => "Ensure failed, unknown operator",
        ensure::INVALID_TRANSACTION => "Ensure failed, invalid transaction",

        _ => "",
    }
}

/// Formats a numeric code the way the native library formats its own errors.
pub fn format_status(code: StatusCode) -> String {
    format!("{} (:0x{:x})", status_text(code), code)
}

/// Checks a native status word, converting nonzero codes into errors.
pub fn check_status(code: StatusCode) -> Result<(), KustomerError> {
    if code == STATUS_SUCCESS {
        Ok(())
    } else {
        Err(KustomerError::Native { code })
    }
}

//==================================================================================
// II. The Unified Error Type
//==================================================================================

#[derive(Error, Debug)]
pub enum KustomerError {
    /// The native library or one of its expected symbols could not be
    /// resolved. Fatal for the binding; every call will keep failing with
    /// the same diagnostic until the artifact is installed.
    #[error("could not link libkustomer: {0}")]
    Linkage(String),

    /// A native call returned a nonzero status word.
    #[error("{}", format_status(*.code))]
    Native { code: StatusCode },

    /// Host-supplied arguments could not be converted to the native
    /// representation, or a native string was not valid UTF-8. Raised before
    /// the boundary is crossed (or immediately after, for return values).
    #[error("marshaling failed: {0}")]
    Marshal(String),

    /// A claim dump document produced by the native library could not be
    /// decoded.
    #[error("claims decode failed: {0}")]
    Claims(#[from] serde_json::Error),
}

impl KustomerError {
    /// The numeric code carried by this error, if it maps onto the native
    /// taxonomy. Linkage and marshaling failures report `Unknown`, the code
    /// the native side uses for errors it cannot classify.
    pub fn code(&self) -> StatusCode {
        match self {
            KustomerError::Native { code } => *code,
            _ => status::UNKNOWN,
        }
    }
}

impl From<std::ffi::NulError> for KustomerError {
    fn from(err: std::ffi::NulError) -> Self {
        KustomerError::Marshal(format!("string contains an interior nul byte: {}", err))
    }
}

impl From<KustomerError> for PyErr {
    fn from(err: KustomerError) -> PyErr {
        match err {
            KustomerError::Native { code } => {
                exceptions::Error::new_err((code, format_status(code)))
            }
            KustomerError::Linkage(msg) => exceptions::Error::new_err((status::UNKNOWN, msg)),
            KustomerError::Marshal(msg) => pyo3::exceptions::PyValueError::new_err(msg),
            KustomerError::Claims(e) => pyo3::exceptions::PyValueError::new_err(e.to_string()),
        }
    }
}

//==================================================================================
// III. Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_values_match_native_header() {
        assert_eq!(STATUS_SUCCESS, 0);
        assert_eq!(status::UNKNOWN, 257);
        assert_eq!(status::INVALID_PRODUCT_NAME, 258);
        assert_eq!(status::ALREADY_INITIALIZED, 259);
        assert_eq!(status::NOT_INITIALIZED, 260);
        assert_eq!(status::TIMEOUT, 261);

        assert_eq!(ensure::ONLINE_FAILED, 65537);
        assert_eq!(ensure::TRUSTED_FAILED, 65538);
        assert_eq!(ensure::PRODUCT_NOT_FOUND, 65539);
        assert_eq!(ensure::PRODUCT_NOT_LICENSED, 65540);
        assert_eq!(ensure::CLAIM_NOT_FOUND, 65541);
        assert_eq!(ensure::CLAIM_VALUE_TYPE_MISMATCH, 65542);
        assert_eq!(ensure::CLAIM_VALUE_MISMATCH, 65543);
        assert_eq!(ensure::UNKNOWN_OPERATOR, 65544);
        assert_eq!(ensure::INVALID_TRANSACTION, 65545);
    }

    #[test]
    fn test_every_code_has_text() {
        let codes = [
            status::UNKNOWN,
            status::INVALID_PRODUCT_NAME,
            status::ALREADY_INITIALIZED,
            status::NOT_INITIALIZED,
            status::TIMEOUT,
            ensure::ONLINE_FAILED,
            ensure::TRUSTED_FAILED,
            ensure::PRODUCT_NOT_FOUND,
            ensure::PRODUCT_NOT_LICENSED,
            ensure::CLAIM_NOT_FOUND,
            ensure::CLAIM_VALUE_TYPE_MISMATCH,
            ensure::CLAIM_VALUE_MISMATCH,
            ensure::UNKNOWN_OPERATOR,
            ensure::INVALID_TRANSACTION,
        ];
        for code in codes {
            assert!(!status_text(code).is_empty(), "no text for 0x{:x}", code);
        }
        assert_eq!(status_text(42), "");
    }

    #[test]
    fn test_format_matches_native_error_format() {
        assert_eq!(format_status(status::TIMEOUT), "Timeout (:0x105)");
        assert_eq!(
            format_status(ensure::INVALID_TRANSACTION),
            "Ensure failed, invalid transaction (:0x10009)"
        );
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(STATUS_SUCCESS).is_ok());
        let err = check_status(status::NOT_INITIALIZED).unwrap_err();
        assert_eq!(err.code(), status::NOT_INITIALIZED);
        assert_eq!(err.to_string(), "Not Initialized (:0x104)");
    }

    #[test]
    fn test_interior_nul_is_a_marshal_error() {
        let err: KustomerError = std::ffi::CString::new("a\0b").unwrap_err().into();
        assert!(matches!(err, KustomerError::Marshal(_)));
        assert_eq!(err.code(), status::UNKNOWN);
    }
}
