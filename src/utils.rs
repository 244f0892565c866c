// In: src/utils.rs

//! This module provides the shared, low-level marshaling helpers used at the
//! native boundary.
//!
//! Its primary responsibilities include:
//! 1.  Converting host strings into C strings, rejecting values the native
//!     side cannot represent before the boundary is crossed.
//! 2.  Taking ownership of native-allocated strings: every `char*` the
//!     native library returns is copied out and released exactly once.
//! 3.  Converting decoded claim documents into Python objects.

use std::ffi::{c_char, c_void, CStr, CString};

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use serde_json::Value;

use crate::error::KustomerError;

extern "C" {
    // The native library allocates returned strings with the C allocator;
    // they must be released with the matching `free`.
    fn free(ptr: *mut c_void);
}

//==================================================================================
// I. C String Marshaling
//==================================================================================

/// Converts a host string into an owned C string for the duration of a call.
pub fn to_c_string(s: &str) -> Result<CString, KustomerError> {
    Ok(CString::new(s)?)
}

/// Converts an optional host string; `None` crosses the boundary as NULL.
pub fn to_c_string_opt(s: Option<&str>) -> Result<Option<CString>, KustomerError> {
    s.map(to_c_string).transpose()
}

/// Takes ownership of a native-allocated string.
///
/// Copies the contents into a Rust `String` and releases the native buffer.
/// A NULL pointer yields `None`; invalid UTF-8 is a marshaling error (the
/// buffer is still released).
///
/// # Safety
/// `ptr` must be NULL or a string allocated by the native library with the
/// C allocator, and must not be used again after this call.
pub unsafe fn take_native_string(ptr: *mut c_char) -> Result<Option<String>, KustomerError> {
    if ptr.is_null() {
        return Ok(None);
    }
    let copied = CStr::from_ptr(ptr).to_str().map(str::to_owned);
    free(ptr as *mut c_void);
    match copied {
        Ok(s) => Ok(Some(s)),
        Err(e) => Err(KustomerError::Marshal(format!(
            "native string is not valid UTF-8: {}",
            e
        ))),
    }
}

//==================================================================================
// II. JSON → Python Conversion
//==================================================================================

/// Converts a decoded JSON document into the equivalent Python object tree.
pub fn json_to_py(py: Python<'_>, value: &Value) -> PyResult<PyObject> {
    Ok(match value {
        Value::Null => py.None(),
        Value::Bool(b) => (*b).into_py(py),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.into_py(py)
            } else if let Some(u) = n.as_u64() {
                u.into_py(py)
            } else {
                // serde_json numbers are always one of i64/u64/f64.
                n.as_f64().unwrap_or(f64::NAN).into_py(py)
            }
        }
        Value::String(s) => s.as_str().into_py(py),
        Value::Array(items) => {
            let list = PyList::empty(py);
            for item in items {
                list.append(json_to_py(py, item)?)?;
            }
            list.into_py(py)
        }
        Value::Object(map) => {
            let dict = PyDict::new(py);
            for (key, item) in map {
                dict.set_item(key, json_to_py(py, item)?)?;
            }
            dict.into_py(py)
        }
    })
}

//==================================================================================
// III. Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_c_string_roundtrip() {
        let c = to_c_string("some-product").unwrap();
        assert_eq!(c.to_str().unwrap(), "some-product");
    }

    #[test]
    fn test_to_c_string_rejects_interior_nul() {
        let err = to_c_string("bad\0value").unwrap_err();
        assert!(matches!(err, KustomerError::Marshal(_)));
    }

    #[test]
    fn test_to_c_string_opt_none_is_null() {
        assert!(to_c_string_opt(None).unwrap().is_none());
        assert!(to_c_string_opt(Some("x")).unwrap().is_some());
    }

    #[test]
    fn test_take_native_string_null_is_none() {
        let taken = unsafe { take_native_string(std::ptr::null_mut()) }.unwrap();
        assert!(taken.is_none());
    }
}
