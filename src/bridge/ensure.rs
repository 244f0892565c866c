// In: src/bridge/ensure.rs

//! Ensure transactions: snapshot-scoped license checks.
//!
//! A transaction pins the claim set at a point in time behind an opaque
//! native handle. All checks (`ok`, the typed getters, the comparators) are
//! evaluated by the native library against that snapshot; the binding only
//! marshals and guards the handle's lifecycle. The handle is released
//! exactly once: explicitly through [`EnsureTransaction::end`], or on drop.
//! After that, every operation fails locally with the invalid-transaction
//! code, without crossing the boundary.

use std::ffi::{c_int, c_void};
use std::ptr::NonNull;

use crate::bridge::claims::ProductClaims;
use crate::bridge::session::consume_dump;
use crate::error::{check_status, ensure, KustomerError};
use crate::ffi::library::{self, NativeLibrary};
use crate::utils::{take_native_string, to_c_string, to_c_string_opt};

//==================================================================================
// I. Comparison Operators
//==================================================================================

/// Relational operator for the int64/float64 comparator checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    GreaterThan,
    GreaterThanOrEqual,
    LesserThan,
    LesserThanOrEqual,
}

impl Operator {
    /// The wire opcode for the native comparator entry points.
    pub fn op_code(self) -> c_int {
        match self {
            Operator::GreaterThan => 1,
            Operator::GreaterThanOrEqual => 2,
            Operator::LesserThan => 3,
            Operator::LesserThanOrEqual => 4,
        }
    }

    /// The inverse of [`Operator::op_code`], for hosts that pass the wire
    /// opcode directly.
    pub fn from_op_code(code: c_int) -> Result<Self, KustomerError> {
        match code {
            1 => Ok(Operator::GreaterThan),
            2 => Ok(Operator::GreaterThanOrEqual),
            3 => Ok(Operator::LesserThan),
            4 => Ok(Operator::LesserThanOrEqual),
            _ => Err(KustomerError::Native {
                code: ensure::UNKNOWN_OPERATOR,
            }),
        }
    }

    /// Parses the short operator mnemonic used across the kustomer tooling.
    pub fn from_mnemonic(s: &str) -> Result<Self, KustomerError> {
        match s {
            "gt" => Ok(Operator::GreaterThan),
            "ge" => Ok(Operator::GreaterThanOrEqual),
            "lt" => Ok(Operator::LesserThan),
            "le" => Ok(Operator::LesserThanOrEqual),
            _ => Err(KustomerError::Native {
                code: ensure::UNKNOWN_OPERATOR,
            }),
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Operator::GreaterThan => "gt",
            Operator::GreaterThanOrEqual => "ge",
            Operator::LesserThan => "lt",
            Operator::LesserThanOrEqual => "le",
        }
    }
}

//==================================================================================
// II. The Transaction Handle
//==================================================================================

/// An open ensure transaction.
#[derive(Debug)]
pub struct EnsureTransaction {
    handle: Option<NonNull<c_void>>,
}

// The handle is an opaque token into the native library's own registry; the
// native side owns the referenced state and the binding serializes all calls
// through the library's call guard. Shared references only ever read the
// token (release requires `&mut self`), so cross-thread sharing is sound.
unsafe impl Send for EnsureTransaction {}
unsafe impl Sync for EnsureTransaction {}

impl EnsureTransaction {
    /// Opens a transaction against the current session's claim set.
    pub fn begin() -> Result<Self, KustomerError> {
        let lib = library::global()?;
        let _guard = lib.call_guard();
        let ret = unsafe { (lib.begin_ensure)() };
        check_status(ret.status)?;
        Self::from_raw(ret.transaction)
    }

    /// Initializes the session, waits for readiness, and opens a transaction
    /// in one native call. Intended for short-lived checkers that do not
    /// manage the session themselves.
    pub fn instant(
        product_name: Option<&str>,
        product_user_agent: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, KustomerError> {
        let product = to_c_string_opt(product_name)?;
        let user_agent = to_c_string_opt(product_user_agent)?;
        let lib = library::global()?;
        let _guard = lib.call_guard();
        let ret = unsafe {
            (lib.instant_ensure)(
                product.as_ref().map_or(std::ptr::null(), |p| p.as_ptr()),
                user_agent.as_ref().map_or(std::ptr::null(), |u| u.as_ptr()),
                timeout_secs,
            )
        };
        check_status(ret.status)?;
        Self::from_raw(ret.transaction)
    }

    fn from_raw(ptr: *mut c_void) -> Result<Self, KustomerError> {
        match NonNull::new(ptr) {
            Some(handle) => Ok(Self {
                handle: Some(handle),
            }),
            None => Err(KustomerError::Native {
                code: ensure::INVALID_TRANSACTION,
            }),
        }
    }

    /// Whether the transaction has been ended.
    pub fn is_ended(&self) -> bool {
        self.handle.is_none()
    }

    // Validates the handle before anything crosses the boundary.
    fn live(&self) -> Result<(*mut c_void, &'static NativeLibrary), KustomerError> {
        let ptr = self
            .handle
            .ok_or(KustomerError::Native {
                code: ensure::INVALID_TRANSACTION,
            })?
            .as_ptr();
        Ok((ptr, library::global()?))
    }

    /// Ends the transaction, releasing the native handle. Ending twice
    /// fails with the invalid-transaction code.
    pub fn end(&mut self) -> Result<(), KustomerError> {
        let (ptr, lib) = self.live()?;
        self.handle = None;
        let _guard = lib.call_guard();
        check_status(unsafe { (lib.end_ensure)(ptr) })
    }

    /// Requires claim-set evaluation to fail when the set was loaded
    /// offline.
    pub fn set_must_be_online(&self, flag: bool) -> Result<(), KustomerError> {
        let (ptr, lib) = self.live()?;
        let _guard = lib.call_guard();
        check_status(unsafe { (lib.ensure_set_must_be_online)(ptr, flag as c_int) })
    }

    /// Permits claim-set evaluation against an unverified signature chain.
    pub fn set_allow_untrusted(&self, flag: bool) -> Result<(), KustomerError> {
        let (ptr, lib) = self.live()?;
        let _guard = lib.call_guard();
        check_status(unsafe { (lib.ensure_set_allow_untrusted)(ptr, flag as c_int) })
    }

    /// Checks that the product is present and licensed.
    pub fn ok(&self, product: &str) -> Result<(), KustomerError> {
        let (ptr, lib) = self.live()?;
        let product = to_c_string(product)?;
        let _guard = lib.call_guard();
        check_status(unsafe { (lib.ensure_ok)(ptr, product.as_ptr()) })
    }

    pub fn get_bool(&self, product: &str, claim: &str) -> Result<bool, KustomerError> {
        let (ptr, lib) = self.live()?;
        let product = to_c_string(product)?;
        let claim = to_c_string(claim)?;
        let _guard = lib.call_guard();
        let ret = unsafe { (lib.ensure_get_bool)(ptr, product.as_ptr(), claim.as_ptr()) };
        check_status(ret.status)?;
        Ok(ret.value != 0)
    }

    /// Checks that a bool claim has exactly the given value.
    pub fn ensure_bool(&self, product: &str, claim: &str, value: bool) -> Result<(), KustomerError> {
        let (ptr, lib) = self.live()?;
        let product = to_c_string(product)?;
        let claim = to_c_string(claim)?;
        let _guard = lib.call_guard();
        check_status(unsafe {
            (lib.ensure_ensure_bool)(ptr, product.as_ptr(), claim.as_ptr(), value as c_int)
        })
    }

    pub fn get_string(&self, product: &str, claim: &str) -> Result<String, KustomerError> {
        let (ptr, lib) = self.live()?;
        let product = to_c_string(product)?;
        let claim = to_c_string(claim)?;
        let _guard = lib.call_guard();
        let ret = unsafe { (lib.ensure_get_string)(ptr, product.as_ptr(), claim.as_ptr()) };
        let taken = unsafe { take_native_string(ret.value) };
        check_status(ret.status)?;
        taken?.ok_or_else(|| {
            KustomerError::Marshal("native returned success without a string value".to_string())
        })
    }

    /// Checks that a string claim has exactly the given value.
    pub fn ensure_string(
        &self,
        product: &str,
        claim: &str,
        value: &str,
    ) -> Result<(), KustomerError> {
        let (ptr, lib) = self.live()?;
        let product = to_c_string(product)?;
        let claim = to_c_string(claim)?;
        let value = to_c_string(value)?;
        let _guard = lib.call_guard();
        check_status(unsafe {
            (lib.ensure_ensure_string)(ptr, product.as_ptr(), claim.as_ptr(), value.as_ptr())
        })
    }

    pub fn get_int64(&self, product: &str, claim: &str) -> Result<i64, KustomerError> {
        let (ptr, lib) = self.live()?;
        let product = to_c_string(product)?;
        let claim = to_c_string(claim)?;
        let _guard = lib.call_guard();
        let ret = unsafe { (lib.ensure_get_int64)(ptr, product.as_ptr(), claim.as_ptr()) };
        check_status(ret.status)?;
        Ok(ret.value)
    }

    /// Checks that an int64 claim has exactly the given value.
    pub fn ensure_int64(&self, product: &str, claim: &str, value: i64) -> Result<(), KustomerError> {
        let (ptr, lib) = self.live()?;
        let product = to_c_string(product)?;
        let claim = to_c_string(claim)?;
        let _guard = lib.call_guard();
        check_status(unsafe {
            (lib.ensure_ensure_int64)(ptr, product.as_ptr(), claim.as_ptr(), value)
        })
    }

    /// Checks an int64 claim against `value` under the given operator, with
    /// the claim value on the left: `claim <op> value`.
    pub fn ensure_int64_op(
        &self,
        product: &str,
        claim: &str,
        value: i64,
        op: Operator,
    ) -> Result<(), KustomerError> {
        let (ptr, lib) = self.live()?;
        let product = to_c_string(product)?;
        let claim = to_c_string(claim)?;
        let _guard = lib.call_guard();
        check_status(unsafe {
            (lib.ensure_ensure_int64_op)(
                ptr,
                product.as_ptr(),
                claim.as_ptr(),
                value,
                op.op_code(),
            )
        })
    }

    pub fn get_float64(&self, product: &str, claim: &str) -> Result<f64, KustomerError> {
        let (ptr, lib) = self.live()?;
        let product = to_c_string(product)?;
        let claim = to_c_string(claim)?;
        let _guard = lib.call_guard();
        let ret = unsafe { (lib.ensure_get_float64)(ptr, product.as_ptr(), claim.as_ptr()) };
        check_status(ret.status)?;
        Ok(ret.value)
    }

    /// Checks that a float64 claim has exactly the given value.
    pub fn ensure_float64(
        &self,
        product: &str,
        claim: &str,
        value: f64,
    ) -> Result<(), KustomerError> {
        let (ptr, lib) = self.live()?;
        let product = to_c_string(product)?;
        let claim = to_c_string(claim)?;
        let _guard = lib.call_guard();
        check_status(unsafe {
            (lib.ensure_ensure_float64)(ptr, product.as_ptr(), claim.as_ptr(), value)
        })
    }

    /// Checks a float64 claim against `value` under the given operator.
    pub fn ensure_float64_op(
        &self,
        product: &str,
        claim: &str,
        value: f64,
        op: Operator,
    ) -> Result<(), KustomerError> {
        let (ptr, lib) = self.live()?;
        let product = to_c_string(product)?;
        let claim = to_c_string(claim)?;
        let _guard = lib.call_guard();
        check_status(unsafe {
            (lib.ensure_ensure_float64_op)(
                ptr,
                product.as_ptr(),
                claim.as_ptr(),
                value,
                op.op_code(),
            )
        })
    }

    /// Checks that a string-array claim contains the given value.
    pub fn ensure_string_array_value(
        &self,
        product: &str,
        claim: &str,
        value: &str,
    ) -> Result<(), KustomerError> {
        let (ptr, lib) = self.live()?;
        let product = to_c_string(product)?;
        let claim = to_c_string(claim)?;
        let value = to_c_string(value)?;
        let _guard = lib.call_guard();
        check_status(unsafe {
            (lib.ensure_ensure_string_array_value)(
                ptr,
                product.as_ptr(),
                claim.as_ptr(),
                value.as_ptr(),
            )
        })
    }

    /// The raw claim dump for this transaction's snapshot.
    pub fn dump_raw(&self) -> Result<String, KustomerError> {
        let (ptr, lib) = self.live()?;
        let _guard = lib.call_guard();
        let ret = unsafe { (lib.dump_ensure)(ptr) };
        consume_dump(ret)
    }

    /// This transaction's snapshot, decoded.
    pub fn dump(&self) -> Result<ProductClaims, KustomerError> {
        ProductClaims::from_json(&self.dump_raw()?)
    }
}

impl Drop for EnsureTransaction {
    fn drop(&mut self) {
        if self.handle.is_some() {
            if let Err(e) = self.end() {
                log::debug!("ensure transaction leaked by native side on drop: {}", e);
            }
        }
    }
}

//==================================================================================
// III. Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ended() -> EnsureTransaction {
        EnsureTransaction { handle: None }
    }

    #[test]
    fn test_operator_op_codes_are_stable() {
        assert_eq!(Operator::GreaterThan.op_code(), 1);
        assert_eq!(Operator::GreaterThanOrEqual.op_code(), 2);
        assert_eq!(Operator::LesserThan.op_code(), 3);
        assert_eq!(Operator::LesserThanOrEqual.op_code(), 4);
    }

    #[test]
    fn test_operator_mnemonics_roundtrip() {
        for op in [
            Operator::GreaterThan,
            Operator::GreaterThanOrEqual,
            Operator::LesserThan,
            Operator::LesserThanOrEqual,
        ] {
            assert_eq!(Operator::from_mnemonic(op.mnemonic()).unwrap(), op);
        }
        let err = Operator::from_mnemonic("eq").unwrap_err();
        assert_eq!(err.code(), ensure::UNKNOWN_OPERATOR);
    }

    #[test]
    fn test_ended_transaction_fails_locally() {
        // No native library is needed: the handle check runs before any
        // boundary crossing.
        let txn = ended();
        assert!(txn.is_ended());

        let err = txn.ok("groupware").unwrap_err();
        assert_eq!(err.code(), ensure::INVALID_TRANSACTION);

        let err = txn.get_bool("groupware", "multi-server").unwrap_err();
        assert_eq!(err.code(), ensure::INVALID_TRANSACTION);

        let err = txn.dump_raw().unwrap_err();
        assert_eq!(err.code(), ensure::INVALID_TRANSACTION);
    }

    #[test]
    fn test_ending_twice_fails_with_invalid_transaction() {
        let mut txn = ended();
        let err = txn.end().unwrap_err();
        assert_eq!(err.code(), ensure::INVALID_TRANSACTION);
    }

    #[test]
    fn test_null_transaction_handle_is_rejected() {
        let err = EnsureTransaction::from_raw(std::ptr::null_mut()).unwrap_err();
        assert_eq!(err.code(), ensure::INVALID_TRANSACTION);
    }
}
