// In: src/ffi/python.rs

use pyo3::prelude::*;

use crate::bridge::ensure::{EnsureTransaction, Operator};
use crate::bridge::session;
use crate::error::StatusCode;
use crate::logging;
use crate::utils::json_to_py;

//==================================================================================
// I. Module Exception
//==================================================================================

pub mod exceptions {
    use pyo3::create_exception;
    use pyo3::exceptions::PyException;

    create_exception!(
        _pykustomer,
        Error,
        PyException,
        "Raised when a kustomer operation fails. Arguments are (code, message), \
         where code is the native numeric status."
    );
}

//==================================================================================
// II. Global Session Functions
//==================================================================================

/// Initializes the kustomer session for the given product, or for any
/// product when `product_name` is None.
#[pyfunction]
#[pyo3(signature = (product_name=None))]
pub fn initialize(py: Python<'_>, product_name: Option<String>) -> PyResult<()> {
    py.allow_threads(|| session::initialize(product_name.as_deref()))?;
    Ok(())
}

/// Uninitializes the kustomer session.
#[pyfunction]
pub fn uninitialize(py: Python<'_>) -> PyResult<()> {
    py.allow_threads(session::uninitialize)?;
    Ok(())
}

/// Blocks until the session is ready or `timeout` seconds have passed.
#[pyfunction]
pub fn wait_until_ready(py: Python<'_>, timeout: u64) -> PyResult<()> {
    py.allow_threads(|| session::wait_until_ready(timeout))?;
    Ok(())
}

/// Toggles automatic claim refresh.
#[pyfunction]
pub fn set_autorefresh(py: Python<'_>, flag: bool) -> PyResult<()> {
    py.allow_threads(|| session::set_autorefresh(flag))?;
    Ok(())
}

/// Routes the native library's log output into this binding's logging and
/// optionally sets the native debug flag.
#[pyfunction]
#[pyo3(signature = (debug=None))]
pub fn set_logger(py: Python<'_>, debug: Option<bool>) -> PyResult<()> {
    logging::init_host_logging(debug.unwrap_or(false));
    py.allow_threads(|| logging::install_native_logger(debug))?;
    Ok(())
}

/// The loaded native library's version string.
#[pyfunction]
pub fn version(py: Python<'_>) -> PyResult<String> {
    Ok(py.allow_threads(session::version)?)
}

/// The loaded native library's build date string.
#[pyfunction]
pub fn build_date(py: Python<'_>) -> PyResult<String> {
    Ok(py.allow_threads(session::build_date)?)
}

/// The native library's readable name for a numeric status code.
#[pyfunction]
pub fn err_numeric_text(py: Python<'_>, code: StatusCode) -> PyResult<String> {
    Ok(py.allow_threads(|| session::err_numeric_text(code))?)
}

/// The current claim set, as a dict.
#[pyfunction]
pub fn dump_claims(py: Python<'_>) -> PyResult<PyObject> {
    let claims = py.allow_threads(session::current_claims)?;
    let value = claims.to_value().map_err(PyErr::from)?;
    json_to_py(py, &value)
}

//==================================================================================
// III. Ensure Transactions
//==================================================================================

/// An open ensure transaction against a snapshot of the claim set.
#[pyclass(name = "KopanoProductClaims", module = "_pykustomer")]
pub struct PyKopanoProductClaims {
    inner: EnsureTransaction,
}

#[pymethods]
impl PyKopanoProductClaims {
    /// Ends the transaction. Further use raises the invalid-transaction
    /// error.
    pub fn end(&mut self, py: Python<'_>) -> PyResult<()> {
        let inner = &mut self.inner;
        py.allow_threads(|| inner.end())?;
        Ok(())
    }

    /// Whether the transaction has been ended.
    pub fn is_ended(&self) -> bool {
        self.inner.is_ended()
    }

    pub fn set_must_be_online(&self, py: Python<'_>, flag: bool) -> PyResult<()> {
        let inner = &self.inner;
        py.allow_threads(|| inner.set_must_be_online(flag))?;
        Ok(())
    }

    pub fn set_allow_untrusted(&self, py: Python<'_>, flag: bool) -> PyResult<()> {
        let inner = &self.inner;
        py.allow_threads(|| inner.set_allow_untrusted(flag))?;
        Ok(())
    }

    /// Raises unless the product is present and licensed.
    pub fn ok(&self, py: Python<'_>, product_name: String) -> PyResult<()> {
        let inner = &self.inner;
        py.allow_threads(|| inner.ok(&product_name))?;
        Ok(())
    }

    pub fn get_bool(&self, py: Python<'_>, product_name: String, claim: String) -> PyResult<bool> {
        let inner = &self.inner;
        Ok(py.allow_threads(|| inner.get_bool(&product_name, &claim))?)
    }

    pub fn ensure_bool(
        &self,
        py: Python<'_>,
        product_name: String,
        claim: String,
        value: bool,
    ) -> PyResult<()> {
        let inner = &self.inner;
        py.allow_threads(|| inner.ensure_bool(&product_name, &claim, value))?;
        Ok(())
    }

    pub fn get_string(
        &self,
        py: Python<'_>,
        product_name: String,
        claim: String,
    ) -> PyResult<String> {
        let inner = &self.inner;
        Ok(py.allow_threads(|| inner.get_string(&product_name, &claim))?)
    }

    pub fn ensure_string(
        &self,
        py: Python<'_>,
        product_name: String,
        claim: String,
        value: String,
    ) -> PyResult<()> {
        let inner = &self.inner;
        py.allow_threads(|| inner.ensure_string(&product_name, &claim, &value))?;
        Ok(())
    }

    pub fn get_int64(&self, py: Python<'_>, product_name: String, claim: String) -> PyResult<i64> {
        let inner = &self.inner;
        Ok(py.allow_threads(|| inner.get_int64(&product_name, &claim))?)
    }

    pub fn ensure_int64(
        &self,
        py: Python<'_>,
        product_name: String,
        claim: String,
        value: i64,
    ) -> PyResult<()> {
        let inner = &self.inner;
        py.allow_threads(|| inner.ensure_int64(&product_name, &claim, value))?;
        Ok(())
    }

    /// Compares an int64 claim against `value` under an operator constant
    /// (see the module-level OPERATOR_* attributes).
    pub fn ensure_int64_op(
        &self,
        py: Python<'_>,
        product_name: String,
        claim: String,
        value: i64,
        op_code: i32,
    ) -> PyResult<()> {
        let op = Operator::from_op_code(op_code)?;
        let inner = &self.inner;
        py.allow_threads(|| inner.ensure_int64_op(&product_name, &claim, value, op))?;
        Ok(())
    }

    pub fn get_float64(
        &self,
        py: Python<'_>,
        product_name: String,
        claim: String,
    ) -> PyResult<f64> {
        let inner = &self.inner;
        Ok(py.allow_threads(|| inner.get_float64(&product_name, &claim))?)
    }

    pub fn ensure_float64(
        &self,
        py: Python<'_>,
        product_name: String,
        claim: String,
        value: f64,
    ) -> PyResult<()> {
        let inner = &self.inner;
        py.allow_threads(|| inner.ensure_float64(&product_name, &claim, value))?;
        Ok(())
    }

    /// Compares a float64 claim against `value` under an operator constant.
    pub fn ensure_float64_op(
        &self,
        py: Python<'_>,
        product_name: String,
        claim: String,
        value: f64,
        op_code: i32,
    ) -> PyResult<()> {
        let op = Operator::from_op_code(op_code)?;
        let inner = &self.inner;
        py.allow_threads(|| inner.ensure_float64_op(&product_name, &claim, value, op))?;
        Ok(())
    }

    /// Raises unless a string-array claim contains `value`.
    pub fn ensure_string_array_value(
        &self,
        py: Python<'_>,
        product_name: String,
        claim: String,
        value: String,
    ) -> PyResult<()> {
        let inner = &self.inner;
        py.allow_threads(|| inner.ensure_string_array_value(&product_name, &claim, &value))?;
        Ok(())
    }

    /// This transaction's claim snapshot, as a dict.
    pub fn dump(&self, py: Python<'_>) -> PyResult<PyObject> {
        let inner = &self.inner;
        let claims = py.allow_threads(|| inner.dump())?;
        let value = claims.to_value().map_err(PyErr::from)?;
        json_to_py(py, &value)
    }
}

/// Opens an ensure transaction against the current session.
#[pyfunction]
pub fn begin_ensure(py: Python<'_>) -> PyResult<PyKopanoProductClaims> {
    let inner = py.allow_threads(EnsureTransaction::begin)?;
    Ok(PyKopanoProductClaims { inner })
}

/// Initializes, waits for readiness, and opens a transaction in one step.
#[pyfunction]
#[pyo3(signature = (product_name, product_user_agent, timeout))]
pub fn instant_ensure(
    py: Python<'_>,
    product_name: Option<String>,
    product_user_agent: Option<String>,
    timeout: u64,
) -> PyResult<PyKopanoProductClaims> {
    let inner = py.allow_threads(|| {
        EnsureTransaction::instant(
            product_name.as_deref(),
            product_user_agent.as_deref(),
            timeout,
        )
    })?;
    Ok(PyKopanoProductClaims { inner })
}

/// Ends a transaction. Equivalent to calling its `end()` method.
#[pyfunction]
pub fn end_ensure(py: Python<'_>, mut kpc: PyRefMut<'_, PyKopanoProductClaims>) -> PyResult<()> {
    kpc.end(py)
}
