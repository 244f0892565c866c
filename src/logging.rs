// In: src/logging.rs

//! Log plumbing for the binding.
//!
//! Two directions meet here: host-side diagnostics from this crate go
//! through the `log` facade (with a one-time `env_logger` setup for users
//! who want output without configuring a logger themselves), and the native
//! library's own log lines are captured through its callback hook and
//! forwarded into the same facade under the `libkustomer` target.

use std::ffi::{c_char, c_int};
use std::sync::Once;

use log::LevelFilter;

use crate::error::{check_status, KustomerError};
use crate::ffi::library;
use crate::utils::take_native_string;

static INIT_LOGGER: Once = Once::new();

/// Initializes `env_logger` once, at the requested verbosity.
///
/// Safe to call repeatedly; later calls are no-ops. Does nothing beyond the
/// facade if the host application already installed its own logger.
pub fn init_host_logging(verbose: bool) {
    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::from_default_env();
        if verbose {
            builder.filter_level(LevelFilter::Debug);
        }
        let _ = builder.try_init();
    });
}

/// The callback handed to the native library. The message buffer is a
/// native-owned transfer; it is consumed and released here, exactly once.
unsafe extern "C" fn forward_native_log(message: *mut c_char) {
    match take_native_string(message) {
        Ok(Some(line)) => log::info!(target: "libkustomer", "{}", line.trim_end()),
        Ok(None) => {}
        Err(e) => log::warn!(target: "libkustomer", "dropped undecodable log line: {}", e),
    }
}

/// Registers the forwarding callback as the native library's log sink.
///
/// `debug` follows the native convention: `None` leaves the native debug
/// flag unchanged, `Some` sets it.
pub fn install_native_logger(debug: Option<bool>) -> Result<(), KustomerError> {
    let lib = library::global()?;
    let debug_flag: c_int = match debug {
        None => -1,
        Some(false) => 0,
        Some(true) => 1,
    };
    let _guard = lib.call_guard();
    check_status(unsafe { (lib.set_logger)(Some(forward_native_log), debug_flag) })
}
