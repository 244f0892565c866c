// In: src/ffi/library.rs

//! Runtime resolution of the native `libkustomer` artifact.
//!
//! The library is opened with the system's dynamic loader and every expected
//! symbol is resolved eagerly, so a missing artifact or a missing export is
//! reported once, with a message naming the dependency, instead of crashing
//! at call time. Resolution happens at most once per process; a failed load
//! is remembered and reported identically on every retry.

use std::sync::{Mutex, MutexGuard, OnceLock};

use libloading::Library;

use crate::config::BindingConfig;
use crate::error::KustomerError;
use crate::ffi::abi;
use crate::utils::take_native_string;

//==================================================================================
// I. The Resolved Symbol Table
//==================================================================================

/// A loaded native library with its full symbol table.
///
/// The raw function pointers are only valid while `_lib` is alive, which is
/// why both live in the same struct and the struct is only ever handed out
/// as `&'static` through [`global`].
#[derive(Debug)]
pub struct NativeLibrary {
    pub err_numeric_text: abi::ErrNumericTextFn,
    pub version: abi::VersionFn,
    pub build_date: abi::BuildDateFn,

    pub set_autorefresh: abi::SetAutorefreshFn,
    pub set_logger: abi::SetLoggerFn,

    pub initialize: abi::InitializeFn,
    pub uninitialize: abi::UninitializeFn,
    pub wait_until_ready: abi::WaitUntilReadyFn,
    pub dump_claims: abi::DumpClaimsFn,

    pub begin_ensure: abi::BeginEnsureFn,
    pub instant_ensure: abi::InstantEnsureFn,
    pub end_ensure: abi::EndEnsureFn,
    pub dump_ensure: abi::DumpEnsureFn,

    pub ensure_set_must_be_online: abi::EnsureSetFlagFn,
    pub ensure_set_allow_untrusted: abi::EnsureSetFlagFn,
    pub ensure_ok: abi::EnsureOkFn,
    pub ensure_get_bool: abi::EnsureGetBoolFn,
    pub ensure_ensure_bool: abi::EnsureEnsureBoolFn,
    pub ensure_get_string: abi::EnsureGetStringFn,
    pub ensure_ensure_string: abi::EnsureEnsureStringFn,
    pub ensure_get_int64: abi::EnsureGetInt64Fn,
    pub ensure_ensure_int64: abi::EnsureEnsureInt64Fn,
    pub ensure_ensure_int64_op: abi::EnsureEnsureInt64OpFn,
    pub ensure_get_float64: abi::EnsureGetFloat64Fn,
    pub ensure_ensure_float64: abi::EnsureEnsureFloat64Fn,
    pub ensure_ensure_float64_op: abi::EnsureEnsureFloat64OpFn,
    pub ensure_ensure_string_array_value: abi::EnsureEnsureStringArrayValueFn,

    /// The native library's self-declared version, for diagnostics.
    pub native_version: String,

    call_lock: Mutex<()>,
    _lib: Library,
}

/// Resolves one symbol, failing with the symbol's name in the message.
macro_rules! resolve {
    ($lib:expr, $name:literal, $ty:ty) => {{
        let symbol: libloading::Symbol<'_, $ty> = unsafe { $lib.get($name) }.map_err(|e| {
            KustomerError::Linkage(format!(
                "expected symbol {} is missing from libkustomer: {}",
                String::from_utf8_lossy(&$name[..$name.len() - 1]),
                e
            ))
        })?;
        *symbol
    }};
}

impl NativeLibrary {
    /// Opens the native artifact described by `config` and resolves the full
    /// symbol table.
    pub fn load(config: &BindingConfig) -> Result<Self, KustomerError> {
        let (lib, path) = open_candidates(config)?;

        let mut library = Self {
            err_numeric_text: resolve!(lib, b"kustomer_err_numeric_text\0", abi::ErrNumericTextFn),
            version: resolve!(lib, b"kustomer_version\0", abi::VersionFn),
            build_date: resolve!(lib, b"kustomer_build_date\0", abi::BuildDateFn),

            set_autorefresh: resolve!(lib, b"kustomer_set_autorefresh\0", abi::SetAutorefreshFn),
            set_logger: resolve!(lib, b"kustomer_set_logger\0", abi::SetLoggerFn),

            initialize: resolve!(lib, b"kustomer_initialize\0", abi::InitializeFn),
            uninitialize: resolve!(lib, b"kustomer_uninitialize\0", abi::UninitializeFn),
            wait_until_ready: resolve!(lib, b"kustomer_wait_until_ready\0", abi::WaitUntilReadyFn),
            dump_claims: resolve!(lib, b"kustomer_dump_claims\0", abi::DumpClaimsFn),

            begin_ensure: resolve!(lib, b"kustomer_begin_ensure\0", abi::BeginEnsureFn),
            instant_ensure: resolve!(lib, b"kustomer_instant_ensure\0", abi::InstantEnsureFn),
            end_ensure: resolve!(lib, b"kustomer_end_ensure\0", abi::EndEnsureFn),
            dump_ensure: resolve!(lib, b"kustomer_dump_ensure\0", abi::DumpEnsureFn),

            ensure_set_must_be_online: resolve!(
                lib,
                b"kustomer_ensure_set_must_be_online\0",
                abi::EnsureSetFlagFn
            ),
            ensure_set_allow_untrusted: resolve!(
                lib,
                b"kustomer_ensure_set_allow_untrusted\0",
                abi::EnsureSetFlagFn
            ),
            ensure_ok: resolve!(lib, b"kustomer_ensure_ok\0", abi::EnsureOkFn),
            ensure_get_bool: resolve!(lib, b"kustomer_ensure_get_bool\0", abi::EnsureGetBoolFn),
            ensure_ensure_bool: resolve!(
                lib,
                b"kustomer_ensure_ensure_bool\0",
                abi::EnsureEnsureBoolFn
            ),
            ensure_get_string: resolve!(
                lib,
                b"kustomer_ensure_get_string\0",
                abi::EnsureGetStringFn
            ),
            ensure_ensure_string: resolve!(
                lib,
                b"kustomer_ensure_ensure_string\0",
                abi::EnsureEnsureStringFn
            ),
            ensure_get_int64: resolve!(lib, b"kustomer_ensure_get_int64\0", abi::EnsureGetInt64Fn),
            ensure_ensure_int64: resolve!(
                lib,
                b"kustomer_ensure_ensure_int64\0",
                abi::EnsureEnsureInt64Fn
            ),
            ensure_ensure_int64_op: resolve!(
                lib,
                b"kustomer_ensure_ensure_int64_op\0",
                abi::EnsureEnsureInt64OpFn
            ),
            ensure_get_float64: resolve!(
                lib,
                b"kustomer_ensure_get_float64\0",
                abi::EnsureGetFloat64Fn
            ),
            ensure_ensure_float64: resolve!(
                lib,
                b"kustomer_ensure_ensure_float64\0",
                abi::EnsureEnsureFloat64Fn
            ),
            ensure_ensure_float64_op: resolve!(
                lib,
                b"kustomer_ensure_ensure_float64_op\0",
                abi::EnsureEnsureFloat64OpFn
            ),
            ensure_ensure_string_array_value: resolve!(
                lib,
                b"kustomer_ensure_ensure_stringArray_value\0",
                abi::EnsureEnsureStringArrayValueFn
            ),

            native_version: String::new(),
            call_lock: Mutex::new(()),
            _lib: lib,
        };

        library.native_version = unsafe { take_native_string((library.version)()) }
            .ok()
            .flatten()
            .unwrap_or_else(|| "unknown".to_string());
        log::debug!(
            "loaded libkustomer {} from {} (binding API {}.{})",
            library.native_version,
            path,
            abi::KUSTOMER_API,
            abi::KUSTOMER_API_MINOR,
        );

        Ok(library)
    }

    /// Serializes native calls. The native header does not document thread
    /// safety, so the binding keeps one call in flight at a time.
    pub fn call_guard(&self) -> MutexGuard<'_, ()> {
        self.call_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn open_candidates(config: &BindingConfig) -> Result<(Library, String), KustomerError> {
    let mut attempts = Vec::new();
    for candidate in config.library_candidates() {
        match unsafe { Library::new(&candidate) } {
            Ok(lib) => return Ok((lib, candidate.display().to_string())),
            Err(e) => attempts.push(format!("{}: {}", candidate.display(), e)),
        }
    }
    Err(KustomerError::Linkage(format!(
        "could not load {} (set {} / {} to the installed location); tried: {}",
        config.library_filename(),
        crate::config::ENV_LIB_DIR,
        crate::config::ENV_LIB_NAME,
        attempts.join("; ")
    )))
}

//==================================================================================
// II. The Process-Wide Instance
//==================================================================================

static GLOBAL: OnceLock<Result<NativeLibrary, String>> = OnceLock::new();

/// Returns the process-wide library instance, loading it on first use.
///
/// The first outcome, success or failure, is final for the process: repeated
/// calls after a failure report the same diagnostic without touching the
/// loader again.
pub fn global() -> Result<&'static NativeLibrary, KustomerError> {
    let slot = GLOBAL.get_or_init(|| {
        NativeLibrary::load(&BindingConfig::from_env()).map_err(|e| match e {
            KustomerError::Linkage(msg) => msg,
            other => other.to_string(),
        })
    });
    match slot {
        Ok(lib) => Ok(lib),
        Err(msg) => Err(KustomerError::Linkage(msg.clone())),
    }
}

//==================================================================================
// III. Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn missing_config() -> BindingConfig {
        BindingConfig {
            include_dir: PathBuf::from("/nonexistent/include/kustomer"),
            lib_dir: PathBuf::from("/nonexistent/lib"),
            lib_name: "kustomer-test-missing".to_string(),
        }
    }

    #[test]
    fn test_missing_artifact_fails_with_diagnosable_error() {
        let err = NativeLibrary::load(&missing_config()).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, KustomerError::Linkage(_)));
        assert!(message.contains("kustomer-test-missing"), "{}", message);
        assert!(message.contains("KUSTOMER_LIB_DIR"), "{}", message);
    }

    #[test]
    fn test_missing_artifact_fails_deterministically() {
        let config = missing_config();
        let first = NativeLibrary::load(&config).unwrap_err().to_string();
        let second = NativeLibrary::load(&config).unwrap_err().to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_library_file_is_rejected_not_crashed() {
        let dir = tempfile::tempdir().unwrap();
        let config = BindingConfig {
            include_dir: dir.path().join("include/kustomer"),
            lib_dir: dir.path().to_path_buf(),
            lib_name: "kustomer".to_string(),
        };
        let mut file = std::fs::File::create(dir.path().join(config.library_filename())).unwrap();
        file.write_all(b"this is not a shared library").unwrap();
        drop(file);

        let err = NativeLibrary::load(&config).unwrap_err();
        assert!(matches!(err, KustomerError::Linkage(_)));
    }
}
