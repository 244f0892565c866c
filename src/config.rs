// In: src/config.rs

//! The single source of truth for the binding's build-and-load contract.
//!
//! This module defines the unified `BindingConfig` struct: the header search
//! path, library search path, and library name the native artifact is
//! discovered with. The values are resolved once at the application boundary
//! (compile-time defaults baked in by `build.rs`, overridable through the
//! environment at runtime) and then passed down to the loader.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable overriding the native header directory.
pub const ENV_INCLUDE_DIR: &str = "KUSTOMER_INCLUDE_DIR";
/// Environment variable overriding the native library directory.
pub const ENV_LIB_DIR: &str = "KUSTOMER_LIB_DIR";
/// Environment variable overriding the native library name.
pub const ENV_LIB_NAME: &str = "KUSTOMER_LIB_NAME";

//==================================================================================
// I. The Unified BindingConfig
//==================================================================================

/// The three-parameter contract the native artifact is located with.
///
/// `include_dir` is carried for diagnostics and for consumers that compile
/// against the native headers; the runtime loader itself only needs
/// `lib_dir` and `lib_name`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct BindingConfig {
    /// Directory holding the native library's public headers.
    pub include_dir: PathBuf,

    /// Directory holding the compiled native artifact.
    pub lib_dir: PathBuf,

    /// The library's link name, without platform prefix or suffix.
    pub lib_name: String,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            include_dir: PathBuf::from(env!("KUSTOMER_DEFAULT_INCLUDE_DIR")),
            lib_dir: PathBuf::from(env!("KUSTOMER_DEFAULT_LIB_DIR")),
            lib_name: env!("KUSTOMER_DEFAULT_LIB_NAME").to_string(),
        }
    }
}

impl BindingConfig {
    /// Resolves the configuration from the process environment, falling back
    /// to the defaults baked in at build time.
    pub fn from_env() -> Self {
        Self::resolve(|var| env::var(var).ok())
    }

    /// Resolves the configuration through an arbitrary variable lookup.
    /// Split out from [`BindingConfig::from_env`] so the precedence rules are
    /// testable without mutating the process environment.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            include_dir: lookup(ENV_INCLUDE_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.include_dir),
            lib_dir: lookup(ENV_LIB_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.lib_dir),
            lib_name: lookup(ENV_LIB_NAME).unwrap_or(defaults.lib_name),
        }
    }

    /// The platform file name of the native artifact, e.g. `libkustomer.so`.
    pub fn library_filename(&self) -> String {
        platform_filename(&self.lib_name)
    }

    /// Candidate paths for the dynamic loader, in resolution order: the
    /// configured library directory first, then the bare file name so the
    /// system loader's own search path still applies.
    pub fn library_candidates(&self) -> Vec<PathBuf> {
        let filename = self.library_filename();
        vec![self.lib_dir.join(&filename), PathBuf::from(filename)]
    }
}

fn platform_filename(name: &str) -> String {
    if cfg!(target_os = "windows") {
        format!("{}.dll", name)
    } else if cfg!(target_os = "macos") {
        format!("lib{}.dylib", name)
    } else {
        format!("lib{}.so", name)
    }
}

//==================================================================================
// II. Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_come_from_build_contract() {
        let config = BindingConfig::resolve(|_| None);
        assert_eq!(config, BindingConfig::default());
        assert!(config.lib_dir.ends_with(".libs"));
        assert!(config.include_dir.ends_with("include/kustomer"));
        assert_eq!(config.lib_name, "kustomer");
    }

    #[test]
    fn test_environment_overrides_take_precedence() {
        let config = BindingConfig::resolve(|var| match var {
            ENV_INCLUDE_DIR => Some("/opt/kustomer/include/kustomer".to_string()),
            ENV_LIB_DIR => Some("/opt/kustomer/lib".to_string()),
            ENV_LIB_NAME => Some("kustomer2".to_string()),
            _ => None,
        });
        assert_eq!(
            config.include_dir,
            PathBuf::from("/opt/kustomer/include/kustomer")
        );
        assert_eq!(config.lib_dir, PathBuf::from("/opt/kustomer/lib"));
        assert_eq!(config.lib_name, "kustomer2");
    }

    #[test]
    fn test_partial_override_keeps_remaining_defaults() {
        let config = BindingConfig::resolve(|var| {
            (var == ENV_LIB_DIR).then(|| "/usr/local/lib".to_string())
        });
        assert_eq!(config.lib_dir, PathBuf::from("/usr/local/lib"));
        assert_eq!(config.lib_name, BindingConfig::default().lib_name);
        assert_eq!(config.include_dir, BindingConfig::default().include_dir);
    }

    #[test]
    fn test_platform_filename() {
        let name = platform_filename("kustomer");
        if cfg!(target_os = "windows") {
            assert_eq!(name, "kustomer.dll");
        } else if cfg!(target_os = "macos") {
            assert_eq!(name, "libkustomer.dylib");
        } else {
            assert_eq!(name, "libkustomer.so");
        }
    }

    #[test]
    fn test_candidates_prefer_configured_directory() {
        let config = BindingConfig {
            include_dir: PathBuf::from("/x/include/kustomer"),
            lib_dir: PathBuf::from("/x/lib"),
            lib_name: "kustomer".to_string(),
        };
        let candidates = config.library_candidates();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0], PathBuf::from("/x/lib").join(config.library_filename()));
        assert_eq!(candidates[1], PathBuf::from(config.library_filename()));
    }
}
