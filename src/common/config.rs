//! Layered configuration for the analytical core.
//!
//! Mirrors the teacher's `DecompilerConfig`: a top-level struct of nested,
//! independently `Default`-able sub-configs, loadable from TOML and
//! overridable at the call site.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::common::errors::{AnalysisError, AnalysisResult};

/// Policy governing how the patcher reacts to central-directory anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CdhTolerance {
    /// Log a warning and keep iterating (matches the original's behavior).
    Tolerant,
    /// Abort the whole patch on the first bad signature.
    Strict,
}

impl Default for CdhTolerance {
    fn default() -> Self {
        CdhTolerance::Tolerant
    }
}

/// Policy governing how many `AndroidManifest.xml` entries the patcher
/// examines before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestRescanPolicy {
    /// Stop at the first entry found, patched or not.
    FirstOnly,
    /// Keep scanning every entry named `AndroidManifest.xml`.
    AllEntries,
}

impl Default for ManifestRescanPolicy {
    fn default() -> Self {
        ManifestRescanPolicy::FirstOnly
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    pub cdh_tolerance: CdhTolerance,
    pub manifest_rescan: ManifestRescanPolicy,
}

impl Default for PatchConfig {
    fn default() -> Self {
        PatchConfig {
            cdh_tolerance: CdhTolerance::default(),
            manifest_rescan: ManifestRescanPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// When true, a register read that has never been written returns a
    /// placeholder value node instead of an `InterpreterError`.
    pub tolerate_uninitialized_registers: bool,
    /// Maximum resolved-string cache entries retained per node set; purely
    /// advisory since the cache is per-node (`OnceLock`), kept for parity
    /// with the original's configurable cache and for future tuning.
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            tolerate_uninitialized_registers: false,
            max_call_depth: 4096,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub debug: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig { debug: false }
    }
}

/// Root configuration object for the analytical core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub patch: PatchConfig,
    pub interpreter: InterpreterConfig,
    pub logging: LoggingConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            patch: PatchConfig::default(),
            interpreter: InterpreterConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Loads and merges [`AnalysisConfig`] from disk and the environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a configuration from a TOML file, falling back to defaults for
    /// any field the file omits.
    pub fn load_from_file(path: &Path) -> AnalysisResult<AnalysisConfig> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| AnalysisError::Config(e.to_string()))
    }

    /// Loads the default configuration, applying any `APK_ANALYSIS_*`
    /// environment overrides on top.
    #[must_use]
    pub fn load() -> AnalysisConfig {
        let mut config = AnalysisConfig::default();
        Self::apply_env_overrides(&mut config);
        config
    }

    fn apply_env_overrides(config: &mut AnalysisConfig) {
        if let Ok(val) = std::env::var("APK_ANALYSIS_DEBUG") {
            config.logging.debug = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Ok(val) = std::env::var("APK_ANALYSIS_CDH_STRICT") {
            if val == "1" || val.eq_ignore_ascii_case("true") {
                config.patch.cdh_tolerance = CdhTolerance::Strict;
            }
        }
    }
}
