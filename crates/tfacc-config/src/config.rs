// crates/tfacc-config/src/config.rs
// ============================================================================
// Module: tfacc Configuration
// Description: Configuration loading and validation for sweep runs.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: tfacc-harness, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with a size limit and unknown
//! fields rejected. The file is resolved from an explicit path, then the
//! `TFACC_CONFIG` environment variable, then `tfacc.toml` in the working
//! directory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use tfacc_harness::FileSweepAuditSink;
use tfacc_harness::NoopSweepAuditSink;
use tfacc_harness::SkipPolicy;
use tfacc_harness::SkipRule;
use tfacc_harness::StderrSweepAuditSink;
use tfacc_harness::SweepAuditSink;
use tfacc_harness::SweepSettings;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "tfacc.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "TFACC_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 256 * 1024;
/// Maximum number of regions in one run.
pub const MAX_REGIONS: usize = 64;
/// Maximum deletion timeout in seconds.
pub const MAX_DELETE_TIMEOUT_SECS: u64 = 24 * 60 * 60;
/// Maximum poll interval in seconds.
pub const MAX_POLL_INTERVAL_SECS: u64 = 10 * 60;
/// Region swept when none is configured.
const DEFAULT_REGION: &str = "us-west-2";
/// Default deletion timeout in seconds.
const DEFAULT_DELETE_TIMEOUT_SECS: u64 = 120 * 60;
/// Default poll interval in seconds.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Top-level tfacc configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TfaccConfig {
    /// Sweep run configuration.
    #[serde(default)]
    pub sweep: SweepConfig,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Sweep run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    /// Regions swept in order.
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,
    /// Sweeper name filters; empty selects every sweeper.
    #[serde(default)]
    pub sweepers: Vec<String>,
    /// Time allowed for asynchronous deletions, in seconds.
    #[serde(default = "default_delete_timeout_secs")]
    pub delete_timeout_secs: u64,
    /// Delay between deletion status polls, in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Include the built-in skip rules for unavailable services.
    #[serde(default = "default_true")]
    pub use_default_skip_rules: bool,
    /// Additional skip rules.
    #[serde(default)]
    pub skip_rules: Vec<SkipRule>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            regions: default_regions(),
            sweepers: Vec::new(),
            delete_timeout_secs: DEFAULT_DELETE_TIMEOUT_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            use_default_skip_rules: true,
            skip_rules: Vec::new(),
        }
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard events.
    None,
}

/// Audit sink configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl TfaccConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path);
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        Self::from_bytes(&bytes)
    }

    /// Loads configuration when a file is named or present, else defaults.
    ///
    /// An explicit path or `TFACC_CONFIG` must point at a readable file; only
    /// the implicit `tfacc.toml` may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a selected file fails to load.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if path.is_none()
            && env::var_os(CONFIG_ENV_VAR).is_none()
            && !Path::new(DEFAULT_CONFIG_NAME).exists()
        {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parses and validates configuration bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bytes are oversized, not UTF-8, not
    /// valid TOML, or fail validation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sweep.validate()?;
        self.audit.validate()
    }

    /// Builds harness settings for a sweep run.
    #[must_use]
    pub fn sweep_settings(&self) -> SweepSettings {
        SweepSettings {
            delete_timeout: Duration::from_secs(self.sweep.delete_timeout_secs),
            poll_interval: Duration::from_secs(self.sweep.poll_interval_secs),
            skip: self.sweep.skip_policy(),
        }
    }

    /// Returns the sweeper filter, or `None` when every sweeper runs.
    #[must_use]
    pub fn sweeper_filter(&self) -> Option<&[String]> {
        if self.sweep.sweepers.is_empty() { None } else { Some(&self.sweep.sweepers) }
    }

    /// Opens the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened.
    pub fn audit_sink(&self) -> Result<Box<dyn SweepAuditSink>, ConfigError> {
        match (self.audit.sink, &self.audit.path) {
            (AuditSinkKind::Stderr, _) => Ok(Box::new(StderrSweepAuditSink)),
            (AuditSinkKind::None, _) => Ok(Box::new(NoopSweepAuditSink)),
            (AuditSinkKind::File, Some(path)) => {
                let sink = FileSweepAuditSink::new(path)
                    .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
                Ok(Box::new(sink))
            }
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.sink=file requires audit.path".to_string()))
            }
        }
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

impl SweepConfig {
    /// Validates regions, filters, and timing bounds.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.regions.is_empty() {
            return Err(ConfigError::Invalid("sweep.regions must not be empty".to_string()));
        }
        if self.regions.len() > MAX_REGIONS {
            return Err(ConfigError::Invalid(format!(
                "sweep.regions exceeds {MAX_REGIONS} entries"
            )));
        }
        for region in &self.regions {
            if !is_region_name(region) {
                return Err(ConfigError::Invalid(format!("sweep.regions has invalid region: {region}")));
            }
        }
        if self.sweepers.iter().any(|filter| filter.trim().is_empty()) {
            return Err(ConfigError::Invalid("sweep.sweepers entries must not be empty".to_string()));
        }
        if self.delete_timeout_secs == 0 || self.delete_timeout_secs > MAX_DELETE_TIMEOUT_SECS {
            return Err(ConfigError::Invalid(format!(
                "sweep.delete_timeout_secs must be between 1 and {MAX_DELETE_TIMEOUT_SECS}"
            )));
        }
        if self.poll_interval_secs == 0 || self.poll_interval_secs > MAX_POLL_INTERVAL_SECS {
            return Err(ConfigError::Invalid(format!(
                "sweep.poll_interval_secs must be between 1 and {MAX_POLL_INTERVAL_SECS}"
            )));
        }
        if self.poll_interval_secs > self.delete_timeout_secs {
            return Err(ConfigError::Invalid(
                "sweep.poll_interval_secs must not exceed sweep.delete_timeout_secs".to_string(),
            ));
        }
        if self.skip_rules.iter().any(|rule| rule.code.trim().is_empty()) {
            return Err(ConfigError::Invalid("sweep.skip_rules code must not be empty".to_string()));
        }
        Ok(())
    }

    /// Builds the skip policy from defaults and configured rules.
    fn skip_policy(&self) -> SkipPolicy {
        let base = if self.use_default_skip_rules { SkipPolicy::default() } else { SkipPolicy::never() };
        self.skip_rules.iter().cloned().fold(base, SkipPolicy::with_rule)
    }
}

impl AuditConfig {
    /// Validates that the file sink names a path.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.sink=file requires audit.path".to_string()))
            }
            (AuditSinkKind::Stderr | AuditSinkKind::None, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid with audit.sink=file".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> PathBuf {
    if let Some(path) = path {
        return path.to_path_buf();
    }
    if let Some(env_path) = env::var_os(CONFIG_ENV_VAR) {
        return PathBuf::from(env_path);
    }
    PathBuf::from(DEFAULT_CONFIG_NAME)
}

/// Returns true for names shaped like `us-west-2` or `us-gov-east-1`.
fn is_region_name(region: &str) -> bool {
    let parts: Vec<&str> = region.split('-').collect();
    let [first, middle @ .., last] = parts.as_slice() else {
        return false;
    };
    first.len() == 2
        && first.bytes().all(|byte| byte.is_ascii_lowercase())
        && !middle.is_empty()
        && middle.iter().all(|part| !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_lowercase()))
        && !last.is_empty()
        && last.bytes().all(|byte| byte.is_ascii_digit())
}

/// Default region list.
fn default_regions() -> Vec<String> {
    vec![DEFAULT_REGION.to_string()]
}

/// Default deletion timeout.
const fn default_delete_timeout_secs() -> u64 {
    DEFAULT_DELETE_TIMEOUT_SECS
}

/// Default poll interval.
const fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

/// Serde default for enabled flags.
const fn default_true() -> bool {
    true
}
