//! Configuration loading and validation for the ControlPod watchdog
//!
//! Settings are layered, lowest to highest precedence:
//! - Built-in defaults
//! - Optional versioned TOML file
//! - Env file (`/etc/controlpod.env`)
//! - Process environment
//! - Command-line overrides

mod env;
mod schema;
mod settings;
mod validation;

pub use env::*;
pub use schema::*;
pub use settings::*;
pub use validation::*;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidEnv { key: String, value: String },

    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Current supported config version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Load a TOML config file without validating it
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<RawConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse a TOML config string and check its version
pub fn parse_config(content: &str) -> ConfigResult<RawConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.config_version != CURRENT_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.config_version));
    }

    Ok(raw)
}

/// Validate a merged raw config and resolve it into settings
pub fn finalize(raw: RawConfig) -> ConfigResult<WatchdogSettings> {
    if raw.config_version != CURRENT_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.config_version));
    }

    let errors = validate_config(&raw);
    if !errors.is_empty() {
        return Err(ConfigError::ValidationFailed { errors });
    }

    Ok(WatchdogSettings::from_raw(raw))
}

/// Command-line overrides, applied after every other source
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub marker_path: Option<PathBuf>,
    pub max_age_seconds: Option<u64>,
    pub service: Option<String>,
    pub audit_db_path: Option<PathBuf>,
}

impl Overrides {
    fn apply(&self, raw: &mut RawConfig) {
        if let Some(path) = &self.marker_path {
            raw.watchdog.marker_path = Some(path.clone());
        }
        if let Some(seconds) = self.max_age_seconds {
            raw.watchdog.max_age_seconds = Some(seconds);
        }
        if let Some(service) = &self.service {
            raw.watchdog.service = Some(service.clone());
        }
        if let Some(path) = &self.audit_db_path {
            raw.audit.db_path = Some(path.clone());
        }
    }
}

/// Where to look for configuration
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// TOML config file
    pub config_path: PathBuf,

    /// Whether a missing TOML file is an error (true when given explicitly)
    pub config_required: bool,

    /// `KEY=VALUE` env file
    pub env_file: PathBuf,

    pub overrides: Overrides,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            config_path: controlpod_util::default_config_path(),
            config_required: false,
            env_file: controlpod_util::default_env_file_path(),
            overrides: Overrides::default(),
        }
    }
}

/// Resolve settings from every source; `lookup` reads the process environment
pub fn load_settings<F>(options: &LoadOptions, lookup: F) -> ConfigResult<WatchdogSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let mut raw = if options.config_required || options.config_path.exists() {
        debug!(path = %options.config_path.display(), "Loading config file");
        load_config(&options.config_path)?
    } else {
        RawConfig::default()
    };

    let file_vars = load_env_file(&options.env_file)?;
    apply_env(&mut raw, |key| lookup(key).or_else(|| file_vars.get(key).cloned()))?;

    options.overrides.apply(&mut raw);

    finalize(raw)
}
