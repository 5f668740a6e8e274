//! Raw configuration schema (as parsed from TOML)
//!
//! Every field is optional so that the TOML file, the env file, the process
//! environment and the command line can each fill in what they know.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::CURRENT_CONFIG_VERSION;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Heartbeat evaluation settings
    #[serde(default)]
    pub watchdog: RawWatchdogConfig,

    /// How recovery is requested from the service manager
    #[serde(default)]
    pub recovery: RawRecoveryConfig,

    /// Where decisions are recorded
    #[serde(default)]
    pub audit: RawAuditConfig,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_CONFIG_VERSION,
            watchdog: RawWatchdogConfig::default(),
            recovery: RawRecoveryConfig::default(),
            audit: RawAuditConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawWatchdogConfig {
    /// Heartbeat marker path (default: /run/controlpod/heartbeat)
    pub marker_path: Option<PathBuf>,

    /// Maximum tolerated marker age in seconds (default: 600)
    pub max_age_seconds: Option<u64>,

    /// Unit to restart when the heartbeat fails (default: controlpod.service)
    pub service: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawRecoveryConfig {
    /// Restart command argv; `{service}` is replaced with the unit name
    pub restart_command: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawAuditConfig {
    /// SQLite audit database path
    pub db_path: Option<PathBuf>,
}
