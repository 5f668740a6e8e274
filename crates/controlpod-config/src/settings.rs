//! Resolved settings handed to the watchdog

use crate::schema::RawConfig;
use controlpod_util::{
    default_audit_db_path, default_marker_path, default_restart_command, ServiceName,
    DEFAULT_MAX_AGE_SECONDS, DEFAULT_SERVICE,
};
use std::path::PathBuf;

/// Validated settings ready for use by the evaluator and its collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchdogSettings {
    /// Heartbeat marker location
    pub marker_path: PathBuf,

    /// Marker ages strictly above this are stale
    pub max_age_seconds: u64,

    /// Unit restarted on a failed liveness check
    pub service: ServiceName,

    /// Restart command argv, still containing the `{service}` placeholder
    pub restart_command: Vec<String>,

    /// SQLite audit database
    pub audit_db_path: PathBuf,
}

impl WatchdogSettings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            marker_path: raw.watchdog.marker_path.unwrap_or_else(default_marker_path),
            max_age_seconds: raw.watchdog.max_age_seconds.unwrap_or(DEFAULT_MAX_AGE_SECONDS),
            service: ServiceName::new(
                raw.watchdog
                    .service
                    .map(|s| s.trim().to_string())
                    .unwrap_or_else(|| DEFAULT_SERVICE.to_string()),
            ),
            restart_command: raw
                .recovery
                .restart_command
                .unwrap_or_else(default_restart_command),
            audit_db_path: raw.audit.db_path.unwrap_or_else(default_audit_db_path),
        }
    }
}

impl Default for WatchdogSettings {
    fn default() -> Self {
        Self::from_raw(RawConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_field_deployment() {
        let settings = WatchdogSettings::default();
        assert_eq!(settings.marker_path, PathBuf::from("/run/controlpod/heartbeat"));
        assert_eq!(settings.max_age_seconds, 600);
        assert_eq!(settings.service.as_str(), "controlpod.service");
        assert_eq!(
            settings.restart_command,
            vec!["systemctl", "restart", "--no-block", "{service}"]
        );
    }

    #[test]
    fn raw_values_take_precedence() {
        let mut raw = RawConfig::default();
        raw.watchdog.marker_path = Some(PathBuf::from("/tmp/hb"));
        raw.watchdog.max_age_seconds = Some(30);
        raw.watchdog.service = Some(" pump.service ".into());

        let settings = WatchdogSettings::from_raw(raw);
        assert_eq!(settings.marker_path, PathBuf::from("/tmp/hb"));
        assert_eq!(settings.max_age_seconds, 30);
        assert_eq!(settings.service.as_str(), "pump.service");
    }
}
