//! Default paths and environment variable names for the watchdog
//!
//! The heartbeat lives on tmpfs so a reboot clears it:
//! - Marker: `/run/controlpod/heartbeat`
//! - Per-device overrides: `/etc/controlpod.env`
//! - Optional TOML config: `/etc/controlpod/watchdog.toml`
//! - Audit log: `/var/lib/controlpod/watchdog-audit.db`

use std::path::PathBuf;

/// Environment variable for overriding the heartbeat marker path
pub const HEARTBEAT_PATH_ENV: &str = "CONTROLPOD_HEARTBEAT_PATH";

/// Environment variable for overriding the staleness threshold (seconds)
pub const HEARTBEAT_MAX_AGE_ENV: &str = "CONTROLPOD_HEARTBEAT_MAX_AGE";

/// Environment variable for overriding the unit to restart
pub const SERVICE_ENV: &str = "CONTROLPOD_SERVICE";

/// Environment variable for overriding the audit database path
pub const AUDIT_DB_ENV: &str = "CONTROLPOD_WATCHDOG_AUDIT_DB";

/// Default staleness threshold in seconds
pub const DEFAULT_MAX_AGE_SECONDS: u64 = 600;

/// Default unit restarted on a failed liveness check
pub const DEFAULT_SERVICE: &str = "controlpod.service";

const APP_DIR: &str = "controlpod";

pub fn default_marker_path() -> PathBuf {
    PathBuf::from("/run").join(APP_DIR).join("heartbeat")
}

pub fn default_env_file_path() -> PathBuf {
    PathBuf::from("/etc/controlpod.env")
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("/etc").join(APP_DIR).join("watchdog.toml")
}

pub fn default_audit_db_path() -> PathBuf {
    PathBuf::from("/var/lib").join(APP_DIR).join("watchdog-audit.db")
}

/// Default restart command; `{service}` is replaced with the unit name
pub fn default_restart_command() -> Vec<String> {
    ["systemctl", "restart", "--no-block", "{service}"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_path_is_on_run() {
        assert_eq!(default_marker_path(), PathBuf::from("/run/controlpod/heartbeat"));
    }

    #[test]
    fn restart_command_has_service_placeholder() {
        let cmd = default_restart_command();
        assert_eq!(cmd[0], "systemctl");
        assert!(cmd.iter().any(|a| a == "--no-block"));
        assert_eq!(cmd.last().map(String::as_str), Some("{service}"));
    }

    #[test]
    fn audit_db_contains_controlpod() {
        let path = default_audit_db_path();
        assert!(path.to_string_lossy().contains("controlpod"));
    }
}
