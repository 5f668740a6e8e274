//! Environment overrides
//!
//! Per-device overrides live in `/etc/controlpod.env`, a `KEY=VALUE` file
//! shared with the controlled service. The process environment wins over
//! the file.

use crate::schema::RawConfig;
use crate::{ConfigError, ConfigResult};
use controlpod_util::{AUDIT_DB_ENV, HEARTBEAT_MAX_AGE_ENV, HEARTBEAT_PATH_ENV, SERVICE_ENV};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parse `KEY=VALUE` lines. Blank lines, `#` comments, and lines without `=`
/// are skipped. Matching single or double quotes around a value are removed.
pub fn parse_env_file(content: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().trim_start_matches("export ").trim();
        if key.is_empty() {
            continue;
        }
        values.insert(key.to_string(), unquote(value.trim()).to_string());
    }
    values
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Load an env file; a missing file yields no overrides
pub fn load_env_file(path: impl AsRef<Path>) -> ConfigResult<HashMap<String, String>> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let values = parse_env_file(&content);
            debug!(path = %path.display(), keys = values.len(), "Env file loaded");
            Ok(values)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(e) => Err(ConfigError::ReadError(e)),
    }
}

/// Overlay watchdog variables from `lookup` onto `raw`
pub fn apply_env<F>(raw: &mut RawConfig, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(HEARTBEAT_PATH_ENV) {
        raw.watchdog.marker_path = Some(PathBuf::from(path));
    }

    if let Some(value) = lookup(HEARTBEAT_MAX_AGE_ENV) {
        let seconds = value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnv {
            key: HEARTBEAT_MAX_AGE_ENV.to_string(),
            value: value.clone(),
        })?;
        raw.watchdog.max_age_seconds = Some(seconds);
    }

    if let Some(service) = lookup(SERVICE_ENV) {
        raw.watchdog.service = Some(service);
    }

    if let Some(path) = lookup(AUDIT_DB_ENV) {
        raw.audit.db_path = Some(PathBuf::from(path));
    }

    Ok(())
}
