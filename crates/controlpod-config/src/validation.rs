//! Configuration validation

use crate::schema::RawConfig;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("watchdog.max_age_seconds must be a positive number of seconds")]
    NonPositiveMaxAge,

    #[error("watchdog.marker_path cannot be empty")]
    EmptyMarkerPath,

    #[error("watchdog.service cannot be empty")]
    EmptyService,

    #[error("recovery.restart_command cannot be empty")]
    EmptyRestartCommand,

    #[error("recovery.restart_command program cannot be empty")]
    EmptyRestartProgram,

    #[error("audit.db_path cannot be empty")]
    EmptyAuditPath,
}

/// Validate a raw configuration
///
/// Only values that were actually supplied are checked; built-in defaults
/// are always valid.
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let watchdog = &config.watchdog;

    if watchdog.max_age_seconds == Some(0) {
        errors.push(ValidationError::NonPositiveMaxAge);
    }

    if let Some(path) = &watchdog.marker_path
        && path.as_os_str().is_empty()
    {
        errors.push(ValidationError::EmptyMarkerPath);
    }

    if let Some(service) = &watchdog.service
        && service.trim().is_empty()
    {
        errors.push(ValidationError::EmptyService);
    }

    if let Some(argv) = &config.recovery.restart_command {
        match argv.first() {
            None => errors.push(ValidationError::EmptyRestartCommand),
            Some(program) if program.trim().is_empty() => {
                errors.push(ValidationError::EmptyRestartProgram)
            }
            Some(_) => {}
        }
    }

    if let Some(path) = &config.audit.db_path
        && path.as_os_str().is_empty()
    {
        errors.push(ValidationError::EmptyAuditPath);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&RawConfig::default()).is_empty());
    }

    #[test]
    fn zero_max_age_rejected() {
        let mut config = RawConfig::default();
        config.watchdog.max_age_seconds = Some(0);
        assert_eq!(validate_config(&config), vec![ValidationError::NonPositiveMaxAge]);
    }

    #[test]
    fn blank_service_rejected() {
        let mut config = RawConfig::default();
        config.watchdog.service = Some("  ".into());
        assert_eq!(validate_config(&config), vec![ValidationError::EmptyService]);
    }

    #[test]
    fn empty_paths_rejected() {
        let mut config = RawConfig::default();
        config.watchdog.marker_path = Some(PathBuf::new());
        config.audit.db_path = Some(PathBuf::new());
        let errors = validate_config(&config);
        assert!(errors.contains(&ValidationError::EmptyMarkerPath));
        assert!(errors.contains(&ValidationError::EmptyAuditPath));
    }

    #[test]
    fn restart_command_checks() {
        let mut config = RawConfig::default();
        config.recovery.restart_command = Some(vec![]);
        assert_eq!(validate_config(&config), vec![ValidationError::EmptyRestartCommand]);

        config.recovery.restart_command = Some(vec!["".into(), "{service}".into()]);
        assert_eq!(validate_config(&config), vec![ValidationError::EmptyRestartProgram]);

        config.recovery.restart_command = Some(vec!["systemctl".into()]);
        assert!(validate_config(&config).is_empty());
    }
}
