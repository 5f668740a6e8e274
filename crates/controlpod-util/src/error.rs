//! Error types for the watchdog
//!
//! Only environment failures live here. A missing, unparsable, or stale
//! heartbeat is a normal evaluation outcome, not an error.

use thiserror::Error;

use crate::ServiceName;

/// The watchdog itself could not do its job
#[derive(Debug, Error)]
pub enum WatchdogError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Audit log unavailable: {0}")]
    AuditLog(String),

    #[error("Failed to dispatch restart of {service}: {message}")]
    RestartDispatch {
        service: ServiceName,
        message: String,
    },
}

impl WatchdogError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn audit(msg: impl Into<String>) -> Self {
        Self::AuditLog(msg.into())
    }

    pub fn dispatch(service: &ServiceName, msg: impl Into<String>) -> Self {
        Self::RestartDispatch {
            service: service.clone(),
            message: msg.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WatchdogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_error_names_the_service() {
        let err = WatchdogError::dispatch(&ServiceName::new("controlpod.service"), "exit code 5");
        let msg = err.to_string();
        assert!(msg.contains("controlpod.service"));
        assert!(msg.contains("exit code 5"));
    }

    #[test]
    fn audit_error_message() {
        let err = WatchdogError::audit("disk full");
        assert_eq!(err.to_string(), "Audit log unavailable: disk full");
    }
}
