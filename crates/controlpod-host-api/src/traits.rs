//! Service-manager traits

use controlpod_util::ServiceName;
use std::sync::Arc;
use thiserror::Error;

/// Errors from dispatching a recovery action
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Restart command is invalid: {0}")]
    InvalidCommand(String),

    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Service manager rejected restart (exit {}): {stderr}", .code.map_or_else(|| "by signal".to_string(), |c| c.to_string()))]
    RestartRejected { code: Option<i32>, stderr: String },
}

pub type HostResult<T> = Result<T, HostError>;

/// The collaborator that actually restarts the controlled service
///
/// A request is fire-and-forget: `Ok(())` means the service manager
/// accepted the request, not that the service is back up.
pub trait ServiceManager: Send + Sync {
    /// Ask the service manager to restart `service`
    fn request_restart(&self, service: &ServiceName) -> HostResult<()>;
}

impl<T: ServiceManager + ?Sized> ServiceManager for Arc<T> {
    fn request_restart(&self, service: &ServiceName) -> HostResult<()> {
        (**self).request_restart(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_error_shows_exit_code() {
        let err = HostError::RestartRejected {
            code: Some(5),
            stderr: "Unit controlpod.service not found.".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit 5"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn rejected_error_by_signal() {
        let err = HostError::RestartRejected {
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("by signal"));
    }
}
