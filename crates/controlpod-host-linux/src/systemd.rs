//! systemd-backed service manager

use controlpod_host_api::{HostError, HostResult, ServiceManager};
use controlpod_util::{default_restart_command, ServiceName};
use tracing::debug;

use crate::process::run_in_own_session;

/// Placeholder substituted with the unit name in the restart command
pub const SERVICE_PLACEHOLDER: &str = "{service}";

/// Requests restarts from systemd
///
/// The default command is `systemctl restart --no-block {service}`: systemd
/// queues the restart job and returns at once, so the watchdog never waits
/// for the controlled service to come back.
pub struct SystemdServiceManager {
    command: Vec<String>,
}

impl SystemdServiceManager {
    pub fn new() -> Self {
        Self::with_command(default_restart_command())
    }

    /// Use a custom restart command. Every `{service}` placeholder is
    /// replaced with the unit name; without one, the name is appended.
    pub fn with_command(command: Vec<String>) -> Self {
        Self { command }
    }

    /// Build the argv for restarting `service`
    pub fn render(&self, service: &ServiceName) -> Vec<String> {
        let mut argv: Vec<String> = self
            .command
            .iter()
            .map(|arg| arg.replace(SERVICE_PLACEHOLDER, service.as_str()))
            .collect();

        if !self.command.iter().any(|arg| arg.contains(SERVICE_PLACEHOLDER)) {
            argv.push(service.to_string());
        }

        argv
    }
}

impl Default for SystemdServiceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceManager for SystemdServiceManager {
    fn request_restart(&self, service: &ServiceName) -> HostResult<()> {
        let argv = self.render(service);
        debug!(service = %service, argv = ?argv, "Dispatching restart request");

        let outcome = run_in_own_session(&argv)?;
        if outcome.is_success() {
            return Ok(());
        }

        debug!(
            service = %service,
            code = ?outcome.code,
            signal = ?outcome.signal,
            stderr = %outcome.stderr,
            "Service manager rejected restart request"
        );
        Err(HostError::RestartRejected {
            code: outcome.code,
            stderr: outcome.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_render_uses_systemctl_no_block() {
        let manager = SystemdServiceManager::new();
        let argv = manager.render(&ServiceName::new("controlpod.service"));
        assert_eq!(
            argv,
            vec!["systemctl", "restart", "--no-block", "controlpod.service"]
        );
    }

    #[test]
    fn render_appends_name_without_placeholder() {
        let manager = SystemdServiceManager::with_command(command(&["sv", "restart"]));
        let argv = manager.render(&ServiceName::new("controlpod"));
        assert_eq!(argv, vec!["sv", "restart", "controlpod"]);
    }

    #[test]
    fn accepted_request_is_ok() {
        let manager = SystemdServiceManager::with_command(command(&["true", "{service}"]));
        manager
            .request_restart(&ServiceName::new("controlpod.service"))
            .unwrap();
    }

    #[test]
    fn substituted_name_reaches_command() {
        let manager = SystemdServiceManager::with_command(command(&[
            "sh",
            "-c",
            "test \"$0\" = pump.service",
            "{service}",
        ]));
        manager.request_restart(&ServiceName::new("pump.service")).unwrap();

        let result = manager.request_restart(&ServiceName::new("other.service"));
        assert!(matches!(result, Err(HostError::RestartRejected { code: Some(1), .. })));
    }

    #[test]
    fn rejected_request_carries_stderr() {
        let manager = SystemdServiceManager::with_command(command(&[
            "sh",
            "-c",
            "echo \"Unit $0 not found.\" >&2; exit 5",
            "{service}",
        ]));
        match manager.request_restart(&ServiceName::new("ghost.service")) {
            Err(HostError::RestartRejected { code, stderr }) => {
                assert_eq!(code, Some(5));
                assert_eq!(stderr, "Unit ghost.service not found.");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn missing_program_is_spawn_failure() {
        let manager =
            SystemdServiceManager::with_command(command(&["/nonexistent/systemctl", "{service}"]));
        let result = manager.request_restart(&ServiceName::new("controlpod.service"));
        assert!(matches!(result, Err(HostError::SpawnFailed(_))));
    }
}
