//! One-shot command execution

use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::process::{Command, Stdio};
use tracing::debug;

use controlpod_host_api::{HostError, HostResult};

/// Exit of a one-shot command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Exit code (None if killed by signal)
    pub code: Option<i32>,

    /// Signal that terminated the command, if any
    pub signal: Option<i32>,

    /// Captured stderr, trimmed
    pub stderr: String,
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Run `argv` to completion in its own session
///
/// The command becomes the leader of a new session so that stopping the
/// unit that runs the watchdog does not take the command down with it.
/// stdin and stdout are discarded; stderr is captured for diagnostics.
pub fn run_in_own_session(argv: &[String]) -> HostResult<CommandOutcome> {
    let Some((program, args)) = argv.split_first() else {
        return Err(HostError::InvalidCommand("Empty argv".into()));
    };
    if program.is_empty() {
        return Err(HostError::InvalidCommand("Empty program name".into()));
    }

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    // SAFETY: setsid is async-signal-safe and touches no shared state
    unsafe {
        cmd.pre_exec(|| {
            nix::unistd::setsid().map_err(std::io::Error::from)?;
            Ok(())
        });
    }

    let output = cmd
        .output()
        .map_err(|e| HostError::SpawnFailed(format!("Failed to spawn {}: {}", program, e)))?;

    let outcome = CommandOutcome {
        code: output.status.code(),
        signal: output.status.signal(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    };

    debug!(
        program = %program,
        code = ?outcome.code,
        signal = ?outcome.signal,
        "Command finished"
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn run_true_succeeds() {
        let outcome = run_in_own_session(&argv(&["true"])).unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.signal, None);
    }

    #[test]
    fn run_false_reports_exit_code() {
        let outcome = run_in_own_session(&argv(&["false"])).unwrap();
        assert!(!outcome.is_success());
        assert_eq!(outcome.code, Some(1));
    }

    #[test]
    fn stderr_is_captured() {
        let outcome =
            run_in_own_session(&argv(&["sh", "-c", "echo 'unit not found' >&2; exit 5"])).unwrap();
        assert_eq!(outcome.code, Some(5));
        assert_eq!(outcome.stderr, "unit not found");
    }

    #[test]
    fn missing_program_fails_to_spawn() {
        let result = run_in_own_session(&argv(&["/nonexistent/controlpod-restart"]));
        assert!(matches!(result, Err(HostError::SpawnFailed(_))));
    }

    #[test]
    fn empty_argv_is_invalid() {
        assert!(matches!(run_in_own_session(&[]), Err(HostError::InvalidCommand(_))));
        assert!(matches!(
            run_in_own_session(&argv(&[""])),
            Err(HostError::InvalidCommand(_))
        ));
    }
}
