//! controlpod-watchdog - ControlPod heartbeat watchdog
//!
//! Single-shot: a systemd timer (or cron) runs this once per interval.
//! It wires together:
//! - Configuration loading (defaults, TOML, env file, environment, flags)
//! - The audit store
//! - The heartbeat evaluator
//! - The systemd service manager
//!
//! Exit status is 0 for every liveness outcome and 1 only when the watchdog
//! itself is broken.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use controlpod_config::{load_settings, LoadOptions, Overrides, WatchdogSettings};
use controlpod_core::{EvaluationResult, Evaluator, HeartbeatStatus, RecoveryAction, Watchdog};
use controlpod_host_api::ServiceManager;
use controlpod_host_linux::SystemdServiceManager;
use controlpod_store::{AuditSink, MemoryAuditLog, SqliteStore, UnavailableAuditSink};
use controlpod_util::{
    default_config_path, default_env_file_path, format_age, is_mock_time_active, WATCHDOG_SOURCE,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// controlpod-watchdog - Restart the ControlPod service when its heartbeat goes stale
#[derive(Parser, Debug)]
#[command(name = "controlpod-watchdog")]
#[command(version, about = "Restart the ControlPod service when its heartbeat goes stale", long_about = None)]
struct Args {
    /// TOML configuration file (default: /etc/controlpod/watchdog.toml, optional)
    #[arg(short, long, env = "CONTROLPOD_WATCHDOG_CONFIG")]
    config: Option<PathBuf>,

    /// KEY=VALUE environment file (default: /etc/controlpod.env, optional)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Heartbeat marker path override
    #[arg(short, long)]
    marker: Option<PathBuf>,

    /// Staleness threshold override, in seconds
    #[arg(long)]
    max_age: Option<u64>,

    /// Service to restart on failure
    #[arg(short, long)]
    service: Option<String>,

    /// Audit database path override
    #[arg(long)]
    audit_db: Option<PathBuf>,

    /// Evaluate and report without recording or restarting
    #[arg(long)]
    dry_run: bool,

    /// Print the N most recent audit records and exit without evaluating
    #[arg(long, value_name = "N")]
    history: Option<usize>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

impl Args {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone().unwrap_or_else(default_config_path),
            config_required: self.config.is_some(),
            env_file: self.env_file.clone().unwrap_or_else(default_env_file_path),
            overrides: Overrides {
                marker_path: self.marker.clone(),
                max_age_seconds: self.max_age,
                service: self.service.clone(),
                audit_db_path: self.audit_db.clone(),
            },
        }
    }
}

fn init_logging(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // Logs go to stderr so stdout carries only the summary line
    match args.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init(),
    }
}

/// Open the audit store. A store that cannot be opened must not stop the
/// heartbeat check, so the open error is deferred to the first append.
fn open_audit(settings: &WatchdogSettings, dry_run: bool) -> Arc<dyn AuditSink> {
    if dry_run {
        return Arc::new(MemoryAuditLog::new());
    }

    match SqliteStore::open(&settings.audit_db_path) {
        Ok(store) => {
            debug!(db_path = %settings.audit_db_path.display(), "Audit store opened");
            Arc::new(store)
        }
        Err(e) => {
            let reason = format!(
                "Failed to open audit database {}: {}",
                settings.audit_db_path.display(),
                e
            );
            debug!(%reason, "Audit store unavailable");
            Arc::new(UnavailableAuditSink::new(reason))
        }
    }
}

fn load(args: &Args) -> Result<WatchdogSettings> {
    let options = args.load_options();
    load_settings(&options, |key| std::env::var(key).ok()).with_context(|| {
        format!(
            "Failed to load configuration ({}, {})",
            options.config_path.display(),
            options.env_file.display()
        )
    })
}

fn build_watchdog(args: &Args, settings: &WatchdogSettings) -> Watchdog {
    debug!(
        marker = %settings.marker_path.display(),
        max_age_seconds = settings.max_age_seconds,
        service = %settings.service,
        dry_run = args.dry_run,
        "Configuration loaded"
    );

    if is_mock_time_active() {
        debug!("Mock time is active; ages are computed against the mocked clock");
    }

    let audit = open_audit(settings, args.dry_run);
    let services: Arc<dyn ServiceManager> = Arc::new(SystemdServiceManager::with_command(
        settings.restart_command.clone(),
    ));
    let evaluator = Evaluator::from_settings(settings);

    Watchdog::new(evaluator, audit, services).dry_run(args.dry_run)
}

fn print_history(settings: &WatchdogSettings, limit: usize) -> Result<()> {
    let store = SqliteStore::open(&settings.audit_db_path).with_context(|| {
        format!(
            "Failed to open audit database {}",
            settings.audit_db_path.display()
        )
    })?;
    let events = store
        .recent_audits(limit)
        .context("Failed to read audit history")?;

    for event in events.iter().rev() {
        println!("{}  {}", event.timestamp.to_rfc3339(), event.event);
    }
    Ok(())
}

fn summary(result: &EvaluationResult, max_age_seconds: u64, dry_run: bool) -> String {
    let detail = match (result.status, result.age_seconds) {
        (HeartbeatStatus::MissingMarker, _) => "no heartbeat marker".to_string(),
        (HeartbeatStatus::UnparsableMarker, _) => format!(
            "unparsable timestamp '{}'",
            result.raw_timestamp.as_deref().unwrap_or_default()
        ),
        (_, Some(age)) => format!(
            "heartbeat age {} (limit {})",
            format_age(age),
            format_age(i64::try_from(max_age_seconds).unwrap_or(i64::MAX))
        ),
        (_, None) => "no age".to_string(),
    };

    match &result.action {
        RecoveryAction::None => format!("{}: {}", result.status, detail),
        RecoveryAction::RequestRestart(service) if dry_run => {
            format!("{}: {}; would restart {}", result.status, detail, service)
        }
        RecoveryAction::RequestRestart(service) => {
            format!("{}: {}; restart requested for {}", result.status, detail, service)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let settings = load(args)?;
    if let Some(limit) = args.history {
        return print_history(&settings, limit);
    }

    let watchdog = build_watchdog(args, &settings);
    let max_age_seconds = watchdog.evaluator().max_age_seconds();

    let result = watchdog.run_once().context("Watchdog run failed")?;

    println!("{}", summary(&result, max_age_seconds, args.dry_run));
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    debug!(version = env!("CARGO_PKG_VERSION"), "controlpod-watchdog starting");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = format!("{e:#}");
            error!(source = WATCHDOG_SOURCE, error = %message, "Watchdog failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use controlpod_util::ServiceName;

    fn result(status: HeartbeatStatus, age: Option<i64>, restart: bool) -> EvaluationResult {
        EvaluationResult {
            status,
            age_seconds: age,
            action: if restart {
                RecoveryAction::RequestRestart(ServiceName::new("controlpod.service"))
            } else {
                RecoveryAction::None
            },
            raw_timestamp: None,
        }
    }

    #[test]
    fn args_need_nothing() {
        let args = Args::try_parse_from(["controlpod-watchdog"]).unwrap();
        assert!(!args.dry_run);
        assert_eq!(args.log_format, LogFormat::Text);

        let options = args.load_options();
        assert_eq!(options.env_file, default_env_file_path());
        assert_eq!(options.overrides.max_age_seconds, None);
    }

    #[test]
    fn flags_become_overrides() {
        let args = Args::try_parse_from([
            "controlpod-watchdog",
            "--config",
            "/tmp/w.toml",
            "--marker",
            "/tmp/hb",
            "--max-age",
            "30",
            "--service",
            "pod.service",
            "--dry-run",
            "--log-format",
            "json",
        ])
        .unwrap();

        let options = args.load_options();
        assert!(options.config_required);
        assert_eq!(options.config_path, PathBuf::from("/tmp/w.toml"));
        assert_eq!(options.overrides.marker_path, Some(PathBuf::from("/tmp/hb")));
        assert_eq!(options.overrides.max_age_seconds, Some(30));
        assert_eq!(options.overrides.service.as_deref(), Some("pod.service"));
        assert!(args.dry_run);
        assert_eq!(args.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_negative_threshold() {
        assert!(Args::try_parse_from(["controlpod-watchdog", "--max-age", "-5"]).is_err());
    }

    #[test]
    fn summary_lines() {
        assert_eq!(
            summary(&result(HeartbeatStatus::Healthy, Some(300), false), 600, false),
            "healthy: heartbeat age 5m 0s (limit 10m 0s)"
        );
        assert_eq!(
            summary(&result(HeartbeatStatus::Stale, Some(1200), true), 600, false),
            "stale: heartbeat age 20m 0s (limit 10m 0s); restart requested for controlpod.service"
        );
        assert_eq!(
            summary(&result(HeartbeatStatus::MissingMarker, None, true), 600, true),
            "missing: no heartbeat marker; would restart controlpod.service"
        );
    }
}
