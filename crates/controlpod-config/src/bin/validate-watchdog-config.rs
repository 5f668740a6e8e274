//! Config validation CLI tool
//!
//! Resolves the watchdog configuration exactly as the watchdog would and
//! reports the effective settings or the errors.

use controlpod_config::{load_settings, ConfigError, LoadOptions, CURRENT_CONFIG_VERSION};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        let defaults = LoadOptions::default();
        eprintln!("Usage: validate-watchdog-config [config-file] [env-file]");
        eprintln!();
        eprintln!("Validates the ControlPod watchdog configuration.");
        eprintln!();
        eprintln!("Defaults:");
        eprintln!("  config-file: {}", defaults.config_path.display());
        eprintln!("  env-file:    {}", defaults.env_file.display());
        return ExitCode::from(2);
    }

    let mut options = LoadOptions::default();
    if let Some(path) = args.get(1) {
        options.config_path = PathBuf::from(path);
        options.config_required = true;
    }
    if let Some(path) = args.get(2) {
        options.env_file = PathBuf::from(path);
    }

    match load_settings(&options, |key| std::env::var(key).ok()) {
        Ok(settings) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Resolved settings:");
            println!("  Config version:  {}", CURRENT_CONFIG_VERSION);
            println!("  Marker path:     {}", settings.marker_path.display());
            println!("  Max age:         {}s", settings.max_age_seconds);
            println!("  Service:         {}", settings.service);
            println!("  Restart command: {}", settings.restart_command.join(" "));
            println!("  Audit database:  {}", settings.audit_db_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                ConfigError::InvalidEnv { key, value } => {
                    eprintln!("Invalid environment value {}='{}'", key, value);
                }
                ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver, CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
