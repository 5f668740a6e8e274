//! Linux service manager for the ControlPod watchdog
//!
//! Provides:
//! - Restart dispatch through `systemctl restart --no-block`
//! - One-shot command execution in a fresh session with stderr capture

mod process;
mod systemd;

pub use process::*;
pub use systemd::*;
