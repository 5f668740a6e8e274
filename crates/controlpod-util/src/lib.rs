//! Shared utilities for the ControlPod watchdog
//!
//! This crate provides:
//! - Service name type for the supervised unit
//! - Wall-clock abstraction (real, fixed, and debug mock time)
//! - Error types
//! - Default paths and environment variable names

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;

/// Source identifier attached to every decision record the watchdog emits
pub const WATCHDOG_SOURCE: &str = "controlpod-watchdog";
