//! Heartbeat evaluation and recovery decision for the ControlPod watchdog
//!
//! This crate is the heart of the watchdog, containing:
//! - Marker reading and timestamp-field extraction
//! - Flexible, injectable timestamp parsing
//! - Staleness evaluation (Healthy / MissingMarker / UnparsableMarker / Stale)
//! - The single-shot run: record the decision, request one restart

mod evaluator;
mod marker;
mod timestamp;
mod watchdog;

pub use evaluator::*;
pub use marker::*;
pub use timestamp::*;
pub use watchdog::*;
