//! Audit event types

use chrono::{DateTime, Utc};
use controlpod_util::WATCHDOG_SOURCE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Types of audit events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEventType {
    /// Marker file absent or unreadable
    HeartbeatMissing { path: PathBuf },

    /// Marker timestamp could not be parsed
    HeartbeatParseFailed { path: PathBuf, raw: String },

    /// Marker older than the threshold
    HeartbeatStale {
        age_seconds: i64,
        max_age_seconds: u64,
    },
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditEventType::HeartbeatMissing { path } => {
                write!(f, "heartbeat missing ({})", path.display())
            }
            AuditEventType::HeartbeatParseFailed { raw, .. } => {
                write!(f, "heartbeat parse failed: '{}'", raw)
            }
            AuditEventType::HeartbeatStale {
                age_seconds,
                max_age_seconds,
            } => write!(
                f,
                "heartbeat stale ({}s > {}s)",
                age_seconds, max_age_seconds
            ),
        }
    }
}

/// Full audit event with metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event ID
    pub id: i64,

    /// Event timestamp
    pub timestamp: DateTime<Utc>,

    /// Fixed identifier of the emitting component
    pub source: String,

    /// Event type and details
    pub event: AuditEventType,
}

impl AuditEvent {
    /// Event stamped with the watchdog's clock reading
    pub fn at(event: AuditEventType, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: 0, // Will be set by store
            timestamp,
            source: WATCHDOG_SOURCE.to_string(),
            event,
        }
    }
}
