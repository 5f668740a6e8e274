//! Staleness evaluation

use chrono::{DateTime, Utc};
use controlpod_config::WatchdogSettings;
use controlpod_util::{Clock, ServiceName, SystemClock, WATCHDOG_SOURCE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{parse_flexible, read_marker, timestamp_field, TimestampParser};

/// Liveness verdict for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeartbeatStatus {
    Healthy,
    MissingMarker,
    UnparsableMarker,
    Stale,
}

impl HeartbeatStatus {
    /// Whether the controlled service must be restarted
    pub fn needs_recovery(self) -> bool {
        !matches!(self, HeartbeatStatus::Healthy)
    }
}

impl fmt::Display for HeartbeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            HeartbeatStatus::Healthy => "healthy",
            HeartbeatStatus::MissingMarker => "missing",
            HeartbeatStatus::UnparsableMarker => "unparsable",
            HeartbeatStatus::Stale => "stale",
        };
        f.write_str(text)
    }
}

/// What the watchdog should do about the verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    None,
    RequestRestart(ServiceName),
}

/// Outcome of a single evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationResult {
    pub status: HeartbeatStatus,

    /// Present only when a timestamp was parsed; negative for future markers
    pub age_seconds: Option<i64>,

    pub action: RecoveryAction,

    /// The candidate timestamp text, when the marker could be read
    pub raw_timestamp: Option<String>,
}

impl EvaluationResult {
    fn healthy(age_seconds: i64, raw: String) -> Self {
        Self {
            status: HeartbeatStatus::Healthy,
            age_seconds: Some(age_seconds),
            action: RecoveryAction::None,
            raw_timestamp: Some(raw),
        }
    }

    fn recover(
        status: HeartbeatStatus,
        service: &ServiceName,
        age_seconds: Option<i64>,
        raw_timestamp: Option<String>,
    ) -> Self {
        Self {
            status,
            age_seconds,
            action: RecoveryAction::RequestRestart(service.clone()),
            raw_timestamp,
        }
    }
}

/// Decides whether the heartbeat marker proves the service is alive
pub struct Evaluator {
    marker_path: PathBuf,
    max_age_seconds: u64,
    service: ServiceName,
    clock: Arc<dyn Clock>,
    parser: Box<dyn TimestampParser>,
}

impl Evaluator {
    /// Evaluator on the system clock with the flexible parser
    pub fn new(
        marker_path: impl Into<PathBuf>,
        max_age_seconds: u64,
        service: ServiceName,
    ) -> Self {
        Self {
            marker_path: marker_path.into(),
            max_age_seconds,
            service,
            clock: Arc::new(SystemClock),
            parser: Box::new(parse_flexible),
        }
    }

    pub fn from_settings(settings: &WatchdogSettings) -> Self {
        Self::new(
            settings.marker_path.clone(),
            settings.max_age_seconds,
            settings.service.clone(),
        )
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_parser(mut self, parser: impl TimestampParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    pub fn marker_path(&self) -> &Path {
        &self.marker_path
    }

    pub fn max_age_seconds(&self) -> u64 {
        self.max_age_seconds
    }

    pub fn service(&self) -> &ServiceName {
        &self.service
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Evaluate the marker once. Liveness failures are results, never errors.
    pub fn evaluate(&self) -> EvaluationResult {
        let content = match read_marker(&self.marker_path) {
            Ok(content) => content,
            Err(err) => {
                warn!(
                    source = WATCHDOG_SOURCE,
                    path = %self.marker_path.display(),
                    error = %err,
                    "heartbeat missing"
                );
                return EvaluationResult::recover(
                    HeartbeatStatus::MissingMarker,
                    &self.service,
                    None,
                    None,
                );
            }
        };

        let raw = timestamp_field(&content).to_string();

        let Some(stamped) = self.parser.parse(&raw) else {
            warn!(
                source = WATCHDOG_SOURCE,
                path = %self.marker_path.display(),
                raw = %raw,
                "heartbeat parse failed: '{}'",
                raw
            );
            return EvaluationResult::recover(
                HeartbeatStatus::UnparsableMarker,
                &self.service,
                None,
                Some(raw),
            );
        };

        let age_seconds = (self.clock.now() - stamped).num_seconds();

        // Strictly greater: a marker exactly at the threshold is still fresh
        if age_seconds > self.threshold() {
            warn!(
                source = WATCHDOG_SOURCE,
                age_seconds,
                max_age_seconds = self.max_age_seconds,
                "heartbeat stale ({}s > {}s)",
                age_seconds,
                self.max_age_seconds
            );
            return EvaluationResult::recover(
                HeartbeatStatus::Stale,
                &self.service,
                Some(age_seconds),
                Some(raw),
            );
        }

        debug!(
            source = WATCHDOG_SOURCE,
            age_seconds,
            max_age_seconds = self.max_age_seconds,
            "heartbeat fresh"
        );
        EvaluationResult::healthy(age_seconds, raw)
    }

    fn threshold(&self) -> i64 {
        i64::try_from(self.max_age_seconds).unwrap_or(i64::MAX)
    }
}
