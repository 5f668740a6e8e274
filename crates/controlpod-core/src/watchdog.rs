//! Single-shot watchdog run: evaluate, record, recover

use controlpod_host_api::ServiceManager;
use controlpod_store::{AuditEvent, AuditEventType, AuditSink};
use controlpod_util::{Result, WatchdogError, WATCHDOG_SOURCE};
use std::sync::Arc;
use tracing::debug;

use crate::{EvaluationResult, Evaluator, HeartbeatStatus, RecoveryAction};

/// One watchdog invocation wired to its collaborators
pub struct Watchdog {
    evaluator: Evaluator,
    audit: Arc<dyn AuditSink>,
    services: Arc<dyn ServiceManager>,
    dry_run: bool,
}

impl Watchdog {
    pub fn new(
        evaluator: Evaluator,
        audit: Arc<dyn AuditSink>,
        services: Arc<dyn ServiceManager>,
    ) -> Self {
        Self {
            evaluator,
            audit,
            services,
            dry_run: false,
        }
    }

    /// Evaluate and report only; no audit record, no restart
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Run one check.
    ///
    /// Every liveness outcome comes back as `Ok`. An error means the watchdog
    /// itself could not record its decision or could not hand the restart to
    /// the service manager. A failed audit write does not block the restart:
    /// the restart goes out first and the audit error is returned after.
    pub fn run_once(&self) -> Result<EvaluationResult> {
        let result = self.evaluator.evaluate();

        let RecoveryAction::RequestRestart(service) = &result.action else {
            return Ok(result);
        };

        if self.dry_run {
            debug!(
                source = WATCHDOG_SOURCE,
                service = %service,
                status = %result.status,
                "dry run: restart not requested"
            );
            return Ok(result);
        }

        // The evaluator already logged the decision; failures below are
        // reported once, by the caller, through the returned error.
        let audit_outcome = match self.audit_event(&result) {
            Some(event) => self.audit.append_audit(event).map_err(|e| {
                debug!(source = WATCHDOG_SOURCE, error = %e, "failed to record heartbeat decision");
                WatchdogError::audit(e.to_string())
            }),
            None => Ok(()),
        };

        self.services
            .request_restart(service)
            .map_err(|e| WatchdogError::dispatch(service, e.to_string()))?;

        debug!(source = WATCHDOG_SOURCE, service = %service, "restart requested");

        audit_outcome.map(|()| result)
    }

    fn audit_event(&self, result: &EvaluationResult) -> Option<AuditEvent> {
        let path = self.evaluator.marker_path().to_path_buf();
        let event = match result.status {
            HeartbeatStatus::Healthy => {
                debug!("healthy heartbeat is not audited");
                return None;
            }
            HeartbeatStatus::MissingMarker => AuditEventType::HeartbeatMissing { path },
            HeartbeatStatus::UnparsableMarker => AuditEventType::HeartbeatParseFailed {
                path,
                raw: result.raw_timestamp.clone().unwrap_or_default(),
            },
            HeartbeatStatus::Stale => AuditEventType::HeartbeatStale {
                age_seconds: result.age_seconds.unwrap_or_default(),
                max_age_seconds: self.evaluator.max_age_seconds(),
            },
        };
        Some(AuditEvent::at(event, self.evaluator.now()))
    }
}
