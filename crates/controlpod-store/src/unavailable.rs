//! Stand-in for an audit store that could not be opened

use crate::{AuditEvent, AuditSink, StoreError, StoreResult};

/// Audit sink whose every operation fails with the original open error
///
/// Lets the watchdog still evaluate and recover when the database is
/// unreachable; the failure surfaces when a decision needs recording.
#[derive(Debug, Clone)]
pub struct UnavailableAuditSink {
    reason: String,
}

impl UnavailableAuditSink {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl AuditSink for UnavailableAuditSink {
    fn append_audit(&self, _event: AuditEvent) -> StoreResult<()> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }

    fn recent_audits(&self, _limit: usize) -> StoreResult<Vec<AuditEvent>> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuditEventType;
    use chrono::Utc;
    use std::path::PathBuf;

    #[test]
    fn every_operation_reports_the_reason() {
        let sink = UnavailableAuditSink::new("read-only file system");
        let event = AuditEvent::at(
            AuditEventType::HeartbeatMissing {
                path: PathBuf::from("/run/controlpod/heartbeat"),
            },
            Utc::now(),
        );

        match sink.append_audit(event) {
            Err(StoreError::Unavailable(reason)) => assert_eq!(reason, "read-only file system"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(
            sink.recent_audits(5),
            Err(StoreError::Unavailable(_))
        ));
    }
}
