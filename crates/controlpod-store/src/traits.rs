//! Store trait definitions

use std::sync::Arc;

use crate::{AuditEvent, StoreResult};

/// Destination for watchdog decision records
pub trait AuditSink: Send + Sync {
    /// Append an audit event
    fn append_audit(&self, event: AuditEvent) -> StoreResult<()>;

    /// Get recent audit events, newest first
    fn recent_audits(&self, limit: usize) -> StoreResult<Vec<AuditEvent>>;
}

impl<T: AuditSink + ?Sized> AuditSink for Arc<T> {
    fn append_audit(&self, event: AuditEvent) -> StoreResult<()> {
        (**self).append_audit(event)
    }

    fn recent_audits(&self, limit: usize) -> StoreResult<Vec<AuditEvent>> {
        (**self).recent_audits(limit)
    }
}
