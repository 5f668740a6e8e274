//! In-memory audit log

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use crate::{AuditEvent, AuditSink, StoreError, StoreResult};

/// Audit sink kept in memory, for tests and dry runs
#[derive(Default)]
pub struct MemoryAuditLog {
    events: Mutex<Vec<AuditEvent>>,
    next_id: AtomicI64,
    fail_writes: AtomicBool,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent appends fail, simulating an unavailable sink
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// All events in append order
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemoryAuditLog {
    fn append_audit(&self, mut event: AuditEvent) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("audit sink configured to fail".into()));
        }

        let mut events = self
            .events
            .lock()
            .map_err(|_| StoreError::Unavailable("audit log lock poisoned".into()))?;
        event.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        events.push(event);
        Ok(())
    }

    fn recent_audits(&self, limit: usize) -> StoreResult<Vec<AuditEvent>> {
        let events = self
            .events
            .lock()
            .map_err(|_| StoreError::Unavailable("audit log lock poisoned".into()))?;
        Ok(events.iter().rev().take(limit).cloned().collect())
    }
}
