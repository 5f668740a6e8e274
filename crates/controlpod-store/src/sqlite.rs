//! SQLite-based audit store

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::{AuditEvent, AuditEventType, AuditSink, StoreError, StoreResult};

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path, creating parent directories
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r#"
            -- Audit log (append-only)
            CREATE TABLE IF NOT EXISTS audit_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                source TEXT NOT NULL,
                event_json TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_audit_timestamp ON audit_log(timestamp);
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }
}

impl AuditSink for SqliteStore {
    fn append_audit(&self, mut event: AuditEvent) -> StoreResult<()> {
        let conn = self.lock()?;
        let event_json = serde_json::to_string(&event.event)?;

        conn.execute(
            "INSERT INTO audit_log (timestamp, source, event_json) VALUES (?, ?, ?)",
            params![event.timestamp.to_rfc3339(), event.source, event_json],
        )?;

        event.id = conn.last_insert_rowid();
        debug!(event_id = event.id, "Audit event appended");

        Ok(())
    }

    fn recent_audits(&self, limit: usize) -> StoreResult<Vec<AuditEvent>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT id, timestamp, source, event_json FROM audit_log ORDER BY id DESC LIMIT ?",
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            let id: i64 = row.get(0)?;
            let timestamp_str: String = row.get(1)?;
            let source: String = row.get(2)?;
            let event_json: String = row.get(3)?;
            Ok((id, timestamp_str, source, event_json))
        })?;

        let mut events = Vec::new();
        for row in rows {
            let (id, timestamp_str, source, event_json) = row?;
            let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            let event: AuditEventType = serde_json::from_str(&event_json)?;

            events.push(AuditEvent {
                id,
                timestamp,
                source,
                event,
            });
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn stale(age_seconds: i64) -> AuditEventType {
        AuditEventType::HeartbeatStale {
            age_seconds,
            max_age_seconds: 600,
        }
    }

    #[test]
    fn test_in_memory_store() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.recent_audits(10).unwrap().is_empty());
    }

    #[test]
    fn test_audit_log_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 20, 0).unwrap();

        store.append_audit(AuditEvent::at(stale(1200), at)).unwrap();

        let events = store.recent_audits(10).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, stale(1200));
        assert_eq!(events[0].timestamp, at);
        assert_eq!(events[0].source, "controlpod-watchdog");
        assert!(events[0].id > 0);
    }

    #[test]
    fn test_recent_audits_newest_first_and_limited() {
        let store = SqliteStore::in_memory().unwrap();
        for age in [700, 800, 900] {
            store.append_audit(AuditEvent::at(stale(age), Utc::now())).unwrap();
        }

        let events = store.recent_audits(2).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event, stale(900));
        assert_eq!(events[1].event, stale(800));
    }

    #[test]
    fn test_open_creates_parent_dirs_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("var/lib/controlpod/watchdog-audit.db");

        {
            let store = SqliteStore::open(&db_path).unwrap();
            store
                .append_audit(AuditEvent::at(
                    AuditEventType::HeartbeatMissing {
                        path: PathBuf::from("/run/controlpod/heartbeat"),
                    },
                    Utc::now(),
                ))
                .unwrap();
        }

        let reopened = SqliteStore::open(&db_path).unwrap();
        let events = reopened.recent_audits(10).unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0].event, AuditEventType::HeartbeatMissing { .. }));
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let result = SqliteStore::open(blocker.join("audit.db"));
        assert!(result.is_err());
    }
}
