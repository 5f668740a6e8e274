//! Audit log for the ControlPod watchdog
//!
//! Provides:
//! - Audit event types (missing, unparsable, stale heartbeat)
//! - The `AuditSink` trait consumed by the watchdog core
//! - SQLite append-only store for the device
//! - In-memory log for tests and dry runs
//! - A failing stand-in when the database cannot be opened

mod audit;
mod memory;
mod sqlite;
mod traits;
mod unavailable;

pub use audit::*;
pub use memory::*;
pub use sqlite::*;
pub use traits::*;
pub use unavailable::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
