//! Shared process state.
//!
//! `CoreState` is built once at startup and shared behind an `Arc` by
//! every request handler. It owns the single SQLite connection; each
//! store operation holds the lock for its whole read-then-write sequence.

use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::analysis::{MockAnalyzer, RiskAnalyzer};
use crate::config::ServerConfig;
use crate::db::{self, DatabaseError};
use crate::uploads::UploadStore;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("State lock poisoned")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

pub struct CoreState {
    db: Mutex<Connection>,
    analyzer: Box<dyn RiskAnalyzer>,
    uploads: UploadStore,
}

impl CoreState {
    pub fn new(conn: Connection, analyzer: Box<dyn RiskAnalyzer>, uploads: UploadStore) -> Self {
        Self {
            db: Mutex::new(conn),
            analyzer,
            uploads,
        }
    }

    /// Open the configured database (running migrations) with the mock analyzer.
    pub fn open(config: &ServerConfig) -> Result<Self, CoreError> {
        let conn = db::open_database(&config.database_path)?;
        Ok(Self::new(
            conn,
            Box::new(MockAnalyzer),
            UploadStore::new(&config.upload_dir, &config.public_base_url),
        ))
    }

    /// Acquire the connection. Handlers keep the guard for one operation only.
    pub fn lock_db(&self) -> Result<MutexGuard<'_, Connection>, CoreError> {
        self.db.lock().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn analyzer(&self) -> &dyn RiskAnalyzer {
        self.analyzer.as_ref()
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.uploads
    }
}

#[cfg(test)]
impl CoreState {
    /// In-memory database, given analyzer, uploads under `upload_dir`.
    pub fn for_tests(analyzer: Box<dyn RiskAnalyzer>, upload_dir: &std::path::Path) -> Self {
        let conn = db::open_memory_database().unwrap();
        Self::new(conn, analyzer, UploadStore::new(upload_dir, "http://localhost:8000"))
    }
}
