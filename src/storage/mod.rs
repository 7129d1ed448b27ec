//! Storage layer for teller
//!
//! A single SQLite database holds accounts, the transaction log, and the
//! conversation log. `Storage` owns the connection for the life of the
//! process and hands it out in two shapes:
//!
//! - [`Storage::read`] for read-only queries at the database's normal
//!   isolation level
//! - [`Storage::atomic`] for read-modify-write units that either commit as a
//!   whole or leave no trace
//!
//! Repositories are thin borrowing wrappers over a connection (or an open
//! transaction, which derefs to one).

pub mod accounts;
pub mod conversation;
pub mod file_io;
pub mod init;
pub mod schema;
pub mod transactions;

pub use accounts::AccountRepository;
pub use conversation::ConversationRepository;
pub use file_io::write_json_atomic;
pub use init::{initialize_storage, InitReport};
pub use transactions::TransactionRepository;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, Transaction, TransactionBehavior};

use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};

/// Owned handle to the ledger database
pub struct Storage {
    conn: Mutex<Connection>,
    location: String,
}

impl Storage {
    /// Open (or create) the database at `path` and apply migrations
    pub fn open(path: &Path, settings: &Settings) -> LedgerResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                LedgerError::Io(format!("Failed to create directory {}: {}", parent.display(), e))
            })?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=FULL;
             PRAGMA foreign_keys=ON;",
        )?;
        conn.busy_timeout(Duration::from_millis(settings.busy_timeout_ms))?;
        schema::migrate(&conn)?;

        tracing::debug!(path = %path.display(), "opened ledger database");

        Ok(Self {
            conn: Mutex::new(conn),
            location: path.display().to_string(),
        })
    }

    /// Open a private in-memory database (used in tests)
    pub fn open_in_memory() -> LedgerResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        schema::migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            location: ":memory:".to_string(),
        })
    }

    /// Where this database lives, for diagnostics
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Run read-only queries against the last committed state
    pub fn read<T, F>(&self, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&Connection) -> LedgerResult<T>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Run `f` inside one IMMEDIATE transaction
    ///
    /// The write lock is taken before `f` reads anything, so the balance it
    /// validates against is the one it writes over. Commits only when `f`
    /// returns `Ok`; any error (or panic) drops the transaction, which rolls
    /// it back.
    pub(crate) fn atomic<T, F>(&self, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> LedgerResult<T>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Close the database, surfacing any error from the final flush
    pub fn close(self) -> LedgerResult<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|e| LedgerError::StorageUnavailable(format!("Connection poisoned: {}", e)))?;
        conn.close().map_err(|(_, e)| LedgerError::from(e))?;
        tracing::debug!(path = %self.location, "closed ledger database");
        Ok(())
    }

    fn lock(&self) -> LedgerResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            LedgerError::StorageUnavailable(format!("Failed to acquire connection: {}", e))
        })
    }
}

/// Convert a timestamp to its stored form (microseconds since the epoch)
pub(crate) fn to_micros(timestamp: DateTime<Utc>) -> i64 {
    timestamp.timestamp_micros()
}

/// Read a stored timestamp column
pub(crate) fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let micros: i64 = row.get(idx)?;
    DateTime::from_timestamp_micros(micros)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, micros))
}

/// Clamp a LIMIT argument into SQLite's integer range
pub(crate) fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
