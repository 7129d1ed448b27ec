//! Account repository
//!
//! Reads and writes rows of the `accounts` table. Username uniqueness and the
//! non-negative balance rule are enforced by the schema, so a violation here
//! surfaces as an error rather than a corrupted row.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{normalize_username, Account, AccountId, Money, NewAccount};

use super::{timestamp_column, to_micros};

const ACCOUNT_COLUMNS: &str = "id, username, balance, initial_balance, created_at";

/// Repository for account persistence
pub struct AccountRepository<'c> {
    conn: &'c Connection,
}

impl<'c> AccountRepository<'c> {
    /// Wrap a connection (or an open transaction)
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Insert a validated account
    ///
    /// Fails with `DuplicateUsername` if the normalized name is taken.
    pub fn insert(&self, new: &NewAccount, created_at: DateTime<Utc>) -> LedgerResult<Account> {
        let result = self.conn.execute(
            "INSERT INTO accounts (username, balance, initial_balance, created_at)
             VALUES (?1, ?2, ?2, ?3)",
            params![new.username, new.initial_balance, to_micros(created_at)],
        );

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(LedgerError::DuplicateUsername {
                    username: new.username.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        let id = AccountId::from_raw(self.conn.last_insert_rowid());
        self.get(id)?
            .ok_or_else(|| LedgerError::StorageUnavailable(format!("Inserted account {} vanished", id)))
    }

    /// Get an account by ID
    pub fn get(&self, id: AccountId) -> LedgerResult<Option<Account>> {
        let sql = format!("SELECT {} FROM accounts WHERE id = ?1", ACCOUNT_COLUMNS);
        Ok(self.conn.query_row(&sql, [id], row_to_account).optional()?)
    }

    /// Get an account by username (normalized before lookup)
    pub fn get_by_username(&self, username: &str) -> LedgerResult<Option<Account>> {
        let normalized = normalize_username(username);
        if normalized.is_empty() {
            return Ok(None);
        }

        let sql = format!("SELECT {} FROM accounts WHERE username = ?1", ACCOUNT_COLUMNS);
        Ok(self
            .conn
            .query_row(&sql, [normalized], row_to_account)
            .optional()?)
    }

    /// Get all accounts in creation order
    pub fn list(&self) -> LedgerResult<Vec<Account>> {
        let sql = format!("SELECT {} FROM accounts ORDER BY id", ACCOUNT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let accounts = stmt
            .query_map([], row_to_account)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(accounts)
    }

    /// Count accounts
    pub fn count(&self) -> LedgerResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Overwrite the materialized balance
    ///
    /// Only the ledger engine calls this, and only inside an atomic scope
    /// that also appends the matching transaction record.
    pub(crate) fn set_balance(&self, id: AccountId, balance: Money) -> LedgerResult<()> {
        let updated = self.conn.execute(
            "UPDATE accounts SET balance = ?1 WHERE id = ?2",
            params![balance, id],
        )?;

        if updated == 0 {
            return Err(LedgerError::account_not_found(id.to_string()));
        }
        Ok(())
    }
}

fn row_to_account(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        username: row.get(1)?,
        balance: row.get(2)?,
        initial_balance: row.get(3)?,
        created_at: timestamp_column(row, 4)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
