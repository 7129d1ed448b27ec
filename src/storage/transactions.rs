//! Transaction log repository
//!
//! Append-only. Records are never updated or deleted; ids come from SQLite's
//! AUTOINCREMENT so they grow strictly in insertion order.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountId, Money, TransactionId, TransactionKind, TransactionRecord};

use super::{sql_limit, timestamp_column, to_micros};

const TRANSACTION_COLUMNS: &str = "id, account_id, kind, amount, timestamp";

/// Repository for the transaction log
pub struct TransactionRepository<'c> {
    conn: &'c Connection,
}

impl<'c> TransactionRepository<'c> {
    /// Wrap a connection (or an open transaction)
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Append one record
    ///
    /// `amount` must already carry the sign its kind implies. Only the ledger
    /// engine appends, inside the same atomic scope as the balance update.
    pub(crate) fn append(
        &self,
        account_id: AccountId,
        kind: TransactionKind,
        amount: Money,
        timestamp: DateTime<Utc>,
    ) -> LedgerResult<TransactionId> {
        if amount.is_zero() || kind.signed(amount.abs()) != amount {
            return Err(LedgerError::InvalidAmount(format!(
                "{} record cannot carry {}",
                kind, amount
            )));
        }

        self.conn.execute(
            "INSERT INTO transactions (account_id, kind, amount, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            params![account_id, kind.as_str(), amount, to_micros(timestamp)],
        )?;

        Ok(TransactionId::from_raw(self.conn.last_insert_rowid()))
    }

    /// The most recent `limit` records of an account, newest first
    pub fn recent(&self, account_id: AccountId, limit: usize) -> LedgerResult<Vec<TransactionRecord>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM transactions WHERE account_id = ?1 ORDER BY id DESC LIMIT ?2",
            TRANSACTION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![account_id, sql_limit(limit)], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Every record of an account, oldest first
    pub fn all_for_account(&self, account_id: AccountId) -> LedgerResult<Vec<TransactionRecord>> {
        let sql = format!(
            "SELECT {} FROM transactions WHERE account_id = ?1 ORDER BY id",
            TRANSACTION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map([account_id], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Sum of every signed amount recorded against an account
    pub fn sum_for_account(&self, account_id: AccountId) -> LedgerResult<Money> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE account_id = ?1",
            [account_id],
            |row| row.get(0),
        )?;
        Ok(Money::from_cents(total))
    }

    /// Number of records for an account
    pub fn count_for_account(&self, account_id: AccountId) -> LedgerResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE account_id = ?1",
            [account_id],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Total number of records in the log
    pub fn count(&self) -> LedgerResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Timestamp of the newest record, if any
    pub fn latest_timestamp(&self) -> LedgerResult<Option<DateTime<Utc>>> {
        let micros: Option<i64> =
            self.conn
                .query_row("SELECT MAX(timestamp) FROM transactions", [], |row| row.get(0))?;

        Ok(micros.and_then(DateTime::from_timestamp_micros))
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<TransactionRecord> {
    let kind: String = row.get(2)?;
    let kind = kind.parse::<TransactionKind>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, e.into())
    })?;

    Ok(TransactionRecord {
        id: row.get(0)?,
        account_id: row.get(1)?,
        kind,
        amount: row.get(3)?,
        timestamp: timestamp_column(row, 4)?,
    })
}
