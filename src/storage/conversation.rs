//! Conversation log repository

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::error::LedgerResult;
use crate::models::{ConversationEntry, ConversationId, NewConversationEntry};

use super::{sql_limit, timestamp_column, to_micros};

/// Repository for conversation entries
pub struct ConversationRepository<'c> {
    conn: &'c Connection,
}

impl<'c> ConversationRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Store one exchange
    pub fn insert(
        &self,
        entry: &NewConversationEntry,
        timestamp: DateTime<Utc>,
    ) -> LedgerResult<ConversationId> {
        self.conn.execute(
            "INSERT INTO conversation (account_id, input, output, intent, confidence, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.account_id,
                entry.input,
                entry.output,
                entry.intent,
                entry.confidence,
                to_micros(timestamp)
            ],
        )?;

        Ok(ConversationId::from_raw(self.conn.last_insert_rowid()))
    }

    /// The most recent `limit` entries, newest first
    pub fn recent(&self, limit: usize) -> LedgerResult<Vec<ConversationEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, account_id, input, output, intent, confidence, timestamp
             FROM conversation ORDER BY id DESC LIMIT ?1",
        )?;
        let entries = stmt
            .query_map([sql_limit(limit)], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn count(&self) -> LedgerResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM conversation", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<ConversationEntry> {
    Ok(ConversationEntry {
        id: row.get(0)?,
        account_id: row.get(1)?,
        input: row.get(2)?,
        output: row.get(3)?,
        intent: row.get(4)?,
        confidence: row.get(5)?,
        timestamp: timestamp_column(row, 6)?,
    })
}
