//! Database schema and migrations
//!
//! The schema version is tracked in `PRAGMA user_version`. Constraints that
//! protect ledger invariants (unique usernames, non-negative balances, known
//! transaction kinds) live here so they hold even if application code is
//! bypassed.

use rusqlite::Connection;

use crate::error::LedgerResult;

/// Current schema version
pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA_V1: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    username        TEXT    NOT NULL UNIQUE,
    balance         INTEGER NOT NULL DEFAULT 0 CHECK (balance >= 0),
    initial_balance INTEGER NOT NULL DEFAULT 0 CHECK (initial_balance >= 0),
    created_at      INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS transactions (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id INTEGER NOT NULL REFERENCES accounts(id),
    kind       TEXT    NOT NULL
               CHECK (kind IN ('deposit', 'withdrawal', 'transfer_out', 'transfer_in')),
    amount     INTEGER NOT NULL CHECK (amount <> 0),
    timestamp  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_account
    ON transactions(account_id, id);

CREATE TABLE IF NOT EXISTS conversation (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id INTEGER REFERENCES accounts(id),
    input      TEXT    NOT NULL,
    output     TEXT    NOT NULL,
    intent     TEXT    NOT NULL,
    confidence REAL,
    timestamp  INTEGER NOT NULL
);
";

/// Bring the database up to `SCHEMA_VERSION`
pub fn migrate(conn: &Connection) -> LedgerResult<()> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if version < 1 {
        tracing::debug!(from = version, to = 1, "applying schema migration");
        conn.execute_batch(SCHEMA_V1)?;
        conn.pragma_update(None, "user_version", 1)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();

        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_negative_balance_rejected_by_schema() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO accounts (username, balance, initial_balance, created_at)
             VALUES ('alice', -1, 0, 0)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_kind_rejected_by_schema() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn.execute(
            "INSERT INTO accounts (username, balance, initial_balance, created_at)
             VALUES ('alice', 0, 0, 0)",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO transactions (account_id, kind, amount, timestamp)
             VALUES (1, 'transfer_to_bob', -5, 0)",
            [],
        );
        assert!(result.is_err());
    }
}
