//! JSON Export functionality
//!
//! Exports one account, its full history, and a balance verification in a
//! single versioned document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::LedgerResult;
use crate::models::{Account, AccountId, TransactionRecord};
use crate::services::QueryService;
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Account history export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub account: Account,

    /// Full history, oldest first
    pub transactions: Vec<TransactionRecord>,

    /// Whether initial balance plus history matches the stored balance
    pub consistent: bool,
}

impl AccountExport {
    /// Gather an account's export from storage
    pub fn from_storage(storage: &Storage, account_id: AccountId) -> LedgerResult<Self> {
        let query = QueryService::new(storage);
        let account = query.get_account(account_id)?;
        let transactions = query.get_all_transactions(account_id)?;
        let check = query.verify_account(account_id)?;

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            account,
            transactions,
            consistent: check.is_consistent(),
        })
    }
}

/// Export one account's history to JSON, returning the record count
pub fn export_history_json<W: Write>(
    storage: &Storage,
    account_id: AccountId,
    writer: W,
    pretty: bool,
) -> LedgerResult<usize> {
    let export = AccountExport::from_storage(storage, account_id)?;
    if pretty {
        serde_json::to_writer_pretty(writer, &export)?;
    } else {
        serde_json::to_writer(writer, &export)?;
    }
    Ok(export.transactions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionKind};
    use crate::services::LedgerService;

    #[test]
    fn test_export_history_json() {
        let storage = Storage::open_in_memory().unwrap();
        let ledger = LedgerService::new(&storage);
        let bob = ledger.create_account("bob", Money::from_cents(4000)).unwrap();
        ledger.deposit(bob.id, Money::from_cents(2550)).unwrap();

        let mut buffer = Vec::new();
        let count = export_history_json(&storage, bob.id, &mut buffer, true).unwrap();
        assert_eq!(count, 1);

        let export: AccountExport = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.account.username, "bob");
        assert_eq!(export.account.balance.cents(), 6550);
        assert_eq!(export.transactions[0].kind, TransactionKind::Deposit);
        assert!(export.consistent);
    }

    #[test]
    fn test_export_unknown_account() {
        let storage = Storage::open_in_memory().unwrap();
        let err = export_history_json(&storage, AccountId::from_raw(3), Vec::new(), false).unwrap_err();
        assert!(err.is_not_found());
    }
}
