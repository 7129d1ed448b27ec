//! CSV Export functionality
//!
//! Exports an account's transaction history, oldest first, one record per row.

use serde::Serialize;
use std::io::Write;

use crate::error::LedgerResult;
use crate::models::{AccountId, TransactionRecord};
use crate::services::QueryService;
use crate::storage::Storage;

#[derive(Serialize)]
struct CsvRow<'r> {
    id: i64,
    account_id: i64,
    timestamp: String,
    kind: &'r str,
    amount: String,
}

impl<'r> From<&'r TransactionRecord> for CsvRow<'r> {
    fn from(record: &'r TransactionRecord) -> Self {
        Self {
            id: record.id.raw(),
            account_id: record.account_id.raw(),
            timestamp: record.timestamp.to_rfc3339(),
            kind: record.kind.as_str(),
            amount: record.amount.to_decimal_string(),
        }
    }
}

/// Write records as CSV with a header row
pub fn write_records_csv<W: Write>(records: &[TransactionRecord], writer: W) -> LedgerResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(CsvRow::from(record))?;
    }
    if records.is_empty() {
        csv_writer.write_record(["id", "account_id", "timestamp", "kind", "amount"])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Export one account's full history to CSV, returning the row count
pub fn export_history_csv<W: Write>(
    storage: &Storage,
    account_id: AccountId,
    writer: W,
) -> LedgerResult<usize> {
    let records = QueryService::new(storage).get_all_transactions(account_id)?;
    write_records_csv(&records, writer)?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::services::LedgerService;

    #[test]
    fn test_export_history_csv() {
        let storage = Storage::open_in_memory().unwrap();
        let ledger = LedgerService::new(&storage);
        let alice = ledger.create_account("alice", Money::from_cents(10000)).unwrap();
        ledger.create_account("bob", Money::zero()).unwrap();
        ledger.transfer("alice", "bob", Money::from_cents(4000)).unwrap();
        ledger.deposit(alice.id, Money::from_cents(55)).unwrap();

        let mut buffer = Vec::new();
        let count = export_history_csv(&storage, alice.id, &mut buffer).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "id,account_id,timestamp,kind,amount");
        assert!(lines[1].ends_with(",transfer_out,-40.00"));
        assert!(lines[2].ends_with(",deposit,0.55"));
    }

    #[test]
    fn test_empty_history_still_has_header() {
        let mut buffer = Vec::new();
        write_records_csv(&[], &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "id,account_id,timestamp,kind,amount\n"
        );
    }
}
