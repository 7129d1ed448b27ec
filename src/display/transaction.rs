//! Transaction display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::TransactionRecord;

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Format transaction records as a register, in the order given
pub fn format_transaction_register(records: &[TransactionRecord], symbol: &str) -> String {
    if records.is_empty() {
        return "No transactions found.".to_string();
    }

    let rows = records.iter().map(|record| RecordRow {
        id: record.id.to_string(),
        when: record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        kind: record.kind.to_string(),
        amount: record.amount.format_with_symbol(symbol),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}
