//! Display formatting for terminal output
//!
//! Tables and detail views for the CLI. The dispatch boundary never uses
//! these; collaborators do their own phrasing.

pub mod account;
pub mod transaction;

pub use account::{format_account_details, format_account_list, format_balance_check};
pub use transaction::format_transaction_register;

use crate::models::ConversationEntry;

/// Format conversation entries, one block per entry
pub fn format_conversation_log(entries: &[ConversationEntry]) -> String {
    if entries.is_empty() {
        return "No conversation entries.".to_string();
    }

    entries
        .iter()
        .map(ConversationEntry::format_human_readable)
        .collect::<Vec<_>>()
        .join("\n")
}
