//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod conversation;
pub mod exec;
pub mod export;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use conversation::{handle_conversation_command, ConversationCommands};
pub use exec::handle_exec;
pub use export::{handle_export, ExportFormat};
pub use transaction::{
    handle_balance, handle_deposit, handle_history, handle_transfer, handle_withdraw,
};

use crate::error::{LedgerError, LedgerResult};
use crate::models::Money;

/// Parse an amount typed on the command line
pub(crate) fn parse_amount(input: &str) -> LedgerResult<Money> {
    Money::parse(input).map_err(|e| LedgerError::InvalidAmount(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("25.50").unwrap().cents(), 2550);
        assert_eq!(parse_amount("$40").unwrap().cents(), 4000);
        assert_eq!(parse_amount("1.999").unwrap_err().kind(), ErrorKind::InvalidAmount);
        assert_eq!(parse_amount("ten").unwrap_err().kind(), ErrorKind::InvalidAmount);
    }
}
