//! Account CLI commands
//!
//! Implements CLI commands for account management.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::account::{format_account_details, format_account_list, format_balance_check};
use crate::error::LedgerResult;
use crate::services::{LedgerService, QueryService};
use crate::storage::Storage;

use super::parse_amount;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Username (stored lower-case)
        username: String,
        /// Initial balance (e.g., "100.00" or "100")
        #[arg(short, long, default_value = "0")]
        balance: String,
    },
    /// List all accounts
    List,
    /// Show account details
    Show {
        /// Username or ID
        account: String,
    },
    /// Check stored balances against transaction history
    Verify {
        /// Username or ID (all accounts when omitted)
        account: Option<String>,
    },
}

/// Handle an account command
pub fn handle_account_command(
    storage: &Storage,
    settings: &Settings,
    cmd: AccountCommands,
) -> LedgerResult<()> {
    let query = QueryService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        AccountCommands::Create { username, balance } => {
            let initial_balance = parse_amount(&balance)?;
            let account = LedgerService::new(storage).create_account(&username, initial_balance)?;

            println!("Created account: {}", account.username);
            println!("  Balance: {}", account.balance.format_with_symbol(symbol));
            println!("  ID: {}", account.id);
        }

        AccountCommands::List => {
            let accounts = query.list_accounts()?;
            println!("{}", format_account_list(&accounts, symbol));
        }

        AccountCommands::Show { account } => {
            let found = query.find_required(&account)?;
            let summary = query.get_account_summary(found.id)?;
            print!("{}", format_account_details(&summary, symbol));
        }

        AccountCommands::Verify { account } => {
            let checks = match account {
                Some(account) => {
                    let found = query.find_required(&account)?;
                    vec![query.verify_account(found.id)?]
                }
                None => query.verify_all()?,
            };

            if checks.is_empty() {
                println!("No accounts found.");
            }
            for check in &checks {
                println!("{}", format_balance_check(check, symbol));
            }

            let drifted = checks.iter().filter(|c| !c.is_consistent()).count();
            if drifted > 0 {
                tracing::warn!(drifted, "balance verification found drift");
            }
        }
    }

    Ok(())
}
