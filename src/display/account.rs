//! Account display formatting
//!
//! Formats accounts for terminal output in table and detail views.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Account, Money};
use crate::services::{AccountSummary, BalanceCheck};

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Opened")]
    opened: String,
}

/// Format a list of accounts as a table
pub fn format_account_list(accounts: &[Account], symbol: &str) -> String {
    if accounts.is_empty() {
        return "No accounts found.".to_string();
    }

    let rows = accounts.iter().map(|account| AccountRow {
        id: account.id.to_string(),
        username: account.username.clone(),
        balance: account.balance.format_with_symbol(symbol),
        opened: account.created_at.format("%Y-%m-%d").to_string(),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());

    let total = match Money::checked_sum(accounts.iter().map(|a| a.balance)) {
        Some(total) => total.format_with_symbol(symbol),
        None => "out of range".to_string(),
    };
    format!("{}\n\n{} account(s), total {}", table, accounts.len(), total)
}

/// Format a single account's details
pub fn format_account_details(summary: &AccountSummary, symbol: &str) -> String {
    let account = &summary.account;

    let mut output = String::new();
    output.push_str(&format!("Account: {}\n", account.username));
    output.push_str(&format!("  ID:               {}\n", account.id));
    output.push_str(&format!(
        "  Current Balance:  {}\n",
        account.balance.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Initial Balance:  {}\n",
        account.initial_balance.format_with_symbol(symbol)
    ));
    output.push('\n');
    output.push_str(&format!("  Transactions:     {}\n", summary.transaction_count));
    output.push_str(&format!(
        "  Money In:         {}\n",
        summary.total_in.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Money Out:        {}\n",
        summary.total_out.format_with_symbol(symbol)
    ));
    if let Some(at) = summary.last_activity {
        output.push_str(&format!(
            "  Last Activity:    {}\n",
            at.format("%Y-%m-%d %H:%M UTC")
        ));
    }
    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        account.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

/// Format the outcome of a balance verification
pub fn format_balance_check(check: &BalanceCheck, symbol: &str) -> String {
    if check.is_consistent() {
        format!(
            "{} ({}): consistent at {}",
            check.username,
            check.account_id,
            check.materialized.format_with_symbol(symbol)
        )
    } else {
        let drift = check
            .drift()
            .map(|d| d.format_with_symbol(symbol))
            .unwrap_or_else(|| "out of range".to_string());
        format!(
            "{} ({}): DRIFT {} (stored {}, history {})",
            check.username,
            check.account_id,
            drift,
            check.materialized.format_with_symbol(symbol),
            check.reconstructed.format_with_symbol(symbol)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountId;
    use chrono::Utc;

    fn create_test_account(id: i64, name: &str, cents: i64) -> Account {
        Account {
            id: AccountId::from_raw(id),
            username: name.to_string(),
            balance: Money::from_cents(cents),
            initial_balance: Money::zero(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_account_list_total_overflow() {
        let accounts = vec![
            create_test_account(1, "alice", i64::MAX),
            create_test_account(2, "bob", 1),
        ];

        let output = format_account_list(&accounts, "$");
        assert!(output.contains("2 account(s), total out of range"));
    }

    #[test]
    fn test_format_account_list() {
        let accounts = vec![
            create_test_account(1, "alice", 6000),
            create_test_account(2, "bob", 4000),
        ];

        let output = format_account_list(&accounts, "$");
        assert!(output.contains("Username"));
        assert!(output.contains("alice"));
        assert!(output.contains("acc-2"));
        assert!(output.contains("$40.00"));
        assert!(output.contains("total $100.00"));
    }

    #[test]
    fn test_format_empty_list() {
        assert_eq!(format_account_list(&[], "$"), "No accounts found.");
    }

    #[test]
    fn test_format_account_details() {
        let summary = AccountSummary {
            account: create_test_account(1, "alice", 6000),
            transaction_count: 1,
            total_in: Money::zero(),
            total_out: Money::from_cents(4000),
            last_activity: Some(Utc::now()),
        };

        let output = format_account_details(&summary, "€");
        assert!(output.contains("Account: alice"));
        assert!(output.contains("€60.00"));
        assert!(output.contains("Money Out:        €40.00"));
    }

    #[test]
    fn test_format_balance_check() {
        let mut check = BalanceCheck {
            account_id: AccountId::from_raw(1),
            username: "alice".into(),
            materialized: Money::from_cents(6000),
            reconstructed: Money::from_cents(6000),
        };
        assert!(format_balance_check(&check, "$").contains("consistent at $60.00"));

        check.reconstructed = Money::from_cents(7000);
        let output = format_balance_check(&check, "$");
        assert!(output.contains("DRIFT -$10.00"));
    }
}
