//! Money movement and history CLI commands

use crate::config::Settings;
use crate::display::format_transaction_register;
use crate::error::LedgerResult;
use crate::models::normalize_username;
use crate::services::{LedgerService, QueryService};
use crate::storage::Storage;

use super::parse_amount;

/// Handle `deposit <account> <amount>`
pub fn handle_deposit(
    storage: &Storage,
    settings: &Settings,
    account: &str,
    amount: &str,
) -> LedgerResult<()> {
    let amount = parse_amount(amount)?;
    let found = QueryService::new(storage).find_required(account)?;
    let balance = LedgerService::new(storage).deposit(found.id, amount)?;

    println!(
        "Deposited {} to {}. New balance: {}",
        amount.format_with_symbol(&settings.currency_symbol),
        found.username,
        balance.format_with_symbol(&settings.currency_symbol)
    );
    Ok(())
}

/// Handle `withdraw <account> <amount>`
pub fn handle_withdraw(
    storage: &Storage,
    settings: &Settings,
    account: &str,
    amount: &str,
) -> LedgerResult<()> {
    let amount = parse_amount(amount)?;
    let found = QueryService::new(storage).find_required(account)?;
    let balance = LedgerService::new(storage).withdraw(found.id, amount)?;

    println!(
        "Withdrew {} from {}. New balance: {}",
        amount.format_with_symbol(&settings.currency_symbol),
        found.username,
        balance.format_with_symbol(&settings.currency_symbol)
    );
    Ok(())
}

/// Handle `transfer <from> <to> <amount>`
pub fn handle_transfer(
    storage: &Storage,
    settings: &Settings,
    from: &str,
    to: &str,
    amount: &str,
) -> LedgerResult<()> {
    let amount = parse_amount(amount)?;
    LedgerService::new(storage).transfer(from, to, amount)?;

    println!(
        "Transferred {} from {} to {}.",
        amount.format_with_symbol(&settings.currency_symbol),
        normalize_username(from),
        normalize_username(to)
    );
    Ok(())
}

/// Handle `balance <account>`
pub fn handle_balance(storage: &Storage, settings: &Settings, account: &str) -> LedgerResult<()> {
    let query = QueryService::new(storage);
    let found = query.find_required(account)?;
    let balance = query.get_balance(found.id)?;

    println!(
        "{}: {}",
        found.username,
        balance.format_with_symbol(&settings.currency_symbol)
    );
    Ok(())
}

/// Handle `history <account> [--limit N]`
pub fn handle_history(
    storage: &Storage,
    settings: &Settings,
    account: &str,
    limit: Option<usize>,
) -> LedgerResult<()> {
    let query = QueryService::new(storage);
    let found = query.find_required(account)?;
    let records = query.get_recent_transactions(found.id, settings.effective_limit(limit))?;

    println!("Recent transactions for {}:", found.username);
    println!(
        "{}",
        format_transaction_register(&records, &settings.currency_symbol)
    );
    Ok(())
}
