//! Query service
//!
//! Read-only accessors for collaborators. Nothing here takes the write lock
//! or participates in a ledger operation's atomic scope, so a balance read
//! here is advisory: a later withdrawal re-validates against whatever has
//! committed by then.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountId, Money, TransactionRecord};
use crate::storage::{AccountRepository, Storage, TransactionRepository};

/// Service for read-only ledger queries
pub struct QueryService<'a> {
    storage: &'a Storage,
}

/// Summary of an account with computed fields
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub account: Account,
    /// Number of records in the account's history
    pub transaction_count: usize,
    /// Sum of credits (deposits and incoming transfers)
    pub total_in: Money,
    /// Sum of debits as a positive amount
    pub total_out: Money,
    /// Timestamp of the newest record, if any
    pub last_activity: Option<DateTime<Utc>>,
}

/// Result of reconciling a materialized balance against its history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceCheck {
    pub account_id: AccountId,
    pub username: String,
    /// Balance stored on the account row
    pub materialized: Money,
    /// Initial balance plus every recorded amount
    pub reconstructed: Money,
}

impl BalanceCheck {
    pub fn is_consistent(&self) -> bool {
        self.materialized == self.reconstructed
    }

    /// Materialized minus reconstructed, `None` if that overflows
    pub fn drift(&self) -> Option<Money> {
        self.materialized.checked_sub(self.reconstructed)
    }
}

impl<'a> QueryService<'a> {
    /// Create a new query service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Current balance of an account
    pub fn get_balance(&self, account_id: AccountId) -> LedgerResult<Money> {
        self.get_account(account_id).map(|account| account.balance)
    }

    /// Most recent records of an account, newest first
    ///
    /// An account with no history yields an empty list; an unknown account
    /// is `NotFound`.
    pub fn get_recent_transactions(
        &self,
        account_id: AccountId,
        limit: usize,
    ) -> LedgerResult<Vec<TransactionRecord>> {
        self.storage.read(|conn| {
            require_account(conn, account_id)?;
            TransactionRepository::new(conn).recent(account_id, limit)
        })
    }

    /// Every record of an account, oldest first
    pub fn get_all_transactions(&self, account_id: AccountId) -> LedgerResult<Vec<TransactionRecord>> {
        self.storage.read(|conn| {
            require_account(conn, account_id)?;
            TransactionRepository::new(conn).all_for_account(account_id)
        })
    }

    /// Resolve a username to its account
    pub fn resolve_user(&self, username: &str) -> LedgerResult<Account> {
        self.storage
            .read(|conn| AccountRepository::new(conn).get_by_username(username))?
            .ok_or_else(|| LedgerError::account_not_found(username.trim()))
    }

    /// Get an account by ID
    pub fn get_account(&self, account_id: AccountId) -> LedgerResult<Account> {
        self.storage.read(|conn| require_account(conn, account_id))
    }

    /// Find an account by username or ID string
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Account>> {
        self.storage.read(|conn| {
            let accounts = AccountRepository::new(conn);

            // Try by username first
            if let Some(account) = accounts.get_by_username(identifier)? {
                return Ok(Some(account));
            }

            // Try parsing as ID
            if let Ok(id) = identifier.trim().parse::<AccountId>() {
                return accounts.get(id);
            }

            Ok(None)
        })
    }

    /// Like `find`, but an unknown identifier is `NotFound`
    pub fn find_required(&self, identifier: &str) -> LedgerResult<Account> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::account_not_found(identifier.trim()))
    }

    /// All accounts in creation order
    pub fn list_accounts(&self) -> LedgerResult<Vec<Account>> {
        self.storage.read(|conn| AccountRepository::new(conn).list())
    }

    /// Account with totals computed from its history
    pub fn get_account_summary(&self, account_id: AccountId) -> LedgerResult<AccountSummary> {
        self.storage.read(|conn| {
            let account = require_account(conn, account_id)?;
            let records = TransactionRepository::new(conn).all_for_account(account_id)?;

            let overflow = || {
                LedgerError::StorageUnavailable(format!("Totals of {} overflow", account_id))
            };
            let mut total_in = Money::zero();
            let mut total_out = Money::zero();
            for record in &records {
                if record.is_inflow() {
                    total_in = total_in.checked_add(record.amount).ok_or_else(overflow)?;
                } else {
                    total_out = total_out.checked_add(record.amount.abs()).ok_or_else(overflow)?;
                }
            }

            Ok(AccountSummary {
                account,
                transaction_count: records.len(),
                total_in,
                total_out,
                last_activity: records.last().map(|r| r.timestamp),
            })
        })
    }

    /// Recompute an account's balance from its history
    pub fn verify_account(&self, account_id: AccountId) -> LedgerResult<BalanceCheck> {
        self.storage.read(|conn| {
            let account = require_account(conn, account_id)?;
            check_balance(conn, account)
        })
    }

    /// Recompute every account's balance from its history
    pub fn verify_all(&self) -> LedgerResult<Vec<BalanceCheck>> {
        self.storage.read(|conn| {
            AccountRepository::new(conn)
                .list()?
                .into_iter()
                .map(|account| check_balance(conn, account))
                .collect()
        })
    }
}

fn require_account(conn: &Connection, account_id: AccountId) -> LedgerResult<Account> {
    AccountRepository::new(conn)
        .get(account_id)?
        .ok_or_else(|| LedgerError::account_not_found(account_id.to_string()))
}

fn check_balance(conn: &Connection, account: Account) -> LedgerResult<BalanceCheck> {
    let recorded = TransactionRepository::new(conn).sum_for_account(account.id)?;
    let reconstructed = account.initial_balance.checked_add(recorded).ok_or_else(|| {
        LedgerError::StorageUnavailable(format!("History of {} overflows", account.id))
    })?;

    Ok(BalanceCheck {
        account_id: account.id,
        username: account.username,
        materialized: account.balance,
        reconstructed,
    })
}
