//! Ledger service
//!
//! The only writer of balances and transaction records. Deposit, withdrawal,
//! and transfer each run as one atomic storage scope: the balance they
//! validate against is read inside the same write-locked transaction that
//! updates it, and the balance update commits together with its log records
//! or not at all.

use chrono::{DateTime, Utc};
use rusqlite::Transaction;

use crate::error::{AccountRole, LedgerError, LedgerResult};
use crate::models::{
    normalize_username, Account, AccountId, AccountValidationError, Money, NewAccount,
    TransactionKind,
};
use crate::storage::{AccountRepository, Storage, TransactionRepository};

/// Service for money movement and account creation
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

/// One side of a transfer as the caller named it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party<'r> {
    Username(&'r str),
    Id(AccountId),
}

impl Party<'_> {
    fn resolve(&self, accounts: &AccountRepository<'_>) -> LedgerResult<Option<Account>> {
        match self {
            Self::Username(name) => accounts.get_by_username(name),
            Self::Id(id) => accounts.get(*id),
        }
    }

    /// Whether both references name one account before resolution
    fn same_as(&self, other: &Party<'_>) -> bool {
        match (self, other) {
            (Self::Username(a), Party::Username(b)) => normalize_username(a) == normalize_username(b),
            (Self::Id(a), Party::Id(b)) => a == b,
            _ => false,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Username(name) => normalize_username(name),
            Self::Id(id) => id.to_string(),
        }
    }
}

impl<'a> LedgerService<'a> {
    /// Create a new ledger service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Open an account with an optional starting balance
    pub fn create_account(&self, username: &str, initial_balance: Money) -> LedgerResult<Account> {
        let new = NewAccount::new(username, initial_balance).map_err(|e| match e {
            AccountValidationError::NegativeInitialBalance(_) => {
                LedgerError::InvalidAmount(e.to_string())
            }
            _ => LedgerError::InvalidUsername(e.to_string()),
        });
        let new = rejected("create_account", new)?;

        let result = self
            .storage
            .atomic(|tx| AccountRepository::new(tx).insert(&new, Utc::now()));
        let account = rejected("create_account", result)?;

        tracing::info!(
            account_id = %account.id,
            username = %account.username,
            initial_balance = %account.initial_balance,
            "account created"
        );
        Ok(account)
    }

    /// Credit an account, returning the new balance
    pub fn deposit(&self, account_id: AccountId, amount: Money) -> LedgerResult<Money> {
        rejected("deposit", validate_amount(amount))?;

        let result = self.storage.atomic(|tx| {
            let accounts = AccountRepository::new(tx);
            let account = accounts
                .get(account_id)?
                .ok_or_else(|| LedgerError::account_not_found(account_id.to_string()))?;

            let new_balance = account
                .balance
                .checked_add(amount)
                .ok_or_else(|| LedgerError::InvalidAmount(format!("{} exceeds the account limit", amount)))?;

            let at = write_timestamp(tx)?;
            accounts.set_balance(account_id, new_balance)?;
            let txn_id = TransactionRepository::new(tx).append(
                account_id,
                TransactionKind::Deposit,
                TransactionKind::Deposit.signed(amount),
                at,
            )?;
            Ok((new_balance, txn_id))
        });
        let (new_balance, txn_id) = rejected("deposit", result)?;

        tracing::info!(%account_id, %amount, %txn_id, "deposit committed");
        Ok(new_balance)
    }

    /// Debit an account, returning the new balance
    ///
    /// Fails with `InsufficientFunds` rather than overdrawing; there are no
    /// partial withdrawals.
    pub fn withdraw(&self, account_id: AccountId, amount: Money) -> LedgerResult<Money> {
        rejected("withdraw", validate_amount(amount))?;

        let result = self.storage.atomic(|tx| {
            let accounts = AccountRepository::new(tx);
            let account = accounts
                .get(account_id)?
                .ok_or_else(|| LedgerError::account_not_found(account_id.to_string()))?;

            let new_balance = debit(&account, amount)?;

            let at = write_timestamp(tx)?;
            accounts.set_balance(account_id, new_balance)?;
            let txn_id = TransactionRepository::new(tx).append(
                account_id,
                TransactionKind::Withdrawal,
                TransactionKind::Withdrawal.signed(amount),
                at,
            )?;
            Ok((new_balance, txn_id))
        });
        let (new_balance, txn_id) = rejected("withdraw", result)?;

        tracing::info!(%account_id, %amount, %txn_id, "withdrawal committed");
        Ok(new_balance)
    }

    /// Move money between two accounts named by username
    ///
    /// Returns nothing on success; callers that want balances ask for them.
    pub fn transfer(&self, from_username: &str, to_username: &str, amount: Money) -> LedgerResult<()> {
        self.transfer_parties(Party::Username(from_username), Party::Username(to_username), amount)
    }

    /// Move money between two accounts named by id
    pub fn transfer_between(&self, from: AccountId, to: AccountId, amount: Money) -> LedgerResult<()> {
        self.transfer_parties(Party::Id(from), Party::Id(to), amount)
    }

    /// Move money between two accounts named either way
    pub fn transfer_parties(&self, from: Party<'_>, to: Party<'_>, amount: Money) -> LedgerResult<()> {
        let checked = validate_amount(amount).and_then(|()| {
            for party in [from, to] {
                if let Party::Username(name) = party {
                    if normalize_username(name).is_empty() {
                        return Err(LedgerError::InvalidUsername(
                            "Transfer parties must be named".into(),
                        ));
                    }
                }
            }
            if from.same_as(&to) {
                return Err(LedgerError::SelfTransfer(from.describe()));
            }
            Ok(())
        });
        rejected("transfer", checked)?;

        self.execute_transfer(from, to, amount)
    }

    fn execute_transfer(&self, from: Party<'_>, to: Party<'_>, amount: Money) -> LedgerResult<()> {
        let result = self.storage.atomic(|tx| {
            let accounts = AccountRepository::new(tx);
            let sender = from.resolve(&accounts)?;
            let recipient = to.resolve(&accounts)?;

            let (sender, recipient) = match (sender, recipient) {
                (Some(s), Some(r)) => (s, r),
                (None, None) => {
                    return Err(LedgerError::party_not_found(
                        AccountRole::Both,
                        format!("{}, {}", from.describe(), to.describe()),
                    ))
                }
                (None, Some(_)) => {
                    return Err(LedgerError::party_not_found(AccountRole::Sender, from.describe()))
                }
                (Some(_), None) => {
                    return Err(LedgerError::party_not_found(AccountRole::Recipient, to.describe()))
                }
            };

            // Different references can still name one account
            if sender.id == recipient.id {
                return Err(LedgerError::SelfTransfer(sender.username));
            }

            let sender_balance = debit(&sender, amount)?;
            let recipient_balance = recipient
                .balance
                .checked_add(amount)
                .ok_or_else(|| LedgerError::InvalidAmount(format!("{} exceeds the account limit", amount)))?;

            let at = write_timestamp(tx)?;
            let log = TransactionRepository::new(tx);

            accounts.set_balance(sender.id, sender_balance)?;
            accounts.set_balance(recipient.id, recipient_balance)?;
            let out_id = log.append(
                sender.id,
                TransactionKind::TransferOut,
                TransactionKind::TransferOut.signed(amount),
                at,
            )?;
            let in_id = log.append(
                recipient.id,
                TransactionKind::TransferIn,
                TransactionKind::TransferIn.signed(amount),
                at,
            )?;

            Ok((sender.id, recipient.id, out_id, in_id))
        });
        let (from_id, to_id, out_id, in_id) = rejected("transfer", result)?;

        tracing::info!(
            from = %from_id,
            to = %to_id,
            %amount,
            transfer_out = %out_id,
            transfer_in = %in_id,
            "transfer committed"
        );
        Ok(())
    }
}

fn validate_amount(amount: Money) -> LedgerResult<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(LedgerError::InvalidAmount(format!(
            "Amount must be positive, got {}",
            amount
        )))
    }
}

fn debit(account: &Account, amount: Money) -> LedgerResult<Money> {
    if amount > account.balance {
        return Err(LedgerError::InsufficientFunds { requested: amount });
    }
    account
        .balance
        .checked_sub(amount)
        .ok_or(LedgerError::InsufficientFunds { requested: amount })
}

/// Timestamp for every record written by one operation
///
/// Never earlier than the newest record already in the log, so timestamps
/// stay non-decreasing in insertion order even if the wall clock steps back.
fn write_timestamp(tx: &Transaction<'_>) -> LedgerResult<DateTime<Utc>> {
    let now = Utc::now();
    let latest = TransactionRepository::new(tx).latest_timestamp()?;
    Ok(latest.map_or(now, |latest| latest.max(now)))
}

/// Log a refused or failed operation on its way back to the caller
fn rejected<T>(operation: &'static str, result: LedgerResult<T>) -> LedgerResult<T> {
    if let Err(e) = &result {
        match e {
            LedgerError::StorageUnavailable(_) => {
                tracing::error!(operation, error = %e, "ledger operation failed")
            }
            _ => tracing::warn!(operation, kind = ?e.kind(), error = %e, "ledger operation rejected"),
        }
    }
    result
}
