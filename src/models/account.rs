//! Account model
//!
//! An account is a uniquely named holder of a balance. Usernames are
//! normalized (trimmed, lower-cased) before every insert and lookup so that
//! "Alice " and "alice" can never become two accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::money::Money;

/// Maximum username length after normalization
pub const MAX_USERNAME_LEN: usize = 64;

/// Normalize a username for storage and comparison
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A ledger account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned identifier
    pub id: AccountId,

    /// Normalized username, unique across the ledger
    pub username: String,

    /// Materialized current balance, never negative
    pub balance: Money,

    /// Balance the account was opened with
    pub initial_balance: Money,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.username, self.id)
    }
}

/// A validated request to open an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub initial_balance: Money,
}

impl NewAccount {
    /// Normalize and validate the inputs of "create account"
    pub fn new(raw_username: &str, initial_balance: Money) -> Result<Self, AccountValidationError> {
        let username = normalize_username(raw_username);

        if username.is_empty() {
            return Err(AccountValidationError::EmptyUsername);
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(AccountValidationError::UsernameTooLong(username.chars().count()));
        }
        if username.chars().any(|c| c.is_control()) {
            return Err(AccountValidationError::ControlCharacters);
        }
        if initial_balance.is_negative() {
            return Err(AccountValidationError::NegativeInitialBalance(initial_balance));
        }

        Ok(Self {
            username,
            initial_balance,
        })
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyUsername,
    UsernameTooLong(usize),
    ControlCharacters,
    NegativeInitialBalance(Money),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "Username cannot be empty"),
            Self::UsernameTooLong(len) => {
                write!(f, "Username too long ({} chars, max {})", len, MAX_USERNAME_LEN)
            }
            Self::ControlCharacters => write!(f, "Username cannot contain control characters"),
            Self::NegativeInitialBalance(amount) => {
                write!(f, "Initial balance cannot be negative: {}", amount)
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  Alice "), "alice");
        assert_eq!(normalize_username("BOB"), "bob");
    }

    #[test]
    fn test_new_account_normalizes() {
        let new = NewAccount::new(" Alice", Money::from_cents(10000)).unwrap();
        assert_eq!(new.username, "alice");
        assert_eq!(new.initial_balance.cents(), 10000);
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            NewAccount::new("   ", Money::zero()),
            Err(AccountValidationError::EmptyUsername)
        );
        assert!(matches!(
            NewAccount::new(&"a".repeat(65), Money::zero()),
            Err(AccountValidationError::UsernameTooLong(65))
        ));
        assert_eq!(
            NewAccount::new("ali\nce", Money::zero()),
            Err(AccountValidationError::ControlCharacters)
        );
        assert!(matches!(
            NewAccount::new("alice", Money::from_cents(-1)),
            Err(AccountValidationError::NegativeInitialBalance(_))
        ));
    }

    #[test]
    fn test_display() {
        let account = Account {
            id: AccountId::from_raw(1),
            username: "alice".into(),
            balance: Money::zero(),
            initial_balance: Money::zero(),
            created_at: Utc::now(),
        };
        assert_eq!(account.to_string(), "alice (acc-1)");
    }
}
