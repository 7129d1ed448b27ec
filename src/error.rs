//! Error types for the ledger
//!
//! Every ledger operation returns a typed `LedgerError`. The variants carry
//! only what a caller needs to phrase a reply; none of them embed another
//! account's balance.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Money;

/// Which side of an operation failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// The single account of a deposit, withdrawal, or query
    Account,
    /// The sending side of a transfer
    Sender,
    /// The receiving side of a transfer
    Recipient,
    /// Neither side of a transfer exists
    Both,
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account => write!(f, "Account"),
            Self::Sender => write!(f, "Sender account"),
            Self::Recipient => write!(f, "Recipient account"),
            Self::Both => write!(f, "Sender and recipient accounts"),
        }
    }
}

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Non-positive, overflowing, or malformed amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Empty or malformed username
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Username already taken
    #[error("Username already exists: {username}")]
    DuplicateUsername { username: String },

    /// Account resolution failure
    #[error("{role} not found: {identifier}")]
    NotFound {
        role: AccountRole,
        identifier: String,
    },

    /// Withdrawal or transfer exceeds the balance
    #[error("Insufficient funds for {requested}")]
    InsufficientFunds { requested: Money },

    /// Source and destination are the same account
    #[error("Cannot transfer to the same account: {0}")]
    SelfTransfer(String),

    /// Structured request that cannot be dispatched
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Underlying persistence failure
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

/// Stable, serializable classification of a `LedgerError`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidAmount,
    InvalidUsername,
    DuplicateUsername,
    NotFound,
    InsufficientFunds,
    SelfTransfer,
    InvalidRequest,
    StorageUnavailable,
    Internal,
}

impl LedgerError {
    /// Create a "not found" error for a single-account operation
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            role: AccountRole::Account,
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for one side of a transfer
    pub fn party_not_found(role: AccountRole, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            role,
            identifier: identifier.into(),
        }
    }

    /// Classify this error for the request boundary
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount(_) => ErrorKind::InvalidAmount,
            Self::InvalidUsername(_) => ErrorKind::InvalidUsername,
            Self::DuplicateUsername { .. } => ErrorKind::DuplicateUsername,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::SelfTransfer(_) => ErrorKind::SelfTransfer,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
            Self::Config(_) | Self::Io(_) | Self::Json(_) | Self::Export(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_names_the_side() {
        let err = LedgerError::party_not_found(AccountRole::Recipient, "bob");
        assert_eq!(err.to_string(), "Recipient account not found: bob");
        assert!(err.is_not_found());
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_insufficient_funds_reports_only_request() {
        let err = LedgerError::InsufficientFunds {
            requested: Money::from_cents(100000),
        };
        assert_eq!(err.to_string(), "Insufficient funds for $1000.00");
    }

    #[test]
    fn test_ambient_errors_are_internal() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LedgerError = io_err.into();
        assert!(matches!(err, LedgerError::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_sqlite_errors_map_to_storage_unavailable() {
        let err: LedgerError = rusqlite::Error::InvalidQuery.into();
        assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::InsufficientFunds).unwrap();
        assert_eq!(json, "\"insufficient_funds\"");
    }
}
