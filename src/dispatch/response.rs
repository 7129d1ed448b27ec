//! Structured results returned to collaborators
//!
//! Values carry data, never prose; collaborators phrase replies from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, LedgerError};
use crate::models::money::decimal;
use crate::models::{Account, AccountId, Money, TransactionKind, TransactionRecord};

/// An account as seen across the boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub account_id: AccountId,
    pub username: String,
    #[serde(with = "decimal")]
    pub balance: Money,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            account_id: account.id,
            username: account.username,
            balance: account.balance,
        }
    }
}

/// A balance reading or the balance left after a deposit or withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceView {
    pub account_id: AccountId,
    #[serde(with = "decimal")]
    pub balance: Money,
}

/// One transaction record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub transaction_id: i64,
    pub account_id: AccountId,
    pub kind: TransactionKind,
    #[serde(with = "decimal")]
    pub amount: Money,
    pub timestamp: DateTime<Utc>,
}

impl From<TransactionRecord> for RecordView {
    fn from(record: TransactionRecord) -> Self {
        Self {
            transaction_id: record.id.raw(),
            account_id: record.account_id,
            kind: record.kind,
            amount: record.amount,
            timestamp: record.timestamp,
        }
    }
}

/// Payload of a successful response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Account(AccountView),
    Balance(BalanceView),
    History(Vec<RecordView>),
}

/// Error half of a response: a stable kind and a message safe to relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&LedgerError> for ResponseError {
    fn from(err: &LedgerError) -> Self {
        let kind = err.kind();
        let message = match kind {
            // Storage and internal details stay in the logs
            ErrorKind::StorageUnavailable => "The ledger is temporarily unavailable".to_string(),
            ErrorKind::Internal => "The ledger could not complete the request".to_string(),
            _ => err.to_string(),
        };
        Self { kind, message }
    }
}

/// `{ok, value?, error?}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerResponse {
    pub ok: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ResponseValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

impl LedgerResponse {
    pub fn success(value: ResponseValue) -> Self {
        Self {
            ok: true,
            value: Some(value),
            error: None,
        }
    }

    /// Success with nothing to report (transfers)
    pub fn done() -> Self {
        Self {
            ok: true,
            value: None,
            error: None,
        }
    }

    pub fn failure(err: &LedgerError) -> Self {
        Self {
            ok: false,
            value: None,
            error: Some(ResponseError::from(err)),
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}
