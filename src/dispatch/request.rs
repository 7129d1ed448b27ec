//! Structured requests from collaborators
//!
//! Collaborators parse free text themselves; what reaches the ledger is
//! already a named operation with typed references and an amount.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LedgerError, LedgerResult};
use crate::models::money::decimal;
use crate::models::{AccountId, Money};
use crate::services::Party;

/// Operations the ledger accepts at its boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Deposit,
    #[serde(alias = "withdraw")]
    Withdrawal,
    Transfer,
    CreateAccount,
    GetBalance,
    GetHistory,
}

/// An account named by numeric id or by username
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountRef {
    Id(i64),
    Username(String),
}

impl AccountRef {
    pub fn username(name: impl Into<String>) -> Self {
        Self::Username(name.into())
    }

    pub fn id(id: AccountId) -> Self {
        Self::Id(id.raw())
    }

    /// Borrow as a transfer party
    pub fn as_party(&self) -> Party<'_> {
        match self {
            Self::Id(id) => Party::Id(AccountId::from_raw(*id)),
            Self::Username(name) => Party::Username(name.as_str()),
        }
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", AccountId::from_raw(*id)),
            Self::Username(name) => f.write_str(name.trim()),
        }
    }
}

/// A pre-parsed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRequest {
    pub operation: Operation,

    pub account_ref: AccountRef,

    #[serde(default, with = "decimal::option", skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty_ref: Option<AccountRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl LedgerRequest {
    pub fn new(operation: Operation, account_ref: AccountRef) -> Self {
        Self {
            operation,
            account_ref,
            amount: None,
            counterparty_ref: None,
            limit: None,
        }
    }

    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_counterparty(mut self, counterparty: AccountRef) -> Self {
        self.counterparty_ref = Some(counterparty);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Parse a request from JSON
    ///
    /// A malformed `amount` is reported as `InvalidAmount`; any other shape
    /// problem is `InvalidRequest`.
    pub fn from_json(text: &str) -> LedgerResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| LedgerError::InvalidRequest(e.to_string()))?;

        if let Some(amount) = value.get("amount").filter(|v| !v.is_null()) {
            decimal::deserialize(amount).map_err(|e| LedgerError::InvalidAmount(e.to_string()))?;
        }

        serde_json::from_value(value).map_err(|e| LedgerError::InvalidRequest(e.to_string()))
    }

    /// The amount, which this operation requires
    pub(crate) fn required_amount(&self) -> LedgerResult<Money> {
        self.amount
            .ok_or_else(|| LedgerError::InvalidAmount("An amount is required".into()))
    }

    /// The counterparty, which this operation requires
    pub(crate) fn required_counterparty(&self) -> LedgerResult<&AccountRef> {
        self.counterparty_ref
            .as_ref()
            .ok_or_else(|| LedgerError::InvalidRequest("A counterparty is required".into()))
    }
}
