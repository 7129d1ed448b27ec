//! Transaction model
//!
//! Immutable records of balance-affecting events. A transfer is recorded as a
//! `transfer_out` on the sender and a `transfer_in` on the recipient, written
//! together in one atomic scope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{AccountId, TransactionId};
use super::money::Money;

/// Kind of balance-affecting event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    TransferOut,
    TransferIn,
}

impl TransactionKind {
    /// All kinds, in schema order
    pub const ALL: [TransactionKind; 4] = [
        Self::Deposit,
        Self::Withdrawal,
        Self::TransferOut,
        Self::TransferIn,
    ];

    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::TransferOut => "transfer_out",
            Self::TransferIn => "transfer_in",
        }
    }

    /// Whether records of this kind carry a positive amount
    pub fn is_credit(&self) -> bool {
        matches!(self, Self::Deposit | Self::TransferIn)
    }

    /// Apply the sign rule to a positive magnitude
    pub fn signed(&self, magnitude: Money) -> Money {
        if self.is_credit() {
            magnitude
        } else {
            -magnitude
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown transaction kind: {}", s))
    }
}

/// One immutable entry in the transaction log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Monotonically increasing identifier
    pub id: TransactionId,

    /// Owning account
    pub account_id: AccountId,

    /// What happened
    pub kind: TransactionKind,

    /// Signed amount (positive for deposit/transfer_in)
    pub amount: Money,

    /// Commit time, non-decreasing in insertion order
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    /// Check if this is an inflow (positive amount)
    pub fn is_inflow(&self) -> bool {
        self.amount.is_positive()
    }

    pub fn is_transfer(&self) -> bool {
        matches!(self.kind, TransactionKind::TransferIn | TransactionKind::TransferOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_rule() {
        let amount = Money::from_cents(4000);
        assert_eq!(TransactionKind::Deposit.signed(amount).cents(), 4000);
        assert_eq!(TransactionKind::TransferIn.signed(amount).cents(), 4000);
        assert_eq!(TransactionKind::Withdrawal.signed(amount).cents(), -4000);
        assert_eq!(TransactionKind::TransferOut.signed(amount).cents(), -4000);
    }

    #[test]
    fn test_kind_string_forms_agree() {
        for kind in TransactionKind::ALL {
            assert_eq!(kind.as_str().parse::<TransactionKind>().unwrap(), kind);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert!("transfer".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_is_transfer() {
        let record = TransactionRecord {
            id: TransactionId::from_raw(1),
            account_id: AccountId::from_raw(1),
            kind: TransactionKind::TransferOut,
            amount: Money::from_cents(-4000),
            timestamp: Utc::now(),
        };
        assert!(record.is_transfer());
        assert!(!record.is_inflow());
    }
}
