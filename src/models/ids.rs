//! Strongly-typed ID wrappers for all entity types
//!
//! Ids are assigned by the store (SQLite rowids), so they are stable and
//! increase in insertion order. Newtypes keep an account id from being
//! passed where a transaction id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when an id string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdParseError(pub String);

impl fmt::Display for IdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid id: '{}'", self.0)
    }
}

impl std::error::Error for IdParseError {}

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw row id
            pub const fn from_raw(raw: i64) -> Self {
                Self(raw)
            }

            /// Get the underlying row id
            pub const fn raw(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            /// Accepts both the bare number and the prefixed display form
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                let digits = trimmed.strip_prefix($display_prefix).unwrap_or(trimmed);
                digits
                    .parse::<i64>()
                    .ok()
                    .filter(|n| *n > 0)
                    .map(Self)
                    .ok_or_else(|| IdParseError(s.to_string()))
            }
        }

        impl rusqlite::ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
                self.0.to_sql()
            }
        }

        impl rusqlite::types::FromSql for $name {
            fn column_result(
                value: rusqlite::types::ValueRef<'_>,
            ) -> rusqlite::types::FromSqlResult<Self> {
                i64::column_result(value).map(Self)
            }
        }
    };
}

define_id!(AccountId, "acc-");
define_id!(TransactionId, "txn-");
define_id!(ConversationId, "conv-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(AccountId::from_raw(7).to_string(), "acc-7");
        assert_eq!(TransactionId::from_raw(12).to_string(), "txn-12");
    }

    #[test]
    fn test_id_parse_accepts_both_forms() {
        assert_eq!("acc-3".parse::<AccountId>().unwrap(), AccountId::from_raw(3));
        assert_eq!("3".parse::<AccountId>().unwrap(), AccountId::from_raw(3));
    }

    #[test]
    fn test_id_parse_rejects_garbage() {
        assert!("alice".parse::<AccountId>().is_err());
        assert!("acc-".parse::<AccountId>().is_err());
        assert!("0".parse::<AccountId>().is_err());
        assert!("txn-3".parse::<AccountId>().is_err());
    }

    #[test]
    fn test_id_serialization() {
        let id = AccountId::from_raw(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let deserialized: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_ids_order_by_insertion() {
        assert!(TransactionId::from_raw(1) < TransactionId::from_raw(2));
    }
}
