//! Core data models for the ledger
//!
//! Accounts, transaction records, conversation entries, and the value types
//! they are built from.

pub mod account;
pub mod conversation;
pub mod ids;
pub mod money;
pub mod transaction;

pub use account::{normalize_username, Account, AccountValidationError, NewAccount};
pub use conversation::{ConversationEntry, NewConversationEntry};
pub use ids::{AccountId, ConversationId, IdParseError, TransactionId};
pub use money::{Money, MoneyParseError};
pub use transaction::{TransactionKind, TransactionRecord};
