//! Service layer for teller
//!
//! The service layer provides business logic on top of the storage layer.
//! `LedgerService` is the sole writer of balances and transaction records;
//! `QueryService` and `ConversationService` never join its atomic scopes.

pub mod conversation;
pub mod ledger;
pub mod query;

pub use conversation::ConversationService;
pub use ledger::{LedgerService, Party};
pub use query::{AccountSummary, BalanceCheck, QueryService};
