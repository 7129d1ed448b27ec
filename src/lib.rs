//! teller - account ledger with atomic money movement
//!
//! This library keeps named accounts, their balances, and an append-only
//! transaction log in a single SQLite database. Every deposit, withdrawal,
//! and transfer commits as one atomic unit: the balance changes and the
//! matching records land together or not at all.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Ledger error type and error kinds
//! - `models`: Core data models (money, accounts, transaction records)
//! - `storage`: SQLite storage layer and repositories
//! - `services`: Ledger operations and read-only queries
//! - `dispatch`: Structured request/response boundary
//! - `cli`, `display`, `export`: The command line front end
//!
//! # Example
//!
//! ```rust,ignore
//! use teller::config::{Settings, TellerPaths};
//! use teller::models::Money;
//! use teller::services::LedgerService;
//! use teller::storage::Storage;
//!
//! let paths = TellerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(&paths.database_file(), &settings)?;
//! let alice = LedgerService::new(&storage).create_account("alice", Money::from_cents(10000))?;
//! ```

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
