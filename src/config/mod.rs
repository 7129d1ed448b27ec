//! Configuration module for teller
//!
//! - Path resolution for the database and settings file
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::TellerPaths;
pub use settings::{DemoAccount, LogFormat, Settings};
