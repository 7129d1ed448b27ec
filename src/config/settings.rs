//! User settings for teller
//!
//! Settings live in `config.json` next to the data directory. Every field has
//! a serde default so older files keep loading as fields are added.

use serde::{Deserialize, Serialize};

use super::paths::TellerPaths;
use crate::error::LedgerError;
use crate::models::Money;
use crate::storage::file_io::write_json_atomic;

/// Output format for diagnostic logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Account seeded by `init --demo`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoAccount {
    pub username: String,
    pub balance: Money,
}

impl Default for DemoAccount {
    fn default() -> Self {
        Self {
            username: "demo_user".to_string(),
            balance: Money::from_dollars_cents(1000, 0),
        }
    }
}

/// User settings for teller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used in terminal output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Number of records shown by history listings when no limit is given
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// How long a writer waits for the database lock before giving up
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default)]
    pub demo_account: DemoAccount,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_history_limit() -> usize {
    5
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            history_limit: default_history_limit(),
            busy_timeout_ms: default_busy_timeout_ms(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            demo_account: DemoAccount::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &TellerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TellerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Resolve the listing size for a request that may not carry one
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.history_limit)
    }
}
