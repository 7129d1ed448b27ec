//! Path management for teller
//!
//! ## Path Resolution Order
//!
//! 1. `TELLER_DATA_DIR` environment variable (if set)
//! 2. The platform config directory joined with `teller`
//!    (`~/.config/teller` on Linux, `%APPDATA%\teller` on Windows)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::LedgerError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "TELLER_DATA_DIR";

/// Manages all paths used by teller
#[derive(Debug, Clone)]
pub struct TellerPaths {
    base_dir: PathBuf,
}

impl TellerPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no override is set and the platform config
    /// directory cannot be determined.
    pub fn new() -> Result<Self, LedgerError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create TellerPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the export directory (<base>/exports/)
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the ledger database
    pub fn database_file(&self) -> PathBuf {
        self.data_dir().join("ledger.db")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), LedgerError> {
        for dir in [self.base_dir.clone(), self.data_dir(), self.export_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                LedgerError::Io(format!("Failed to create directory {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    /// Check if the ledger has been initialized (database exists)
    pub fn is_initialized(&self) -> bool {
        self.database_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, LedgerError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| LedgerError::Config("Could not determine the home directory".into()))?;
    Ok(dirs.config_dir().join("teller"))
}
