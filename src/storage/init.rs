//! Storage initialization
//!
//! Handles first-run setup: directories, the settings file, the database
//! schema and (optionally) the demo account. Safe to run repeatedly.

use std::path::PathBuf;

use chrono::Utc;

use crate::config::{Settings, TellerPaths};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, NewAccount};

use super::accounts::AccountRepository;
use super::Storage;

/// What `initialize_storage` did
#[derive(Debug, Clone)]
pub struct InitReport {
    /// Database location
    pub database: PathBuf,

    /// Whether the settings file was written by this run
    pub settings_created: bool,

    /// The demo account, if this run created it
    pub demo_account: Option<Account>,
}

/// Initialize storage for a fresh installation
pub fn initialize_storage(
    paths: &TellerPaths,
    settings: &Settings,
    seed_demo: bool,
) -> LedgerResult<InitReport> {
    paths.ensure_directories()?;

    let settings_created = !paths.settings_file().exists();
    if settings_created {
        settings.save(paths)?;
    }

    let storage = Storage::open(&paths.database_file(), settings)?;
    let demo_account = if seed_demo {
        seed_demo_account(&storage, settings)?
    } else {
        None
    };
    storage.close()?;

    Ok(InitReport {
        database: paths.database_file(),
        settings_created,
        demo_account,
    })
}

/// Create the configured demo account unless it already exists
pub fn seed_demo_account(storage: &Storage, settings: &Settings) -> LedgerResult<Option<Account>> {
    let demo = &settings.demo_account;
    let new = NewAccount::new(&demo.username, demo.balance)
        .map_err(|e| LedgerError::Config(format!("Invalid demo account: {}", e)))?;

    storage.atomic(|tx| {
        let repo = AccountRepository::new(tx);
        if repo.get_by_username(&new.username)?.is_some() {
            return Ok(None);
        }

        let account = repo.insert(&new, Utc::now())?;
        tracing::info!(account = %account, balance = %account.balance, "seeded demo account");
        Ok(Some(account))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_creates_database_and_settings() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TellerPaths::with_base_dir(temp_dir.path().to_path_buf());
        assert!(!paths.is_initialized());

        let report = initialize_storage(&paths, &Settings::default(), false).unwrap();
        assert!(report.settings_created);
        assert!(report.demo_account.is_none());
        assert!(paths.database_file().exists());
        assert!(paths.settings_file().exists());
        assert!(paths.is_initialized());
    }

    #[test]
    fn test_demo_seed_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TellerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings::default();

        let first = initialize_storage(&paths, &settings, true).unwrap();
        let demo = first.demo_account.unwrap();
        assert_eq!(demo.username, "demo_user");
        assert_eq!(demo.balance.cents(), 100000);

        let second = initialize_storage(&paths, &settings, true).unwrap();
        assert!(!second.settings_created);
        assert!(second.demo_account.is_none());

        let storage = Storage::open(&paths.database_file(), &settings).unwrap();
        let count = storage
            .read(|conn| AccountRepository::new(conn).count())
            .unwrap();
        assert_eq!(count, 1);
    }
}
