//! CLI command for history export

use clap::ValueEnum;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::TellerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::export::{export_history_csv, export_history_json};
use crate::models::AccountId;
use crate::services::QueryService;
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// One row per transaction record
    Csv,
    /// Account, history, and verification in one document
    Json,
}

impl ExportFormat {
    fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Handle `export <account>`
///
/// Writes to `output` when given (`-` for stdout), otherwise to
/// `<export dir>/<username>-history.<ext>`.
pub fn handle_export(
    storage: &Storage,
    paths: &TellerPaths,
    account: &str,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> LedgerResult<()> {
    let found = QueryService::new(storage).find_required(account)?;

    if output.as_deref() == Some(Path::new("-")) {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_export(storage, found.id, format, &mut handle)?;
        handle.flush()?;
        return Ok(());
    }

    let output = match output {
        Some(path) => path,
        None => {
            paths.ensure_directories()?;
            paths
                .export_dir()
                .join(format!("{}-history.{}", found.username, format.extension()))
        }
    };

    let file = File::create(&output).map_err(|e| {
        LedgerError::Export(format!("Failed to create file {}: {}", output.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    let count = write_export(storage, found.id, format, &mut writer)?;
    writer.flush()?;

    println!(
        "Exported {} transactions for {} to: {}",
        count,
        found.username,
        output.display()
    );
    Ok(())
}

fn write_export<W: Write>(
    storage: &Storage,
    account_id: AccountId,
    format: ExportFormat,
    writer: W,
) -> LedgerResult<usize> {
    match format {
        ExportFormat::Csv => export_history_csv(storage, account_id, writer),
        ExportFormat::Json => export_history_json(storage, account_id, writer, true),
    }
}
