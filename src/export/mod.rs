//! Export module for teller
//!
//! Provides account history export in two formats:
//! - CSV: one row per transaction record (spreadsheet-compatible)
//! - JSON: account, history, and verification in one versioned document

pub mod csv;
pub mod json;

pub use self::csv::{export_history_csv, write_records_csv};
pub use self::json::{export_history_json, AccountExport, EXPORT_SCHEMA_VERSION};
