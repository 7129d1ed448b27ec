//! `exec`: run one structured request and print the JSON response
//!
//! This is how an out-of-process collaborator drives the ledger.

use std::io::Read;

use crate::config::Settings;
use crate::dispatch::dispatch_json;
use crate::error::{LedgerError, LedgerResult};
use crate::storage::Storage;

/// Handle `exec [request]`, reading the request from stdin when omitted
///
/// Returns whether the request succeeded.
pub fn handle_exec(storage: &Storage, settings: &Settings, request: Option<String>) -> LedgerResult<bool> {
    let text = match request {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| LedgerError::Io(format!("Failed to read request from stdin: {}", e)))?;
            buffer
        }
    };

    let response = dispatch_json(storage, settings, &text);
    println!("{}", serde_json::to_string(&response)?);
    Ok(response.ok)
}
