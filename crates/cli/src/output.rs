//! Report delivery: stdout / file output, warnings, JSON, history saves.

use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use uidmatch_recon::store::{ReportKey, ReportStore, StoredReport};
use uidmatch_recon::FileWarning;
use uidmatch_store::SqliteStore;

use crate::exit_codes::{EXIT_ERROR, EXIT_IO, EXIT_STORE};
use crate::CliError;

/// Write `text` to `path`, or to stdout when no path is given.
pub fn emit_text(text: &str, path: Option<&Path>) -> Result<(), CliError> {
    match path {
        Some(path) => {
            write_file(path, text.as_bytes())?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    std::fs::write(path, bytes)
        .map_err(|e| CliError::new(EXIT_IO, format!("cannot write {}: {e}", path.display())))
}

pub fn print_warnings(warnings: &[FileWarning]) {
    for w in warnings {
        eprintln!("warning: {}", w.message);
    }
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))
}

pub fn to_json_value<T: Serialize>(value: &T) -> Result<serde_json::Value, CliError> {
    serde_json::to_value(value)
        .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))
}

/// Insert or replace a report in the history database.
pub fn save_report(
    store_path: &Path,
    key: ReportKey,
    text: String,
    payload: serde_json::Value,
) -> Result<(), CliError> {
    let mut store = open_store(store_path)?;
    let id = store
        .save(&StoredReport { key: key.clone(), text, payload, saved_at: Utc::now() })
        .map_err(store_err)?;
    eprintln!("saved {key} (#{id})");
    Ok(())
}

pub fn open_store(path: &Path) -> Result<SqliteStore, CliError> {
    SqliteStore::open(path).map_err(|e| store_err(e).with_hint(format!("store: {}", path.display())))
}

pub fn store_err(e: uidmatch_recon::store::StoreError) -> CliError {
    CliError::new(EXIT_STORE, e.to_string())
}
