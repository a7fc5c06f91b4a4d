//! `uidm history` — saved reports.

use std::path::Path;

use clap::Subcommand;
use uidmatch_recon::store::{ReportKey, ReportKind, ReportStore};

use crate::output::{open_store, store_err, to_json};
use crate::CliError;

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List saved reports, newest first
    #[command(after_help = "\
Examples:
  uidm history list
  uidm history list --json")]
    List {
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print a saved report
    #[command(after_help = "\
Examples:
  uidm history show comparison Telecom-Pochta --period 2025-08
  uidm history show merge august --json")]
    Show {
        /// comparison | merge | violations
        kind: ReportKind,
        name: String,
        #[arg(long, default_value = "")]
        period: String,
        /// Print the stored JSON payload instead of the text report
        #[arg(long)]
        json: bool,
    },

    /// Delete a saved report
    Delete {
        kind: ReportKind,
        name: String,
        #[arg(long, default_value = "")]
        period: String,
    },
}

pub fn cmd_history(cmd: HistoryCommands, store_path: &Path) -> Result<(), CliError> {
    match cmd {
        HistoryCommands::List { json } => {
            let store = open_store(store_path)?;
            let reports = store.list().map_err(store_err)?;
            if json {
                println!("{}", to_json(&reports)?);
                return Ok(());
            }
            if reports.is_empty() {
                eprintln!("no saved reports");
                return Ok(());
            }
            for r in &reports {
                println!(
                    "{:>4}  {:<10}  {:<10}  {:<30}  {}",
                    r.id,
                    r.key.kind.as_str(),
                    r.key.period,
                    r.key.name,
                    r.saved_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
            Ok(())
        }
        HistoryCommands::Show { kind, name, period, json } => {
            let store = open_store(store_path)?;
            let key = ReportKey::new(kind, period, name);
            let report = store
                .fetch(&key)
                .map_err(store_err)?
                .ok_or_else(|| CliError::args(format!("no saved report {key}")))?;
            if json {
                println!("{}", to_json(&report.payload)?);
            } else {
                println!("{}", report.text);
            }
            Ok(())
        }
        HistoryCommands::Delete { kind, name, period } => {
            let mut store = open_store(store_path)?;
            let key = ReportKey::new(kind, period, name);
            if store.delete(&key).map_err(store_err)? {
                eprintln!("deleted {key}");
                Ok(())
            } else {
                Err(CliError::args(format!("no saved report {key}")))
            }
        }
    }
}
