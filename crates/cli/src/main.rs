// uidm - identifier reconciliation, column merge and violation reports

mod compare;
mod exit_codes;
mod history;
mod merge;
mod output;
mod settings;
mod violations;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uidmatch_recon::report::Language;
use uidmatch_recon::{MergeMode, ReconError};

use exit_codes::{recon_exit_code, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "uidm")]
#[command(about = "Reconcile identifier lists, merge columns across files, rank violations")]
#[command(version)]
#[command(after_help = "\
Config:
  --config <path>, else <config dir>/uidmatch/config.toml when present.
  Keys: language, preview_limit, encodings, [compare] id_columns,
        [merge] columns, [violations] column / aliases

Logging:
  RUST_LOG overrides -v / -vv (e.g. RUST_LOG=uidmatch_recon=debug)")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Engine config file (TOML)
    #[arg(long, global = true, env = "UIDM_CONFIG")]
    config: Option<PathBuf>,

    /// Report history database
    #[arg(long, global = true, env = "UIDM_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two sources' identifier lists
    #[command(after_help = "\
Examples:
  uidm compare --a-name Telecom --a tl_avgust.csv --b-name Pochta --b pochta/
  uidm compare --a-name A --a a1.txt --a a2.txt --b-name B --b b.xlsx --period Avgust --lang uz
  uidm compare --a-name A --a a.csv --b-name B --b b.csv --export-dir out/ --json")]
    Compare {
        /// Display name of source A
        #[arg(long, value_name = "NAME")]
        a_name: String,

        /// Files (or directories) of source A. Repeatable.
        #[arg(long, value_name = "PATH", num_args = 1.., required = true)]
        a: Vec<PathBuf>,

        /// Display name of source B
        #[arg(long, value_name = "NAME")]
        b_name: String,

        /// Files (or directories) of source B. Repeatable.
        #[arg(long, value_name = "PATH", num_args = 1.., required = true)]
        b: Vec<PathBuf>,

        /// Period label for the report title (e.g. month name)
        #[arg(long)]
        period: Option<String>,

        /// Identifier column candidates, tried in order. Repeatable.
        #[arg(long = "column", value_name = "NAME")]
        columns: Vec<String>,

        /// Report language (uz or ru)
        #[arg(long)]
        lang: Option<Language>,

        /// Output JSON instead of the text report
        #[arg(long)]
        json: bool,

        /// Write the report to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Write A-only and B-only identifier lists into this directory
        #[arg(long, value_name = "DIR")]
        export_dir: Option<PathBuf>,

        /// Save the report to history (key: period + "A-B")
        #[arg(long)]
        save: bool,
    },

    /// Merge named columns across files
    #[command(after_help = "\
Examples:
  uidm merge region1.csv region2.xlsx list.txt
  uidm merge uploads/ --columns doc_num,uid --preview 50
  uidm merge a.csv b.csv -o merged.txt --xlsx merged.xlsx --save august")]
    Merge {
        /// Input files or directories (at least two files)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Column names, comma-separated
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Merge mode
        #[arg(long, default_value = "union")]
        mode: MergeMode,

        /// Report language (uz or ru)
        #[arg(long)]
        lang: Option<Language>,

        /// Values shown per column on stdout (0 = all)
        #[arg(long)]
        preview: Option<usize>,

        /// Output JSON instead of the text report
        #[arg(long)]
        json: bool,

        /// Write the full report to a file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Also write the merged columns as a spreadsheet
        #[arg(long, value_name = "FILE")]
        xlsx: Option<PathBuf>,

        /// Save the full report to history under this name
        #[arg(long, value_name = "NAME")]
        save: Option<String>,
    },

    /// Rank the values of a violation-type column
    #[command(after_help = "\
Examples:
  uidm violations avgust.xlsx
  uidm violations export.csv --column \"violation type\" --lang uz -o report.txt")]
    Violations {
        /// Spreadsheet or delimited file
        input: PathBuf,

        /// Category column (default from config: \"qoidabuzarlik nomi\")
        #[arg(long)]
        column: Option<String>,

        /// Report language (uz or ru)
        #[arg(long)]
        lang: Option<Language>,

        /// Output JSON (records, totals, stats)
        #[arg(long)]
        json: bool,

        /// Write the report to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Save the report to history under this name
        #[arg(long, value_name = "NAME")]
        save: Option<String>,
    },

    /// Saved reports
    #[command(subcommand)]
    History(history::HistoryCommands),
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_IO, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let code = recon_exit_code(&err);
        let hint = match &err {
            ReconError::UnsupportedMergeMode(_) => Some("use --mode union".to_string()),
            ReconError::ColumnNotFound { .. } => Some("pass --column with one of the available names".to_string()),
            ReconError::NoUsableFiles { .. } => {
                Some("check the file formats (csv, xlsx, txt) and encodings".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}

// ============================================================================
// Logging
// ============================================================================

fn init_logging(verbose: u8) {
    // Skipped-file warnings are already printed by the commands.
    let default = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

// ============================================================================
// main
// ============================================================================

fn run(cli: Cli) -> Result<(), CliError> {
    let store = cli.store.clone();
    let store_path = || settings::store_path(store.as_deref());

    match cli.command {
        Commands::Compare {
            a_name,
            a,
            b_name,
            b,
            period,
            columns,
            lang,
            json,
            output,
            export_dir,
            save,
        } => {
            let config = settings::load_config(cli.config.as_deref())?;
            let store = if save { Some(store_path()?) } else { None };
            compare::cmd_compare(
                compare::CompareArgs {
                    a_name,
                    a,
                    b_name,
                    b,
                    period,
                    columns,
                    lang,
                    json,
                    output,
                    export_dir,
                    save,
                },
                &config,
                store.as_deref(),
            )
        }
        Commands::Merge { inputs, columns, mode, lang, preview, json, output, xlsx, save } => {
            let config = settings::load_config(cli.config.as_deref())?;
            let store = if save.is_some() { Some(store_path()?) } else { None };
            merge::cmd_merge(
                merge::MergeArgs { inputs, columns, mode, lang, preview, json, output, xlsx, save },
                &config,
                store.as_deref(),
            )
        }
        Commands::Violations { input, column, lang, json, output, save } => {
            let config = settings::load_config(cli.config.as_deref())?;
            let store = if save.is_some() { Some(store_path()?) } else { None };
            violations::cmd_violations(
                violations::ViolationsArgs { input, column, lang, json, output, save },
                &config,
                store.as_deref(),
            )
        }
        Commands::History(cmd) => history::cmd_history(cmd, &store_path()?),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(if code == EXIT_SUCCESS { EXIT_ERROR } else { code })
        }
    }
}
