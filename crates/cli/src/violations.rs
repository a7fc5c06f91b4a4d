//! `uidm violations` — rank a category column by frequency.

use std::path::{Path, PathBuf};

use serde::Serialize;
use uidmatch_io::InputFile;
use uidmatch_recon::report::{violation_report_text, Language};
use uidmatch_recon::store::{ReportKey, ReportKind};
use uidmatch_recon::violations::{ViolationReport, ViolationStats};
use uidmatch_recon::{aggregate_file, EngineConfig, FileWarning};

use crate::output::{emit_text, print_warnings, save_report, to_json, to_json_value};
use crate::CliError;

pub struct ViolationsArgs {
    pub input: PathBuf,
    pub column: Option<String>,
    pub lang: Option<Language>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub save: Option<String>,
}

#[derive(Serialize)]
struct ViolationsJson<'a> {
    result: &'a ViolationReport,
    stats: ViolationStats,
    warnings: &'a [FileWarning],
}

pub fn cmd_violations(
    args: ViolationsArgs,
    config: &EngineConfig,
    store: Option<&Path>,
) -> Result<(), CliError> {
    let language = args.lang.unwrap_or(config.language);
    let column = args.column.clone().unwrap_or_else(|| config.violations.column.clone());

    let outcome = aggregate_file(&InputFile::from_path(&args.input), &column, config)?;
    print_warnings(&outcome.warnings);

    let report = &outcome.result;
    let text = violation_report_text(report, language, &report.processed_at);
    let json = ViolationsJson { result: report, stats: report.stats(), warnings: &outcome.warnings };

    if let Some(name) = &args.save {
        let store = store.ok_or_else(|| CliError::args("no report store configured"))?;
        let key = ReportKey::new(ReportKind::Violations, "", name.as_str());
        save_report(store, key, text.clone(), to_json_value(&json)?)?;
    }

    if args.json {
        emit_text(&to_json(&json)?, args.output.as_deref())
    } else {
        emit_text(&text, args.output.as_deref())
    }
}
