//! `uidm merge` — combine named columns across files.

use std::path::{Path, PathBuf};

use uidmatch_io::xlsx::write_columns;
use uidmatch_recon::report::{merge_report_text, merge_sheet_columns, Language};
use uidmatch_recon::store::{ReportKey, ReportKind};
use uidmatch_recon::{merge, EngineConfig, MergeMode, MergeRequest};

use crate::output::{emit_text, print_warnings, save_report, to_json, to_json_value};
use crate::settings::expand_inputs;
use crate::CliError;

pub struct MergeArgs {
    pub inputs: Vec<PathBuf>,
    pub columns: Vec<String>,
    pub mode: MergeMode,
    pub lang: Option<Language>,
    pub preview: Option<usize>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub xlsx: Option<PathBuf>,
    pub save: Option<String>,
}

pub fn cmd_merge(args: MergeArgs, config: &EngineConfig, store: Option<&Path>) -> Result<(), CliError> {
    let language = args.lang.unwrap_or(config.language);
    let columns = if args.columns.is_empty() { config.merge.columns.clone() } else { args.columns };

    let request = MergeRequest::new(expand_inputs(&args.inputs)?, columns, args.mode);
    // Fail fast on usage errors before touching any file.
    request.validate()?;

    let outcome = merge(&request, config)?;
    print_warnings(&outcome.warnings);

    if let Some(path) = &args.xlsx {
        write_columns(&merge_sheet_columns(&outcome.result), path)
            .map_err(|e| CliError::io(e.to_string()))?;
        eprintln!("wrote {}", path.display());
    }

    // The file export is always complete; the terminal view is a preview.
    let full = merge_report_text(&outcome.result, language, 0);

    if let Some(name) = &args.save {
        let store = store.ok_or_else(|| CliError::args("no report store configured"))?;
        let key = ReportKey::new(ReportKind::Merge, "", name.as_str());
        save_report(store, key, full.clone(), to_json_value(&outcome)?)?;
    }

    if args.json {
        return emit_text(&to_json(&outcome)?, args.output.as_deref());
    }
    match &args.output {
        Some(path) => emit_text(&full, Some(path)),
        None => {
            let limit = args.preview.unwrap_or(config.preview_limit);
            emit_text(&merge_report_text(&outcome.result, language, limit), None)
        }
    }
}
