//! `uidm compare` — reconcile two sources' identifier lists.

use std::path::{Path, PathBuf};

use uidmatch_recon::report::{
    comparison_report, difference_file_name, identifier_list_text, Language,
};
use uidmatch_recon::store::{ReportKey, ReportKind};
use uidmatch_recon::{compare, load_dataset, EngineConfig, Outcome};

use crate::output::{emit_text, print_warnings, save_report, to_json, to_json_value, write_file};
use crate::settings::expand_inputs;
use crate::CliError;

pub struct CompareArgs {
    pub a_name: String,
    pub a: Vec<PathBuf>,
    pub b_name: String,
    pub b: Vec<PathBuf>,
    pub period: Option<String>,
    pub columns: Vec<String>,
    pub lang: Option<Language>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
    pub save: bool,
}

pub fn cmd_compare(args: CompareArgs, config: &EngineConfig, store: Option<&Path>) -> Result<(), CliError> {
    let language = args.lang.unwrap_or(config.language);
    let id_columns =
        if args.columns.is_empty() { config.compare.id_columns.clone() } else { args.columns.clone() };

    let a_files = expand_inputs(&args.a)?;
    let b_files = expand_inputs(&args.b)?;

    let a = load_dataset(&args.a_name, &a_files, &id_columns, config)?;
    let b = load_dataset(&args.b_name, &b_files, &id_columns, config)?;

    let mut warnings = a.warnings;
    warnings.extend(b.warnings);
    print_warnings(&warnings);

    let result = compare(&a.result, &b.result);
    let text = comparison_report(&result, language, args.period.as_deref());

    if let Some(dir) = &args.export_dir {
        std::fs::create_dir_all(dir).map_err(|e| {
            CliError::io(format!("cannot create {}: {e}", dir.display()))
        })?;
        let exports = [
            (difference_file_name(&result.a_name, &result.b_name, &result.generated_at), &result.a_only),
            (difference_file_name(&result.b_name, &result.a_name, &result.generated_at), &result.b_only),
        ];
        for (name, ids) in exports {
            let path = dir.join(name);
            write_file(&path, identifier_list_text(ids).as_bytes())?;
            eprintln!("wrote {} ({} identifiers)", path.display(), ids.len());
        }
    }

    let outcome = Outcome::new(result, warnings);

    if args.save {
        let store = store.ok_or_else(|| CliError::args("no report store configured"))?;
        let name = format!("{}-{}", outcome.result.a_name, outcome.result.b_name);
        let key = ReportKey::new(ReportKind::Comparison, args.period.clone().unwrap_or_default(), name);
        save_report(store, key, text.clone(), to_json_value(&outcome)?)?;
    }

    if args.json {
        emit_text(&to_json(&outcome)?, args.output.as_deref())
    } else {
        emit_text(&text, args.output.as_deref())
    }
}
