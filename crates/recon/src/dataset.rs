// Source datasets: every file of one organization, read, normalized and
// unioned into a single identifier set.

use std::collections::BTreeSet;

use serde::Serialize;
use uidmatch_io::{read_input, resolve_column, Content, InputFile, Loaded, ResolveScope, Table};

use crate::config::EngineConfig;
use crate::error::ReconError;
use crate::model::{FileWarning, Outcome, WarningKind};
use crate::normalize::normalize;

/// Named identifier set, tagged with the files that contributed to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceDataset {
    pub name: String,
    pub identifiers: BTreeSet<String>,
    /// Files that were read successfully, in submission order.
    pub files: Vec<String>,
}

impl SourceDataset {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Build directly from raw values (already extracted by the caller).
    pub fn from_values<'a>(name: impl Into<String>, values: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            name: name.into(),
            identifiers: values.into_iter().filter_map(normalize).collect(),
            files: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

/// Read every file of one source and union the normalized identifiers.
///
/// Tabular files use the first of `id_columns` that resolves (no
/// first-column fallback); line files contribute every line. Files that
/// cannot be read, or that carry none of the candidate columns, are skipped
/// with a warning. Zero usable files is fatal.
pub fn load_dataset(
    name: &str,
    inputs: &[InputFile],
    id_columns: &[String],
    config: &EngineConfig,
) -> Result<Outcome<SourceDataset>, ReconError> {
    if name.trim().is_empty() {
        return Err(ReconError::Validation("source name must not be empty".into()));
    }
    if inputs.is_empty() {
        return Err(ReconError::Validation(format!("source '{name}': no files given")));
    }
    let candidates: Vec<&str> =
        id_columns.iter().map(|c| c.trim()).filter(|c| !c.is_empty()).collect();
    if candidates.is_empty() {
        return Err(ReconError::Validation("at least one identifier column is required".into()));
    }

    let chain = config.encoding_chain();
    let mut dataset = SourceDataset::new(name);
    let mut warnings = Vec::new();

    for input in inputs {
        let loaded = match read_input(input, &chain) {
            Ok(loaded) => loaded,
            Err(err) => {
                log::warn!("{name}: skipping {}: {err}", input.name);
                warnings.push(FileWarning::from_read_error(&input.name, &err));
                continue;
            }
        };

        match identifiers_in(&loaded, &candidates) {
            Some(ids) => {
                let before = dataset.identifiers.len();
                dataset.identifiers.extend(ids);
                log::debug!(
                    "{name}: {} contributed {} new identifier(s)",
                    loaded.name,
                    dataset.identifiers.len() - before
                );
                dataset.files.push(loaded.name);
            }
            None => {
                let message = format!(
                    "{}: none of the identifier columns {} found; available columns: {}",
                    loaded.name,
                    quoted(&candidates),
                    quoted(loaded.content.headers()),
                );
                log::warn!("{name}: skipping {message}");
                warnings.push(FileWarning::new(&loaded.name, WarningKind::Column, message));
            }
        }
    }

    if dataset.files.is_empty() {
        return Err(ReconError::NoUsableFiles { source: name.to_string(), warnings });
    }

    log::info!(
        "{name}: {} identifier(s) from {} file(s)",
        dataset.identifiers.len(),
        dataset.files.len()
    );
    Ok(Outcome::new(dataset, warnings))
}

/// Normalized identifiers of one loaded file; `None` when a table has none
/// of the candidate columns.
fn identifiers_in(loaded: &Loaded, candidates: &[&str]) -> Option<Vec<String>> {
    match &loaded.content {
        Content::Lines(lines) => Some(lines.iter().filter_map(|l| normalize(l)).collect()),
        Content::Table(table) => {
            let hit = candidates
                .iter()
                .find_map(|c| resolve_column(&table.headers, c, ResolveScope::Strict))?;
            log::debug!(
                "{}: identifier column '{}' ({})",
                loaded.name,
                hit.header,
                hit.strategy.label()
            );
            Some(column_identifiers(table, hit.index))
        }
    }
}

pub(crate) fn column_identifiers(table: &Table, index: usize) -> Vec<String> {
    table.column(index).filter_map(normalize).collect()
}

pub(crate) fn quoted<S: AsRef<str>>(names: &[S]) -> String {
    if names.is_empty() {
        return "(none)".to_string();
    }
    names.iter().map(|n| format!("'{}'", n.as_ref())).collect::<Vec<_>>().join(", ")
}
