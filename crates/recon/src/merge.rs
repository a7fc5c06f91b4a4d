// Column merge across N heterogeneous files.
//
// Each file resolves every requested column on its own, so the same
// underlying column may satisfy several requested names. Line files have no
// columns and contribute their values to every requested name.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uidmatch_io::{
    read_input, resolve_column, Content, FileFormat, InputFile, MatchStrategy, ResolveScope,
    TextEncoding,
};

use crate::config::EngineConfig;
use crate::dataset::column_identifiers;
use crate::error::ReconError;
use crate::model::{FileWarning, Outcome};
use crate::normalize::normalize;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Distinct values per column across all files.
    #[default]
    Union,
    /// Accepted by the request schema but has no defined behavior.
    Intersection,
}

impl MergeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "union",
            Self::Intersection => "intersection",
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "union" => Ok(Self::Union),
            "intersection" => Ok(Self::Intersection),
            other => Err(format!("unknown merge mode '{other}' (expected union or intersection)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub files: Vec<InputFile>,
    /// Requested column names, display order.
    pub columns: Vec<String>,
    pub mode: MergeMode,
}

pub const MIN_MERGE_FILES: usize = 2;

impl MergeRequest {
    pub fn new(files: Vec<InputFile>, columns: Vec<String>, mode: MergeMode) -> Self {
        Self { files, columns, mode }
    }

    /// Reject the request before any I/O. Returns the cleaned column list:
    /// trimmed, empties dropped, case-insensitive duplicates dropped (first
    /// spelling kept).
    pub fn validate(&self) -> Result<Vec<String>, ReconError> {
        if self.files.len() < MIN_MERGE_FILES {
            return Err(ReconError::Validation(format!(
                "merge needs at least {MIN_MERGE_FILES} files, got {}",
                self.files.len()
            )));
        }
        if self.mode == MergeMode::Intersection {
            return Err(ReconError::UnsupportedMergeMode(self.mode.to_string()));
        }

        let mut seen = BTreeSet::new();
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .filter(|c| seen.insert(c.to_lowercase()))
            .map(str::to_string)
            .collect();

        if columns.is_empty() {
            return Err(ReconError::Validation("at least one column name is required".into()));
        }
        Ok(columns)
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// How one requested column was satisfied in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnHit {
    pub requested: String,
    /// Header that matched; `None` for line files and misses.
    pub header: Option<String>,
    pub strategy: Option<MatchStrategy>,
    pub found: bool,
    /// Non-absent values this file contributed to the column.
    pub values: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileStats {
    pub name: String,
    /// `None` when the file could not be read at all.
    pub format: Option<FileFormat>,
    pub encoding: Option<TextEncoding>,
    /// Data rows (tabular) or non-blank lines.
    pub rows: usize,
    pub columns: Vec<ColumnHit>,
}

impl FileStats {
    /// Requested names this file satisfied, request order.
    pub fn found_columns(&self) -> Vec<&str> {
        self.columns.iter().filter(|c| c.found).map(|c| c.requested.as_str()).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MergedColumn {
    pub name: String,
    pub values: BTreeSet<String>,
}

impl MergedColumn {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeResult {
    pub mode: MergeMode,
    pub files: Vec<FileStats>,
    pub columns: Vec<MergedColumn>,
    pub merged_at: DateTime<Local>,
}

impl MergeResult {
    pub fn column(&self, name: &str) -> Option<&MergedColumn> {
        self.columns.iter().find(|c| c.name == name)
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

pub fn merge(request: &MergeRequest, config: &EngineConfig) -> Result<Outcome<MergeResult>, ReconError> {
    let requested = request.validate()?;
    let chain = config.encoding_chain();

    let mut columns: Vec<MergedColumn> = requested
        .iter()
        .map(|name| MergedColumn { name: name.clone(), values: BTreeSet::new() })
        .collect();
    let mut files = Vec::with_capacity(request.files.len());
    let mut warnings = Vec::new();

    for input in &request.files {
        let loaded = match read_input(input, &chain) {
            Ok(loaded) => loaded,
            Err(err) => {
                log::warn!("merge: skipping {}: {err}", input.name);
                warnings.push(FileWarning::from_read_error(&input.name, &err));
                files.push(FileStats {
                    name: input.name.clone(),
                    format: None,
                    encoding: None,
                    rows: 0,
                    columns: requested.iter().map(|r| miss(r)).collect(),
                });
                continue;
            }
        };

        let mut hits = Vec::with_capacity(requested.len());
        match &loaded.content {
            Content::Lines(lines) => {
                let values: Vec<String> = lines.iter().filter_map(|l| normalize(l)).collect();
                for (column, name) in columns.iter_mut().zip(&requested) {
                    column.values.extend(values.iter().cloned());
                    hits.push(ColumnHit {
                        requested: name.clone(),
                        header: None,
                        strategy: None,
                        found: true,
                        values: values.len(),
                    });
                }
            }
            Content::Table(table) => {
                for (column, name) in columns.iter_mut().zip(&requested) {
                    match resolve_column(&table.headers, name, ResolveScope::Merge) {
                        Some(hit) => {
                            log::debug!(
                                "merge: {} '{}' -> '{}' ({})",
                                loaded.name,
                                name,
                                hit.header,
                                hit.strategy.label()
                            );
                            let values = column_identifiers(table, hit.index);
                            let count = values.len();
                            column.values.extend(values);
                            hits.push(ColumnHit {
                                requested: name.clone(),
                                header: Some(hit.header),
                                strategy: Some(hit.strategy),
                                found: true,
                                values: count,
                            });
                        }
                        None => {
                            log::debug!("merge: {} has no column for '{name}'", loaded.name);
                            hits.push(miss(name));
                        }
                    }
                }
            }
        }

        files.push(FileStats {
            name: loaded.name,
            format: Some(loaded.format),
            encoding: loaded.encoding,
            rows: loaded.content.row_count(),
            columns: hits,
        });
    }

    if files.iter().all(|f| f.format.is_none()) {
        return Err(ReconError::NoUsableFiles { source: "merge".into(), warnings });
    }

    for column in &columns {
        log::info!("merge: '{}' has {} unique value(s)", column.name, column.len());
    }

    Ok(Outcome::new(
        MergeResult { mode: request.mode, files, columns, merged_at: Local::now() },
        warnings,
    ))
}

fn miss(requested: &str) -> ColumnHit {
    ColumnHit { requested: requested.to_string(), header: None, strategy: None, found: false, values: 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content: &str) -> InputFile {
        InputFile::from_bytes(name, content.as_bytes().to_vec())
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn values(column: &MergedColumn) -> Vec<&str> {
        column.values.iter().map(String::as_str).collect()
    }

    #[test]
    fn union_across_files_with_naming_drift() {
        let request = MergeRequest::new(
            vec![
                file("a.csv", "doc_num;x\nD1;1\nD2;2\n"),
                file("b.csv", "DOC_NUM,y\nD2,1\nD3,2\n"),
            ],
            cols(&["doc_num"]),
            MergeMode::Union,
        );
        let out = merge(&request, &EngineConfig::default()).unwrap();
        assert!(out.warnings.is_empty());
        let merged = out.result.column("doc_num").unwrap();
        assert_eq!(values(merged), vec!["D1", "D2", "D3"]);

        let b = &out.result.files[1];
        assert_eq!(b.rows, 2);
        assert_eq!(b.columns[0].strategy, Some(MatchStrategy::CaseInsensitive));
        assert_eq!(b.columns[0].header.as_deref(), Some("DOC_NUM"));
    }

    #[test]
    fn one_header_may_satisfy_two_requested_names() {
        let request = MergeRequest::new(
            vec![file("a.csv", "TV_SERIALNUMBER;z\nS1;1\n"), file("b.txt", "S2\n")],
            cols(&["serialnumber", "tv_serialnumber"]),
            MergeMode::Union,
        );
        let out = merge(&request, &EngineConfig::default()).unwrap();
        assert_eq!(values(&out.result.columns[0]), vec!["S1", "S2"]);
        assert_eq!(values(&out.result.columns[1]), vec!["S1", "S2"]);
        let first = &out.result.files[0].columns;
        assert_eq!(first[0].strategy, Some(MatchStrategy::Substring));
        assert_eq!(first[1].strategy, Some(MatchStrategy::CaseInsensitive));
    }

    #[test]
    fn unmatched_name_falls_back_to_first_column() {
        let request = MergeRequest::new(
            vec![file("a.csv", "id_x;other\nV1;q\n"), file("b.txt", "V2\n")],
            cols(&["serial"]),
            MergeMode::Union,
        );
        let out = merge(&request, &EngineConfig::default()).unwrap();
        assert_eq!(out.result.files[0].columns[0].strategy, Some(MatchStrategy::FirstColumn));
        assert_eq!(values(&out.result.columns[0]), vec!["V1", "V2"]);
    }

    #[test]
    fn table_without_headers_contributes_nothing_silently() {
        let request = MergeRequest::new(
            vec![file("empty.csv", ""), file("b.txt", "A1\n")],
            cols(&["doc_num"]),
            MergeMode::Union,
        );
        let out = merge(&request, &EngineConfig::default()).unwrap();
        assert!(out.warnings.is_empty());

        let empty = &out.result.files[0];
        assert_eq!(empty.format, Some(FileFormat::Delimited));
        assert_eq!(empty.rows, 0);
        assert!(!empty.columns[0].found);
        assert_eq!(empty.columns[0].values, 0);
        assert_eq!(values(&out.result.columns[0]), vec!["A1"]);
    }

    #[test]
    fn unreadable_file_keeps_stats_and_warns() {
        let request = MergeRequest::new(
            vec![file("a.txt", "A1\n"), InputFile::from_bytes("blob", vec![0, 0, 0])],
            cols(&["doc_num"]),
            MergeMode::Union,
        );
        let out = merge(&request, &EngineConfig::default()).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.result.files.len(), 2);
        let skipped = &out.result.files[1];
        assert_eq!(skipped.rows, 0);
        assert!(skipped.format.is_none());
        assert!(skipped.found_columns().is_empty());
    }

    #[test]
    fn all_files_unreadable_is_fatal() {
        let request = MergeRequest::new(
            vec![InputFile::from_bytes("x", vec![0]), InputFile::from_bytes("y", vec![0])],
            cols(&["doc_num"]),
            MergeMode::Union,
        );
        let err = merge(&request, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, ReconError::NoUsableFiles { ref warnings, .. } if warnings.len() == 2));
    }

    #[test]
    fn validation_rejects_before_io() {
        // Paths do not exist; validation must fail first.
        let missing = || InputFile::from_path("/nonexistent/a.csv");

        let one = MergeRequest::new(vec![missing()], cols(&["doc_num"]), MergeMode::Union);
        assert!(matches!(merge(&one, &EngineConfig::default()), Err(ReconError::Validation(_))));

        let blank = MergeRequest::new(vec![missing(), missing()], cols(&[" ", ""]), MergeMode::Union);
        assert!(matches!(merge(&blank, &EngineConfig::default()), Err(ReconError::Validation(_))));

        let inter =
            MergeRequest::new(vec![missing(), missing()], cols(&["doc_num"]), MergeMode::Intersection);
        assert!(matches!(
            merge(&inter, &EngineConfig::default()),
            Err(ReconError::UnsupportedMergeMode(_))
        ));
    }

    #[test]
    fn column_list_is_cleaned() {
        let request = MergeRequest::new(
            vec![file("a.txt", ""), file("b.txt", "")],
            cols(&[" doc_num ", "DOC_NUM", "", "uid"]),
            MergeMode::Union,
        );
        assert_eq!(request.validate().unwrap(), vec!["doc_num", "uid"]);
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Union".parse::<MergeMode>(), Ok(MergeMode::Union));
        assert_eq!("intersection".parse::<MergeMode>(), Ok(MergeMode::Intersection));
        assert!("both".parse::<MergeMode>().is_err());
    }
}
