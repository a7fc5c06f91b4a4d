// Frequency ranking of a single labeled category column.

use std::collections::HashMap;

use chrono::{DateTime, Local};
use serde::Serialize;
use uidmatch_io::{read_input, resolve_column, ColumnMatch, Content, InputFile, ResolveScope};

use crate::config::EngineConfig;
use crate::error::ReconError;
use crate::model::Outcome;
use crate::normalize::normalize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationRecord {
    /// 1-based.
    pub rank: usize,
    pub count: usize,
    pub label: String,
}

/// Labels ranked by descending count; ties keep first-occurrence order.
#[derive(Debug, Clone, Serialize)]
pub struct ViolationReport {
    pub records: Vec<ViolationRecord>,
    pub total: usize,
    pub unique: usize,
    pub processed_at: DateTime<Local>,
}

pub fn aggregate<'a>(values: impl IntoIterator<Item = &'a str>) -> ViolationReport {
    // (label, count) in first-occurrence order; the stable sort below keeps
    // that order among equal counts.
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;

    for label in values.into_iter().filter_map(normalize) {
        total += 1;
        match index.get(&label) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(label.clone(), counts.len());
                counts.push((label, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let records: Vec<ViolationRecord> = counts
        .into_iter()
        .enumerate()
        .map(|(i, (label, count))| ViolationRecord { rank: i + 1, count, label })
        .collect();

    ViolationReport { unique: records.len(), records, total, processed_at: Local::now() }
}

/// Read one file, resolve the category column and aggregate it.
///
/// The column is looked up by `column` first, then by each alias. There is
/// no first-column fallback: a miss is fatal and lists what the file has.
pub fn aggregate_file(
    input: &InputFile,
    column: &str,
    config: &EngineConfig,
) -> Result<Outcome<ViolationReport>, ReconError> {
    let column = column.trim();
    if column.is_empty() {
        return Err(ReconError::Validation("category column name must not be empty".into()));
    }

    let loaded = read_input(input, &config.encoding_chain())?;
    let table = match &loaded.content {
        Content::Table(table) => table,
        Content::Lines(_) => {
            return Err(ReconError::ColumnNotFound {
                file: loaded.name.clone(),
                column: column.to_string(),
                available: Vec::new(),
            })
        }
    };

    let hit = resolve_category_column(&table.headers, column, &config.violations.aliases).ok_or_else(
        || ReconError::ColumnNotFound {
            file: loaded.name.clone(),
            column: column.to_string(),
            available: table.headers.clone(),
        },
    )?;
    log::debug!("{}: category column '{}' ({})", loaded.name, hit.header, hit.strategy.label());

    let report = aggregate(table.column(hit.index));
    log::info!("{}: {} violation(s), {} type(s)", loaded.name, report.total, report.unique);

    Ok(Outcome::clean(report))
}

fn resolve_category_column(headers: &[String], column: &str, aliases: &[String]) -> Option<ColumnMatch> {
    std::iter::once(column)
        .chain(aliases.iter().map(String::as_str).filter(|a| !a.trim().is_empty()))
        .find_map(|name| resolve_column(headers, name, ResolveScope::Strict))
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationStats {
    pub total: usize,
    pub unique_types: usize,
    pub most_common: Option<ViolationRecord>,
    pub least_common: Option<ViolationRecord>,
    pub average_per_type: f64,
}

impl ViolationReport {
    pub fn stats(&self) -> ViolationStats {
        let average_per_type =
            if self.unique == 0 { 0.0 } else { self.total as f64 / self.unique as f64 };
        ViolationStats {
            total: self.total,
            unique_types: self.unique,
            most_common: self.records.first().cloned(),
            least_common: self.records.last().cloned(),
            average_per_type,
        }
    }
}
