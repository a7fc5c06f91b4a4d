// Report persistence contract.
//
// The engine never calls a store; hosts save rendered reports after the
// fact. `MemoryStore` backs tests and embedding, `uidmatch-store` provides
// SQLite.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Comparison,
    Merge,
    Violations,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comparison => "comparison",
            Self::Merge => "merge",
            Self::Violations => "violations",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "comparison" | "compare" => Ok(Self::Comparison),
            "merge" => Ok(Self::Merge),
            "violations" | "violation" => Ok(Self::Violations),
            other => Err(format!("unknown report kind '{other}'")),
        }
    }
}

/// Reports are unique per (kind, period, name). `period` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReportKey {
    pub kind: ReportKind,
    pub period: String,
    pub name: String,
}

impl ReportKey {
    pub fn new(kind: ReportKind, period: impl Into<String>, name: impl Into<String>) -> Self {
        Self { kind, period: period.into(), name: name.into() }
    }
}

impl fmt::Display for ReportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.period.is_empty() {
            write!(f, "{}/{}", self.kind, self.name)
        } else {
            write!(f, "{}/{}/{}", self.kind, self.period, self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredReport {
    pub key: ReportKey,
    /// Rendered plain-text report.
    pub text: String,
    /// Structured result as produced by the engine.
    pub payload: serde_json::Value,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub id: i64,
    pub key: ReportKey,
    pub saved_at: DateTime<Utc>,
    pub text_bytes: usize,
}

#[derive(Debug)]
pub enum StoreError {
    /// Backend failed (open, query, schema).
    Backend(String),
    /// Stored payload could not be encoded or decoded.
    Payload(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(msg) => write!(f, "report store error: {msg}"),
            Self::Payload(msg) => write!(f, "stored report is corrupt: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

pub trait ReportStore {
    /// Insert or replace; returns the record id (stable across replaces).
    fn save(&mut self, report: &StoredReport) -> Result<i64, StoreError>;
    fn fetch(&self, key: &ReportKey) -> Result<Option<StoredReport>, StoreError>;
    /// `true` if a record was removed.
    fn delete(&mut self, key: &ReportKey) -> Result<bool, StoreError>;
    /// Newest first.
    fn list(&self) -> Result<Vec<ReportSummary>, StoreError>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<ReportKey, (i64, StoredReport)>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ReportStore for MemoryStore {
    fn save(&mut self, report: &StoredReport) -> Result<i64, StoreError> {
        let id = match self.records.get(&report.key) {
            Some((id, _)) => *id,
            None => {
                self.next_id += 1;
                self.next_id
            }
        };
        self.records.insert(report.key.clone(), (id, report.clone()));
        Ok(id)
    }

    fn fetch(&self, key: &ReportKey) -> Result<Option<StoredReport>, StoreError> {
        Ok(self.records.get(key).map(|(_, r)| r.clone()))
    }

    fn delete(&mut self, key: &ReportKey) -> Result<bool, StoreError> {
        Ok(self.records.remove(key).is_some())
    }

    fn list(&self) -> Result<Vec<ReportSummary>, StoreError> {
        let mut out: Vec<ReportSummary> = self
            .records
            .values()
            .map(|(id, r)| ReportSummary {
                id: *id,
                key: r.key.clone(),
                saved_at: r.saved_at,
                text_bytes: r.text.len(),
            })
            .collect();
        out.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then(b.id.cmp(&a.id)));
        Ok(out)
    }
}
