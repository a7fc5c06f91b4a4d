use std::fmt;

use serde::Serialize;
use uidmatch_io::ReadError;

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    Format,
    Encoding,
    Io,
    Column,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::Encoding => "encoding",
            Self::Io => "io",
            Self::Column => "column",
        }
    }
}

/// A file skipped (or partially used) without aborting the operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileWarning {
    pub file: String,
    pub kind: WarningKind,
    pub message: String,
}

impl FileWarning {
    pub fn new(file: impl Into<String>, kind: WarningKind, message: impl Into<String>) -> Self {
        Self { file: file.into(), kind, message: message.into() }
    }

    pub fn from_read_error(file: &str, err: &ReadError) -> Self {
        let kind = match err.kind() {
            "encoding" => WarningKind::Encoding,
            "io" | "write" => WarningKind::Io,
            _ => WarningKind::Format,
        };
        Self::new(file, kind, err.to_string())
    }
}

impl fmt::Display for FileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// A result plus the files that were skipped to produce it.
///
/// `warnings` is always present; an empty list means every submitted file
/// was processed.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome<T> {
    pub result: T,
    pub warnings: Vec<FileWarning>,
}

impl<T> Outcome<T> {
    pub fn new(result: T, warnings: Vec<FileWarning>) -> Self {
        Self { result, warnings }
    }

    pub fn clean(result: T) -> Self {
        Self { result, warnings: Vec::new() }
    }

    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome { result: f(self.result), warnings: self.warnings }
    }
}
