use std::fmt;

use uidmatch_io::ReadError;

use crate::model::FileWarning;

#[derive(Debug)]
pub enum ReconError {
    /// Request rejected before any file was opened.
    Validation(String),
    /// Every submitted file was skipped. Carries the per-file reasons.
    NoUsableFiles { source: String, warnings: Vec<FileWarning> },
    /// Required column absent (aggregation only).
    ColumnNotFound { file: String, column: String, available: Vec<String> },
    /// Merge mode with no defined behavior.
    UnsupportedMergeMode(String),
    /// Fatal read failure outside the per-file skip policy.
    Read(ReadError),
    /// TOML parse / validation error.
    Config(String),
}

impl ReconError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::UnsupportedMergeMode(_))
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "invalid request: {msg}"),
            Self::NoUsableFiles { source, warnings } => {
                write!(f, "{source}: no usable files ({} skipped)", warnings.len())?;
                for w in warnings {
                    write!(f, "\n  {w}")?;
                }
                Ok(())
            }
            Self::ColumnNotFound { file, column, available } => {
                let list = if available.is_empty() {
                    "(none)".to_string()
                } else {
                    available.iter().map(|c| format!("'{c}'")).collect::<Vec<_>>().join(", ")
                };
                write!(f, "{file}: column '{column}' not found; available columns: {list}")
            }
            Self::UnsupportedMergeMode(mode) => {
                write!(f, "merge mode '{mode}' has no defined behavior; use 'union'")
            }
            Self::Read(err) => write!(f, "{err}"),
            Self::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ReadError> for ReconError {
    fn from(err: ReadError) -> Self {
        Self::Read(err)
    }
}
