use std::fmt;

use crate::decode::TextEncoding;

#[derive(Debug)]
pub enum ReadError {
    /// File could not be opened or read.
    Io { file: String, message: String },
    /// Extension and content give no supported shape.
    UnsupportedFormat { file: String, reason: String },
    /// No encoding in the fallback chain decoded the bytes.
    Encoding { file: String, tried: Vec<TextEncoding> },
    /// Workbook container is broken or has no usable sheet.
    Spreadsheet { file: String, message: String },
    /// Delimited text could not be tokenized at all.
    Delimited { file: String, message: String },
    /// Export target could not be written.
    Write(String),
}

impl ReadError {
    /// Warning category used when the file is skipped instead of aborting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::UnsupportedFormat { .. } | Self::Spreadsheet { .. } | Self::Delimited { .. } => {
                "format"
            }
            Self::Encoding { .. } => "encoding",
            Self::Write(_) => "write",
        }
    }

    pub fn file(&self) -> Option<&str> {
        match self {
            Self::Io { file, .. }
            | Self::UnsupportedFormat { file, .. }
            | Self::Encoding { file, .. }
            | Self::Spreadsheet { file, .. }
            | Self::Delimited { file, .. } => Some(file),
            Self::Write(_) => None,
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { file, message } => write!(f, "{file}: cannot read file: {message}"),
            Self::UnsupportedFormat { file, reason } => {
                write!(f, "{file}: unsupported format: {reason}")
            }
            Self::Encoding { file, tried } => {
                let names: Vec<&str> = tried.iter().map(|e| e.label()).collect();
                write!(f, "{file}: no encoding could decode the file (tried {})", names.join(", "))
            }
            Self::Spreadsheet { file, message } => write!(f, "{file}: cannot read workbook: {message}"),
            Self::Delimited { file, message } => write!(f, "{file}: cannot parse delimited text: {message}"),
            Self::Write(msg) => write!(f, "write error: {msg}"),
        }
    }
}

impl std::error::Error for ReadError {}
