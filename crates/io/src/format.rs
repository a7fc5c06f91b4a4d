// File shape detection: extension first, content sniffing second.

use std::path::Path;

use serde::Serialize;

/// ZIP container (xlsx, xlsm, ods).
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// OLE2 compound document (legacy xls).
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const PDF_MAGIC: &[u8] = b"%PDF";
const SNIFF_WINDOW: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    /// Comma / semicolon / tab separated, quoted fields, header row.
    Delimited,
    /// Single-sheet workbook, first row is the header.
    Spreadsheet,
    /// One value per line, optional header line.
    Lines,
}

impl FileFormat {
    /// Detect format from the file name's extension.
    pub fn from_extension(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "tsv" => Some(Self::Delimited),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(Self::Spreadsheet),
            "txt" | "lst" => Some(Self::Lines),
            _ => None,
        }
    }

    /// Guess the format from leading bytes when the name gives no hint.
    pub fn sniff(bytes: &[u8]) -> Result<Self, String> {
        if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
            return Ok(Self::Spreadsheet);
        }
        if bytes.starts_with(PDF_MAGIC) {
            return Err("PDF documents are not supported".into());
        }
        let window = &bytes[..bytes.len().min(SNIFF_WINDOW)];
        if window.contains(&0) {
            return Err("binary content (NUL bytes)".into());
        }
        Ok(Self::Lines)
    }

    pub fn detect(name: &str, bytes: &[u8]) -> Result<Self, String> {
        match Self::from_extension(name) {
            Some(format) => Ok(format),
            None => Self::sniff(bytes),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Delimited => "delimited",
            Self::Spreadsheet => "spreadsheet",
            Self::Lines => "lines",
        }
    }
}
