// Excel import (first sheet only) and column-list export (xlsx only)
//
// Import: the first worksheet is read, its first row becomes the header.
// Export: a flat column dump for download. Not a round-trip format.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, XlsxError};

use crate::error::ReadError;
use crate::table::Table;

/// Sheet name used for merged-column exports.
pub const EXPORT_SHEET_NAME: &str = "Merged Data";

/// Read the first worksheet of an xlsx / xlsm / xls / xlsb / ods buffer.
pub fn read_first_sheet(bytes: &[u8]) -> Result<Table, String> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| "Excel file contains no sheets".to_string())?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<String>>());

    let mut table = Table::default();
    for row in rows.by_ref() {
        if row.iter().any(|c| !c.trim().is_empty()) {
            table.headers = row;
            break;
        }
    }

    for row in rows {
        if row.iter().all(|c| c.is_empty()) {
            continue;
        }
        table.rows.push(row);
    }

    Ok(table)
}

/// Text rendering of one cell, matching what a "read everything as text" import shows.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Format nicely: integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => format!("{}", n),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#{:?}", e),
        // Serial number; identifiers are never dates in practice.
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// One output column: header text plus its values, top to bottom.
#[derive(Debug, Clone)]
pub struct SheetColumn<'a> {
    pub header: &'a str,
    pub values: Vec<&'a str>,
}

/// Build a single-sheet workbook. Shorter columns end early; the cells below
/// them are left blank, so every column spans the longest one's height.
fn build_workbook(columns: &[SheetColumn<'_>]) -> Result<XlsxWorkbook, XlsxError> {
    let mut workbook = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet().set_name(EXPORT_SHEET_NAME)?;

    for (col_idx, column) in columns.iter().enumerate() {
        let col = col_idx as u16;
        worksheet.write_string_with_format(0, col, column.header, &header_format)?;
        for (row_idx, value) in column.values.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(row_idx as u32 + 1, col, *value)?;
            }
        }
        let widest = column
            .values
            .iter()
            .map(|v| v.chars().count())
            .chain(std::iter::once(column.header.chars().count()))
            .max()
            .unwrap_or(8);
        worksheet.set_column_width(col, (widest.clamp(8, 60) + 2) as f64)?;
    }

    Ok(workbook)
}

pub fn write_columns(columns: &[SheetColumn<'_>], path: &Path) -> Result<(), ReadError> {
    let mut workbook =
        build_workbook(columns).map_err(|e| ReadError::Write(format!("Failed to build sheet: {}", e)))?;
    workbook
        .save(path)
        .map_err(|e| ReadError::Write(format!("Failed to save XLSX file: {}", e)))
}

pub fn write_columns_to_buffer(columns: &[SheetColumn<'_>]) -> Result<Vec<u8>, ReadError> {
    let mut workbook =
        build_workbook(columns).map_err(|e| ReadError::Write(format!("Failed to build sheet: {}", e)))?;
    workbook
        .save_to_buffer()
        .map_err(|e| ReadError::Write(format!("Failed to encode XLSX file: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Vec<SheetColumn<'static>> {
        vec![
            SheetColumn { header: "doc_num", values: vec!["A1", "A2", "A3"] },
            SheetColumn { header: "uid", values: vec!["U1"] },
        ]
    }

    #[test]
    fn test_export_then_import_pads_short_columns() {
        let bytes = write_columns_to_buffer(&sample()).unwrap();
        let table = read_first_sheet(&bytes).unwrap();

        assert_eq!(table.headers, vec!["doc_num", "uid"]);
        assert_eq!(table.rows.len(), 3);
        let uid: Vec<&str> = table.column(1).collect();
        assert_eq!(uid, vec!["U1", "", ""]);
        let doc: Vec<&str> = table.column(0).collect();
        assert_eq!(doc, vec!["A1", "A2", "A3"]);
    }

    #[test]
    fn test_export_to_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("merged.xlsx");
        write_columns(&sample(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
        let table = read_first_sheet(&bytes).unwrap();
        assert_eq!(table.headers.len(), 2);
    }

    #[test]
    fn test_numeric_cells_render_without_decimals() {
        let mut workbook = XlsxWorkbook::new();
        let ws = workbook.add_worksheet();
        ws.write_string(0, 0, "doc_num").unwrap();
        ws.write_number(1, 0, 1234567.0).unwrap();
        ws.write_number(2, 0, 12.5).unwrap();
        ws.write_boolean(3, 0, true).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = read_first_sheet(&bytes).unwrap();
        let col: Vec<&str> = table.column(0).collect();
        assert_eq!(col, vec!["1234567", "12.5", "TRUE"]);
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(read_first_sheet(b"PK\x03\x04not really a zip").is_err());
    }
}
