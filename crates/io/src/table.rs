// In-memory shapes produced by the readers.

/// Header row plus data rows. Rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of one column; short rows yield empty text.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }
}

/// Content extracted from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Table(Table),
    /// Raw non-blank lines of a line-oriented file.
    Lines(Vec<String>),
}

impl Content {
    /// Data rows (tabular) or non-blank lines (line-oriented).
    pub fn row_count(&self) -> usize {
        match self {
            Self::Table(table) => table.row_count(),
            Self::Lines(lines) => lines.len(),
        }
    }

    pub fn headers(&self) -> &[String] {
        match self {
            Self::Table(table) => &table.headers,
            Self::Lines(_) => &[],
        }
    }
}
