// Delimited text import (CSV / semicolon / TSV)

use crate::table::Table;

/// Delimiter used when no candidate splits the sample into several fields.
/// Source exports are semicolon-separated far more often than not.
const FALLBACK_DELIMITER: u8 = b';';

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b','];
    let sample_lines: Vec<&str> = content.split(['\r', '\n']).filter(|l| !l.trim().is_empty()).take(10).collect();

    if sample_lines.is_empty() {
        return FALLBACK_DELIMITER;
    }

    let mut best = FALLBACK_DELIMITER;
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Score: (number of lines with same field count as line 1) * field_count
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Parsed delimited text and the delimiter it used.
#[derive(Debug, Clone)]
pub struct ParsedDelimited {
    pub table: Table,
    pub delimiter: u8,
}

pub fn parse(content: &str) -> Result<ParsedDelimited, String> {
    parse_with_delimiter(content, sniff_delimiter(content))
}

/// Parse with an explicit delimiter. The first non-blank record is the header
/// row; rows may have any number of fields.
pub fn parse_with_delimiter(content: &str, delimiter: u8) -> Result<ParsedDelimited, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(b'"')
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut table = Table::default();
    let mut header_seen = false;

    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;

        let fields: Vec<String> = record.iter().map(|f| f.to_string()).collect();

        if !header_seen {
            if fields.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            table.headers = fields
                .into_iter()
                .enumerate()
                .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{feff}').to_string() } else { h })
                .collect();
            header_seen = true;
            continue;
        }

        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }
        table.rows.push(fields);
    }

    Ok(ParsedDelimited { table, delimiter })
}
