// Identifier normalization.
//
// Header tokens reappear mid-stream when a source concatenates exports, so
// they are rejected by value wherever they occur, not by position.

const BOM: char = '\u{feff}';

/// Values that are column headers or missing-value markers, never identifiers.
pub const RESERVED_TOKENS: [&str; 6] = ["uid", "id", "doc_num", "docnum", "nan", "none"];

/// Whitespace, byte-order marks and quote characters never bound an identifier.
fn is_padding(c: char) -> bool {
    c.is_whitespace() || c == BOM || c == '"' || c == '\''
}

/// Canonicalize one raw cell. `None` means "absent".
///
/// Padding is stripped to any depth, not one quote layer: `'"X"'` becomes
/// `X`, so a value made only of quotes and whitespace is always absent.
pub fn normalize(raw: &str) -> Option<String> {
    let value = raw.trim_matches(is_padding);

    if value.is_empty() || is_reserved(value) {
        return None;
    }
    Some(value.to_string())
}

pub fn is_reserved(value: &str) -> bool {
    RESERVED_TOKENS.iter().any(|t| value.eq_ignore_ascii_case(t))
}

/// Normalize a sequence, dropping absents. Order and duplicates are kept.
pub fn normalize_all<'a>(values: impl IntoIterator<Item = &'a str>) -> impl Iterator<Item = String> {
    values.into_iter().filter_map(normalize)
}
