// Line-oriented value lists: one value per line, optional header line.
//
// Header detection is not positional here. Header tokens are rejected by
// value during normalization, wherever they appear.

/// Non-blank lines with line terminators removed. Cells are left raw.
///
/// `\n`, `\r\n` and bare `\r` all end a line.
pub fn read_lines(content: &str) -> Vec<String> {
    content
        .split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Render identifiers one per line (no header), newline-terminated.
pub fn write_lines<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for value in values {
        out.push_str(value);
        out.push('\n');
    }
    out
}
