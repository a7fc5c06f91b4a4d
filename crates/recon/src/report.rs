// Plain-text report rendering (uz / ru) and export naming.
//
// Layouts are fixed: downstream users diff these files month over month, so
// line order and spacing must not drift.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uidmatch_io::text::write_lines;
use uidmatch_io::xlsx::SheetColumn;

use crate::merge::MergeResult;
use crate::reconcile::ReconciliationResult;
use crate::violations::ViolationReport;

const RULE_SHORT: usize = 44;
const RULE_WIDE: usize = 49;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Uz,
    #[default]
    Ru,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uz => "uz",
            Self::Ru => "ru",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uz" => Ok(Self::Uz),
            "ru" => Ok(Self::Ru),
            other => Err(format!("unknown language '{other}' (expected uz or ru)")),
        }
    }
}

/// `12345` -> `12 345` (sep = ' ') or `12,345` (sep = ',').
pub fn group_thousands(n: usize, sep: char) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

fn spaced(n: usize) -> String {
    group_thousands(n, ' ')
}

fn commas(n: usize) -> String {
    group_thousands(n, ',')
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Totals block: A total, B total, divider, both, A-only, B-only.
pub fn comparison_text(result: &ReconciliationResult, language: Language) -> String {
    let a = &result.a_name;
    let b = &result.b_name;
    let c = &result.counts;
    let rule = "-".repeat(RULE_SHORT);

    let (a_total, b_total, both, a_only, b_only) = match language {
        Language::Uz => (
            format!("{a} bergan faylda jami: {}", spaced(c.a_total)),
            format!("{b} bergan faylda jami: {}", spaced(c.b_total)),
            format!("Ikkalasida ham mavjud bo'lganlar soni: {}", spaced(c.both)),
            format!("{a} bergan faylda mavjud, {b} bergan faylda yo'q soni: {}", spaced(c.a_only)),
            format!("{b} bergan faylda mavjud, {a} bergan faylda yo'q soni: {}", spaced(c.b_only)),
        ),
        Language::Ru => (
            format!("В файле от {a} всего: {}", spaced(c.a_total)),
            format!("В файле от {b} всего: {}", spaced(c.b_total)),
            format!("Присутствуют в обоих файлах: {}", spaced(c.both)),
            format!("Есть в {a}, нет в {b}: {}", spaced(c.a_only)),
            format!("Есть в {b}, нет в {a}: {}", spaced(c.b_only)),
        ),
    };

    let lines: [&str; 14] = [
        &rule,
        &a_total,
        "",
        &b_total,
        "",
        &rule,
        "",
        &both,
        "",
        &a_only,
        "",
        &b_only,
        "",
        &rule,
    ];
    lines.join("\n")
}

pub fn comparison_title(result: &ReconciliationResult, language: Language, period: Option<&str>) -> String {
    let pair = format!("{}-{}", result.a_name, result.b_name);
    let period = period.map(str::trim).filter(|p| !p.is_empty());
    match (language, period) {
        (Language::Uz, Some(p)) => format!("{p} uchun statistika ({pair})"),
        (Language::Uz, None) => format!("Solishtirish ({pair})"),
        (Language::Ru, Some(p)) => format!("Статистика за {p} ({pair})"),
        (Language::Ru, None) => format!("Сравнение ({pair})"),
    }
}

/// Title line, blank line, totals block.
pub fn comparison_report(result: &ReconciliationResult, language: Language, period: Option<&str>) -> String {
    format!("{}\n\n{}", comparison_title(result, language, period), comparison_text(result, language))
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

struct MergeLabels {
    banner: &'static str,
    rows: &'static str,
    found: &'static str,
    summary: &'static str,
    unique: &'static str,
    more: &'static str,
    download: &'static str,
    total: &'static str,
}

fn merge_labels(language: Language) -> MergeLabels {
    match language {
        Language::Uz => MergeLabels {
            banner: "FAYLLARNI BIRLASHTIRISH NATIJALARI",
            rows: "Qatorlar",
            found: "Topilgan ustunlar",
            summary: "UMUMIY NATIJALAR:",
            unique: "noyob yozuv",
            more: "... va yana {n} yozuv",
            download: "[TXT yoki Excel faylni yuklab oling - barcha yozuvlar uchun]",
            total: "Jami: {n} yozuv",
        },
        Language::Ru => MergeLabels {
            banner: "РЕЗУЛЬТАТЫ ОБЪЕДИНЕНИЯ ФАЙЛОВ",
            rows: "Строк",
            found: "Найдено столбцов",
            summary: "ОБЩИЕ РЕЗУЛЬТАТЫ:",
            unique: "уникальных записей",
            more: "... и еще {n} записей",
            download: "[Скачайте TXT или Excel файл для просмотра всех записей]",
            total: "Всего: {n} записей",
        },
    }
}

/// Merge report. `preview_limit == 0` renders every value; otherwise each
/// column shows at most `preview_limit` values followed by an omission
/// trailer.
pub fn merge_report_text(result: &MergeResult, language: Language, preview_limit: usize) -> String {
    let l = merge_labels(language);
    let wide = "=".repeat(RULE_WIDE);
    let thin = "-".repeat(RULE_WIDE);
    let mut lines: Vec<String> = vec![wide.clone(), l.banner.into(), wide, String::new()];

    for (i, file) in result.files.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, file.name));
        lines.push(format!("   {}: {}", l.rows, commas(file.rows)));
        lines.push(format!("   {}: {}", l.found, file.found_columns().join(", ")));
        lines.push(String::new());
    }

    lines.push(thin.clone());
    lines.push(l.summary.into());
    lines.push(thin.clone());
    for column in &result.columns {
        lines.push(format!("{}: {} {}", column.name, commas(column.len()), l.unique));
    }
    lines.push(thin);
    lines.push(String::new());

    for column in &result.columns {
        lines.push(format!("=== {} ===", column.name));
        lines.push(String::new());

        let total = column.len();
        if preview_limit > 0 && total > preview_limit {
            lines.extend(column.values.iter().take(preview_limit).cloned());
            lines.push(String::new());
            lines.push(l.more.replace("{n}", &commas(total - preview_limit)));
            lines.push(String::new());
            lines.push(l.download.into());
        } else {
            lines.extend(column.values.iter().cloned());
        }

        lines.push(String::new());
        lines.push(l.total.replace("{n}", &commas(total)));
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Spreadsheet view of a merge: one column per requested name, values
/// sorted. The writer pads shorter columns.
pub fn merge_sheet_columns(result: &MergeResult) -> Vec<SheetColumn<'_>> {
    result
        .columns
        .iter()
        .map(|c| SheetColumn { header: &c.name, values: c.values.iter().map(String::as_str).collect() })
        .collect()
}

// ---------------------------------------------------------------------------
// Violations
// ---------------------------------------------------------------------------

/// Rank / count / label table followed by the total line.
pub fn violation_table_text(report: &ViolationReport) -> String {
    let mut lines = vec!["№  count  notify_text".to_string(), String::new()];
    for r in &report.records {
        lines.push(format!("{}  {}  {}", r.rank, r.count, r.label));
    }
    lines.push(String::new());
    lines.push(format!("  {}  TOTAL", report.total));
    lines.join("\n")
}

/// Localized header block (title, timestamp, totals) plus the table.
pub fn violation_report_text(
    report: &ViolationReport,
    language: Language,
    generated_at: &DateTime<Local>,
) -> String {
    let (title, date, total, unique) = match language {
        Language::Uz => {
            ("QOIDABUZARLIKLAR HISOBOTI", "Tuzilgan sana", "Jami qoidabuzarliklar", "Unikal turlar")
        }
        Language::Ru => ("ОТЧЕТ ПО НАРУШЕНИЯМ", "Дата формирования", "Всего нарушений", "Уникальных типов"),
    };
    let rule = "=".repeat(RULE_WIDE);
    format!(
        "{rule}\n{title}\n{rule}\n{date}: {}\n{total}: {}\n{unique}: {}\n{rule}\n\n{}",
        generated_at.format("%d.%m.%Y %H:%M:%S"),
        report.total,
        report.unique,
        violation_table_text(report)
    )
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

/// One identifier per line, no header.
pub fn identifier_list_text(ids: &[String]) -> String {
    write_lines(ids.iter().map(String::as_str))
}

fn file_stamp(at: &DateTime<Local>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// Source names become file-name fragments; path separators and blanks
/// are replaced.
fn name_fragment(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_whitespace() || matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect()
}

/// `{from}_minus_{minus}_{YYYYMMDD_HHMMSS}.txt`
pub fn difference_file_name(from: &str, minus: &str, at: &DateTime<Local>) -> String {
    format!("{}_minus_{}_{}.txt", name_fragment(from), name_fragment(minus), file_stamp(at))
}

/// `{stem}_{YYYYMMDD_HHMMSS}.{ext}`, e.g. `merged_data_20250101_120000.xlsx`.
pub fn export_file_name(stem: &str, at: &DateTime<Local>, ext: &str) -> String {
    format!("{stem}_{}.{ext}", file_stamp(at))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::merge::{ColumnHit, FileStats, MergeMode, MergedColumn};
    use crate::reconcile::reconcile;
    use crate::violations::aggregate;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn fixed_time() -> DateTime<Local> {
        let naive = NaiveDate::from_ymd_opt(2025, 3, 7)
            .and_then(|d| d.and_hms_opt(9, 5, 1))
            .unwrap();
        Local.from_local_datetime(&naive).unwrap()
    }

    fn merge_result(values: &[&str]) -> MergeResult {
        MergeResult {
            mode: MergeMode::Union,
            files: vec![FileStats {
                name: "a.csv".into(),
                format: None,
                encoding: None,
                rows: 1234,
                columns: vec![ColumnHit {
                    requested: "doc_num".into(),
                    header: Some("doc_num".into()),
                    strategy: None,
                    found: true,
                    values: values.len(),
                }],
            }],
            columns: vec![MergedColumn { name: "doc_num".into(), values: set(values) }],
            merged_at: fixed_time(),
        }
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0, ' '), "0");
        assert_eq!(group_thousands(999, ' '), "999");
        assert_eq!(group_thousands(1000, ' '), "1 000");
        assert_eq!(group_thousands(1234567, ','), "1,234,567");
    }

    #[test]
    fn comparison_uz_layout() {
        let r = reconcile("Telecom", &set(&["X1", "X2", "X3"]), "Pochta", &set(&["X2", "X3", "X4"]));
        let text = comparison_text(&r, Language::Uz);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "-".repeat(44));
        assert_eq!(lines[1], "Telecom bergan faylda jami: 3");
        assert_eq!(lines[3], "Pochta bergan faylda jami: 3");
        assert_eq!(lines[7], "Ikkalasida ham mavjud bo'lganlar soni: 2");
        assert_eq!(lines[9], "Telecom bergan faylda mavjud, Pochta bergan faylda yo'q soni: 1");
        assert_eq!(lines[11], "Pochta bergan faylda mavjud, Telecom bergan faylda yo'q soni: 1");
        assert_eq!(lines.len(), 14);
    }

    #[test]
    fn comparison_ru_report_with_period() {
        let r = reconcile("A", &set(&["1"]), "B", &set(&[]));
        let text = comparison_report(&r, Language::Ru, Some("Avgust"));
        assert!(text.starts_with("Статистика за Avgust (A-B)\n\n"));
        assert!(text.contains("Есть в A, нет в B: 1"));
        assert!(comparison_report(&r, Language::Ru, Some("  ")).starts_with("Сравнение (A-B)"));
        assert!(comparison_report(&r, Language::Uz, None).starts_with("Solishtirish (A-B)"));
    }

    #[test]
    fn merge_preview_truncates_with_trailer() {
        let result = merge_result(&["v1", "v2", "v3", "v4", "v5"]);
        let text = merge_report_text(&result, Language::Ru, 2);
        assert!(text.contains("=== doc_num ===\n\nv1\nv2\n\n... и еще 3 записей\n\n"));
        assert!(!text.contains("v3"));
        assert!(text.contains("Всего: 5 записей"));
        assert!(text.contains("   Строк: 1,234"));
        assert!(text.contains("   Найдено столбцов: doc_num"));
        assert!(text.contains("doc_num: 5 уникальных записей"));
    }

    #[test]
    fn merge_zero_limit_renders_everything() {
        let result = merge_result(&["v1", "v2", "v3"]);
        let text = merge_report_text(&result, Language::Uz, 0);
        assert!(text.contains("v1\nv2\nv3\n\nJami: 3 yozuv"));
        assert!(!text.contains("va yana"));
        assert!(text.starts_with(&format!("{}\nFAYLLARNI BIRLASHTIRISH NATIJALARI", "=".repeat(49))));
    }

    #[test]
    fn merge_limit_equal_to_count_is_not_truncated() {
        let text = merge_report_text(&merge_result(&["a", "b"]), Language::Ru, 2);
        assert!(!text.contains("и еще"));
    }

    #[test]
    fn violation_table_layout() {
        let report = aggregate(["Speeding", "Parking", "Speeding"]);
        assert_eq!(
            violation_table_text(&report),
            "№  count  notify_text\n\n1  2  Speeding\n2  1  Parking\n\n  3  TOTAL"
        );
    }

    #[test]
    fn violation_header_is_localized() {
        let report = aggregate(["x"]);
        let text = violation_report_text(&report, Language::Uz, &fixed_time());
        assert!(text.contains("QOIDABUZARLIKLAR HISOBOTI"));
        assert!(text.contains("Tuzilgan sana: 07.03.2025 09:05:01"));
        assert!(text.contains("Jami qoidabuzarliklar: 1\nUnikal turlar: 1"));
        let ru = violation_report_text(&report, Language::Ru, &fixed_time());
        assert!(ru.contains("Всего нарушений: 1"));
    }

    #[test]
    fn identifier_list_has_no_header() {
        assert_eq!(identifier_list_text(&["A".into(), "B".into()]), "A\nB\n");
        assert_eq!(identifier_list_text(&[]), "");
    }

    #[test]
    fn export_names() {
        let at = fixed_time();
        assert_eq!(difference_file_name("Telecom", "Pochta", &at), "Telecom_minus_Pochta_20250307_090501.txt");
        assert_eq!(difference_file_name("A B", "c/d", &at), "A_B_minus_c_d_20250307_090501.txt");
        assert_eq!(export_file_name("merged_data", &at, "xlsx"), "merged_data_20250307_090501.xlsx");
    }

    #[test]
    fn sheet_columns_follow_result_order() {
        let result = merge_result(&["b", "a"]);
        let cols = merge_sheet_columns(&result);
        assert_eq!(cols[0].header, "doc_num");
        assert_eq!(cols[0].values, vec!["a", "b"]);
    }

    #[test]
    fn language_parses() {
        assert_eq!("UZ".parse::<Language>(), Ok(Language::Uz));
        assert!("en".parse::<Language>().is_err());
    }
}
