// Column-name resolution across inconsistently named sources.
//
// Strategies run in a fixed order and the first hit wins:
//   1. exact match
//   2. case-insensitive match (surrounding whitespace ignored)
//   3. substring match in either direction
//   4. first column (merge scope only)
// Within a strategy the leftmost column wins.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Exact,
    CaseInsensitive,
    Substring,
    FirstColumn,
}

impl MatchStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::CaseInsensitive => "case_insensitive",
            Self::Substring => "substring",
            Self::FirstColumn => "first_column",
        }
    }
}

/// Which caller is resolving; controls the last-resort fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveScope {
    /// Multi-file merge: falls back to the first column.
    Merge,
    /// Single required column: no fallback.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMatch {
    pub index: usize,
    pub header: String,
    pub strategy: MatchStrategy,
}

pub fn resolve_column(headers: &[String], requested: &str, scope: ResolveScope) -> Option<ColumnMatch> {
    let hit = |index: usize, strategy: MatchStrategy| ColumnMatch {
        index,
        header: headers[index].clone(),
        strategy,
    };

    if let Some(i) = headers.iter().position(|h| h == requested) {
        return Some(hit(i, MatchStrategy::Exact));
    }

    let wanted = requested.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    if let Some(i) = headers.iter().position(|h| h.trim().to_lowercase() == wanted) {
        return Some(hit(i, MatchStrategy::CaseInsensitive));
    }

    let substring = headers.iter().position(|h| {
        let candidate = h.trim().to_lowercase();
        !candidate.is_empty() && (candidate.contains(&wanted) || wanted.contains(&candidate))
    });
    if let Some(i) = substring {
        return Some(hit(i, MatchStrategy::Substring));
    }

    match scope {
        ResolveScope::Merge if !headers.is_empty() => Some(hit(0, MatchStrategy::FirstColumn)),
        _ => None,
    }
}
