// Set reconciliation between two identifier collections.

use std::collections::BTreeSet;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::dataset::SourceDataset;

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconciliationCounts {
    pub a_total: usize,
    pub b_total: usize,
    pub both: usize,
    pub a_only: usize,
    pub b_only: usize,
}

/// Intersection and exclusive differences of two sources.
///
/// All three lists are sorted lexicographically.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationResult {
    pub a_name: String,
    pub b_name: String,
    pub a_files: Vec<String>,
    pub b_files: Vec<String>,
    pub counts: ReconciliationCounts,
    pub intersection: Vec<String>,
    pub a_only: Vec<String>,
    pub b_only: Vec<String>,
    pub generated_at: DateTime<Local>,
}

impl ReconciliationResult {
    /// The same comparison seen from the other side.
    pub fn swapped(self) -> Self {
        Self {
            a_name: self.b_name,
            b_name: self.a_name,
            a_files: self.b_files,
            b_files: self.a_files,
            counts: ReconciliationCounts {
                a_total: self.counts.b_total,
                b_total: self.counts.a_total,
                both: self.counts.both,
                a_only: self.counts.b_only,
                b_only: self.counts.a_only,
            },
            intersection: self.intersection,
            a_only: self.b_only,
            b_only: self.a_only,
            generated_at: self.generated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Reconcile two identifier sets.
pub fn reconcile(
    a_name: &str,
    a: &BTreeSet<String>,
    b_name: &str,
    b: &BTreeSet<String>,
) -> ReconciliationResult {
    let intersection: Vec<String> = a.intersection(b).cloned().collect();
    let a_only: Vec<String> = a.difference(b).cloned().collect();
    let b_only: Vec<String> = b.difference(a).cloned().collect();

    let counts = ReconciliationCounts {
        a_total: a.len(),
        b_total: b.len(),
        both: intersection.len(),
        a_only: a_only.len(),
        b_only: b_only.len(),
    };
    log::info!(
        "{a_name} vs {b_name}: {} / {} total, {} in both, {} only in {a_name}, {} only in {b_name}",
        counts.a_total,
        counts.b_total,
        counts.both,
        counts.a_only,
        counts.b_only
    );

    ReconciliationResult {
        a_name: a_name.to_string(),
        b_name: b_name.to_string(),
        a_files: Vec::new(),
        b_files: Vec::new(),
        counts,
        intersection,
        a_only,
        b_only,
        generated_at: Local::now(),
    }
}

/// Reconcile two loaded datasets, keeping their names and file lists.
pub fn compare(a: &SourceDataset, b: &SourceDataset) -> ReconciliationResult {
    let mut result = reconcile(&a.name, &a.identifiers, &b.name, &b.identifiers);
    result.a_files = a.files.clone();
    result.b_files = b.files.clone();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn overlapping_sources() {
        let r = reconcile("A", &set(&["X1", "X2", "X3"]), "B", &set(&["X2", "X3", "X4"]));
        assert_eq!(r.intersection, vec!["X2", "X3"]);
        assert_eq!(r.a_only, vec!["X1"]);
        assert_eq!(r.b_only, vec!["X4"]);
        assert_eq!(
            r.counts,
            ReconciliationCounts { a_total: 3, b_total: 3, both: 2, a_only: 1, b_only: 1 }
        );
    }

    #[test]
    fn empty_inputs_are_empty_sets() {
        let r = reconcile("A", &BTreeSet::new(), "B", &set(&["X"]));
        assert!(r.intersection.is_empty());
        assert!(r.a_only.is_empty());
        assert_eq!(r.b_only, vec!["X"]);
    }

    #[test]
    fn differences_are_sorted() {
        let r = reconcile("A", &set(&["b", "c", "a"]), "B", &BTreeSet::new());
        assert_eq!(r.a_only, vec!["a", "b", "c"]);
    }

    #[test]
    fn swapped_matches_reversed_call() {
        let a = set(&["1", "2"]);
        let b = set(&["2", "3"]);
        let forward = reconcile("A", &a, "B", &b).swapped();
        let reverse = reconcile("B", &b, "A", &a);
        assert_eq!(forward.a_name, reverse.a_name);
        assert_eq!(forward.a_only, reverse.a_only);
        assert_eq!(forward.b_only, reverse.b_only);
        assert_eq!(forward.counts, reverse.counts);
    }

    #[test]
    fn compare_keeps_file_lists() {
        let mut a = SourceDataset::from_values("Telecom", ["X1"]);
        a.files.push("tl.csv".into());
        let b = SourceDataset::from_values("Pochta", ["X1", "X2"]);
        let r = compare(&a, &b);
        assert_eq!(r.a_files, vec!["tl.csv"]);
        assert_eq!(r.counts.b_only, 1);
    }
}
