// Property-based tests for normalization, reconciliation, merge and ranking.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::BTreeSet;

use proptest::prelude::*;
use uidmatch_io::InputFile;
use uidmatch_recon::config::EngineConfig;
use uidmatch_recon::normalize::normalize;
use uidmatch_recon::report::{merge_report_text, Language};
use uidmatch_recon::{aggregate, merge, reconcile, MergeMode, MergeRequest};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn config_64() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(64),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Identifier-shaped token; never a reserved word.
fn arb_id() -> impl Strategy<Value = String> {
    r"[A-Z]{1,2}[0-9]{1,4}"
}

fn arb_id_set() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(arb_id(), 0..40)
}

/// Only whitespace, quotes and byte-order marks.
fn arb_padding() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![
        Just(' '),
        Just('\t'),
        Just('\r'),
        Just('\n'),
        Just('"'),
        Just('\''),
        Just('\u{feff}'),
        Just('\u{a0}'),
    ], 0..12)
    .prop_map(|chars| chars.into_iter().collect())
}

fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Speeding".to_string()),
        Just("Parking".to_string()),
        Just("Red light".to_string()),
        Just("Seat belt".to_string()),
        Just("".to_string()),
        Just("nan".to_string()),
        r"[a-z]{3,8}",
    ]
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn padding_only_is_absent(raw in arb_padding()) {
        prop_assert_eq!(normalize(&raw), None);
    }

    #[test]
    fn padding_around_id_is_stripped(id in arb_id(), left in arb_padding(), right in arb_padding()) {
        let raw = format!("{left}{id}{right}");
        prop_assert_eq!(normalize(&raw), Some(id));
    }

    #[test]
    fn normalize_is_idempotent(raw in ".{0,20}") {
        if let Some(once) = normalize(&raw) {
            prop_assert_eq!(normalize(&once), Some(once.clone()));
        }
    }
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn partition_law(a in arb_id_set(), b in arb_id_set()) {
        let r = reconcile("A", &a, "B", &b);
        prop_assert_eq!(a.len(), r.intersection.len() + r.a_only.len());
        prop_assert_eq!(b.len(), r.intersection.len() + r.b_only.len());

        let both: BTreeSet<&String> = r.intersection.iter().collect();
        let only_a: BTreeSet<&String> = r.a_only.iter().collect();
        let only_b: BTreeSet<&String> = r.b_only.iter().collect();
        prop_assert!(both.is_disjoint(&only_a));
        prop_assert!(both.is_disjoint(&only_b));
        prop_assert!(only_a.is_disjoint(&only_b));

        let union: BTreeSet<&String> = a.union(&b).collect();
        let parts: BTreeSet<&String> = both.union(&only_a).copied().chain(only_b.iter().copied()).collect();
        prop_assert_eq!(union, parts);
    }

    #[test]
    fn symmetry(a in arb_id_set(), b in arb_id_set()) {
        let ab = reconcile("A", &a, "B", &b);
        let ba = reconcile("B", &b, "A", &a);
        prop_assert_eq!(&ab.intersection, &ba.intersection);
        prop_assert_eq!(&ab.a_only, &ba.b_only);
        prop_assert_eq!(&ab.b_only, &ba.a_only);
    }

    #[test]
    fn exclusive_lists_are_sorted(a in arb_id_set(), b in arb_id_set()) {
        let r = reconcile("A", &a, "B", &b);
        prop_assert!(r.a_only.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(r.b_only.windows(2).all(|w| w[0] < w[1]));
    }
}

// ---------------------------------------------------------------------------
// Violations
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn rank_law(labels in prop::collection::vec(arb_label(), 0..60)) {
        let report = aggregate(labels.iter().map(String::as_str));

        let ranks: Vec<usize> = report.records.iter().map(|r| r.rank).collect();
        let expected: Vec<usize> = (1..=report.unique).collect();
        prop_assert_eq!(ranks, expected);
        prop_assert!(report.records.windows(2).all(|w| w[0].count >= w[1].count));
        prop_assert_eq!(report.records.iter().map(|r| r.count).sum::<usize>(), report.total);

        let retained = labels.iter().filter(|l| normalize(l).is_some()).count();
        prop_assert_eq!(report.total, retained);
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

fn csv_file(name: &str, ids: &[String]) -> InputFile {
    let mut body = String::from("doc_num;extra\n");
    for id in ids {
        body.push_str(id);
        body.push_str(";x\n");
    }
    InputFile::from_bytes(name, body.into_bytes())
}

proptest! {
    #![proptest_config(config_64())]

    #[test]
    fn merge_union_is_idempotent(
        a in prop::collection::vec(arb_id(), 0..20),
        b in prop::collection::vec(arb_id(), 0..20),
    ) {
        let request = || MergeRequest::new(
            vec![csv_file("a.csv", &a), csv_file("b.csv", &b)],
            vec!["doc_num".into()],
            MergeMode::Union,
        );
        let config = EngineConfig::default();
        let first = merge(&request(), &config).unwrap().result;
        let second = merge(&request(), &config).unwrap().result;
        prop_assert_eq!(&first.columns[0].values, &second.columns[0].values);

        let expected: BTreeSet<String> = a.iter().chain(&b).cloned().collect();
        prop_assert_eq!(&first.columns[0].values, &expected);
    }

    #[test]
    fn preview_renders_at_most_limit(
        ids in prop::collection::btree_set(arb_id(), 1..30),
        limit in 0usize..10,
    ) {
        let list: Vec<String> = ids.iter().cloned().collect();
        let request = MergeRequest::new(
            vec![csv_file("a.csv", &list), csv_file("b.csv", &[])],
            vec!["doc_num".into()],
            MergeMode::Union,
        );
        let result = merge(&request, &EngineConfig::default()).unwrap().result;
        let text = merge_report_text(&result, Language::Uz, limit);

        let shown = text.lines().filter(|l| ids.contains(*l)).count();
        if limit == 0 || ids.len() <= limit {
            prop_assert_eq!(shown, ids.len());
            prop_assert!(!text.contains("va yana"));
        } else {
            prop_assert_eq!(shown, limit);
            let trailer = format!("... va yana {} yozuv", ids.len() - limit);
            prop_assert!(text.contains(&trailer));
        }
    }
}
