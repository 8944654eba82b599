use boolsearch_core::{build, eval_conjunction, eval_disjunction, normalize, DocId, IndexStore, InvertedIndex};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tempfile::tempdir;

fn field() -> impl Strategy<Value = BTreeMap<DocId, Vec<String>>> {
    prop::collection::btree_map(1u32..40, prop::collection::vec("[a-z]{1,6}", 0..12), 0..20)
}

fn set(ids: &[DocId]) -> BTreeSet<DocId> {
    ids.iter().copied().collect()
}

proptest! {
    #[test]
    fn normalization_is_idempotent(token in "[a-zA-Z0-9.,'()-]{0,16}") {
        let once = normalize([&token]);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn df_matches_postings_and_tf_is_positive(titles in field(), bodies in field()) {
        let index = build(&titles, &bodies);
        let mut total = 0u64;
        for (_, entry) in index.iter() {
            prop_assert_eq!(entry.df as usize, entry.postings.len());
            prop_assert!(entry.postings.values().all(|tf| *tf >= 1));
            total += entry.postings.values().map(|tf| *tf as u64).sum::<u64>();
        }
        let expected: usize = titles.values().chain(bodies.values()).map(Vec::len).sum();
        prop_assert_eq!(total, expected as u64);
    }

    #[test]
    fn persist_then_load_is_identity(titles in field(), bodies in field()) {
        let index = build(&titles, &bodies);
        let dir = tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("index.json"));
        store.persist(&index).unwrap();
        prop_assert_eq!(store.load().unwrap(), index);
    }

    #[test]
    fn conjunction_is_subset_of_each_term(bodies in field(), a in "[a-z]{1,6}", b in "[a-z]{1,6}") {
        let index = build(&BTreeMap::new(), &bodies);
        let both = eval_conjunction(&index, &[&a, &b]);
        for doc_id in &both {
            prop_assert!(index.tf(&a, *doc_id) >= 1 && index.tf(&b, *doc_id) >= 1);
        }
    }
}

#[test]
fn empty_index_round_trips() {
    let dir = tempdir().unwrap();
    let store = IndexStore::new(dir.path().join("index.json"));
    store.persist(&InvertedIndex::new()).unwrap();
    assert_eq!(store.load().unwrap(), InvertedIndex::new());
}

#[test]
fn conjunction_of_overlapping_terms() {
    let t = |s: &str| s.to_string();
    let bodies = BTreeMap::from([
        (1, vec![t("a")]),
        (2, vec![t("a"), t("b")]),
        (3, vec![t("b"), t("a")]),
        (4, vec![t("b")]),
    ]);
    let index = build(&BTreeMap::new(), &bodies);
    assert_eq!(eval_conjunction(&index, &["a", "b"]), set(&[2, 3]));
    assert_eq!(eval_conjunction::<&str>(&index, &[]), set(&[]));
}

#[test]
fn disjunction_of_overlapping_sets() {
    assert_eq!(eval_disjunction([set(&[1, 2]), set(&[2, 3])]), set(&[1, 2, 3]));
}
