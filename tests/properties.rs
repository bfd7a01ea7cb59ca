//! Property tests for the normalization and minimality laws.
//!
//! Cut sets are built against a fixed tree of generic leaves so the
//! properties range over arbitrary collections, not hand-picked examples.

use std::collections::BTreeSet;

use proptest::prelude::*;

use cutset_kernel::{
    filter_minimal, normalize, AnalysisStatus, CutSet, CutSetAnalyzer, CutSetCollection, FaultTree,
    NodeId,
};

const LEAF_COUNT: usize = 10;

/// A tree holding `LEAF_COUNT` free-standing component leaves, used as an
/// id namespace for generated cut sets.
fn leaf_arena() -> FaultTree {
    let mut builder = FaultTree::builder();
    for i in 0..LEAF_COUNT {
        builder.component(format!("L{i}"));
    }
    builder.build().unwrap()
}

fn leaf_ids(tree: &FaultTree) -> Vec<NodeId> {
    (0..LEAF_COUNT)
        .map(|i| tree.lookup(&format!("L{i}")).unwrap())
        .collect()
}

fn collection_from(tree: &FaultTree, raw: &[Vec<usize>]) -> CutSetCollection {
    let ids = leaf_ids(tree);
    CutSetCollection::from(
        raw.iter()
            .map(|set| CutSet::from_leaves(set.iter().map(|&i| ids[i]).collect()))
            .collect::<Vec<_>>(),
    )
}

fn member_sets(collection: &CutSetCollection) -> Vec<BTreeSet<NodeId>> {
    collection.iter().map(|s| s.member_set()).collect()
}

prop_compose! {
    /// Collections of up to 24 cut sets over the leaf namespace, with
    /// duplicate leaves and duplicate sets allowed.
    fn raw_collections()(
        sets in prop::collection::vec(
            prop::collection::vec(0..LEAF_COUNT, 1..6),
            0..24,
        )
    ) -> Vec<Vec<usize>> {
        sets
    }
}

proptest! {
    #[test]
    fn prop_normalize_removes_all_duplicates(raw in raw_collections()) {
        let tree = leaf_arena();
        let normalized = normalize(collection_from(&tree, &raw));

        // No duplicate leaves inside any set.
        for set in &normalized {
            prop_assert_eq!(set.len(), set.member_set().len());
        }
        // No set-equal pair across the collection.
        let members = member_sets(&normalized);
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                prop_assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn prop_filtered_result_is_an_antichain(raw in raw_collections()) {
        let tree = leaf_arena();
        let minimal = filter_minimal(&normalize(collection_from(&tree, &raw)));

        let members = member_sets(&minimal);
        for (i, a) in members.iter().enumerate() {
            for (j, b) in members.iter().enumerate() {
                if i != j {
                    prop_assert!(!a.is_subset(b), "{a:?} ⊆ {b:?}");
                }
            }
        }
    }

    #[test]
    fn prop_filter_is_idempotent(raw in raw_collections()) {
        let tree = leaf_arena();
        let once = filter_minimal(&normalize(collection_from(&tree, &raw)));
        let twice = filter_minimal(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_every_input_is_covered(raw in raw_collections()) {
        // Each input cut set must be dominated by (or equal to) something
        // kept in the minimal result: filtering never loses a failure mode.
        let tree = leaf_arena();
        let collection = collection_from(&tree, &raw);
        let minimal = filter_minimal(&normalize(collection.clone()));
        let kept = member_sets(&minimal);

        for set in &collection {
            let members = set.member_set();
            prop_assert!(
                kept.iter().any(|t| t.is_subset(&members)),
                "input {members:?} lost"
            );
        }
    }

    #[test]
    fn prop_minimal_sets_come_from_the_input(raw in raw_collections()) {
        let tree = leaf_arena();
        let collection = collection_from(&tree, &raw);
        let minimal = filter_minimal(&normalize(collection.clone()));
        let inputs = member_sets(&collection);

        for set in &minimal {
            prop_assert!(inputs.contains(&set.member_set()));
        }
    }

    #[test]
    fn prop_voting_gate_minimal_sets_are_the_k_subsets(
        n in 2usize..6,
        k_offset in 0usize..5,
    ) {
        // For leaves as children, the minimal cut sets of a k-of-n gate are
        // exactly the k-subsets: C(n, k) of them, each of size k.
        let k = 1 + k_offset % n;
        let mut builder = FaultTree::builder();
        for i in 0..n {
            builder.component(format!("C{i}"));
        }
        let children: Vec<String> = (0..n).map(|i| format!("C{i}")).collect();
        builder.voting_gate("Vote", k, children).top_event("TOP", "Vote");
        let tree = builder.build().unwrap();

        let report = CutSetAnalyzer::default().determine_minimal_cut_sets(&tree, None);
        prop_assert_eq!(report.status, AnalysisStatus::Complete);

        let binomial = {
            let mut c = 1usize;
            for i in 0..k {
                c = c * (n - i) / (i + 1);
            }
            c
        };
        prop_assert_eq!(report.cut_sets.len(), binomial);
        for set in &report.cut_sets {
            prop_assert_eq!(set.member_set().len(), k);
        }
    }
}
