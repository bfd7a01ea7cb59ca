//! Structural leaf importance across minimal cut sets.
//!
//! Measures how central each leaf is to the analyzed hazard by counting the
//! minimal cut sets it participates in. A leaf sitting in many small cut
//! sets matters more than one appearing in a single wide combination; a
//! leaf whose smallest cut set has size 1 is a single point of failure.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::fingerprint::fingerprint_hex;
use crate::model::FaultTree;
use crate::types::{CutSetCollection, NodeId};

/// Importance of a single leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafImportance {
    /// Display name of the leaf.
    pub name: String,
    /// Arena id of the leaf.
    pub id: NodeId,
    /// Number of minimal cut sets containing this leaf.
    pub cut_set_count: u32,
    /// Fraction of all minimal cut sets containing this leaf.
    pub cut_set_fraction: f32,
    /// Size of the smallest minimal cut set containing this leaf.
    pub smallest_cut_set: usize,
    /// Whether the leaf alone suffices to cause the event.
    pub is_single_point: bool,
}

/// Importance scores for every leaf that occurs in the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportanceRanking {
    /// Individual scores, sorted by leaf name.
    pub scores: Vec<LeafImportance>,
    /// Number of minimal cut sets analyzed.
    pub total_cut_sets: usize,
    /// Canonical hash of the scores for integrity checks.
    pub ranking_hash: String,
}

impl ImportanceRanking {
    /// Build a ranking from computed scores.
    pub fn new(mut scores: Vec<LeafImportance>, total_cut_sets: usize) -> Self {
        // Sort by name for determinism.
        scores.sort_by(|a, b| a.name.cmp(&b.name));
        let ranking_hash = fingerprint_hex(&scores);
        Self { scores, total_cut_sets, ranking_hash }
    }

    /// Score for a specific leaf by name.
    pub fn get(&self, name: &str) -> Option<&LeafImportance> {
        self.scores.iter().find(|s| s.name == name)
    }

    /// The `n` most important leaves: highest cut set count first, smaller
    /// smallest-cut-set breaking ties, name as the final tiebreak.
    pub fn top_ranked(&self, n: usize) -> Vec<&LeafImportance> {
        let mut sorted: Vec<_> = self.scores.iter().collect();
        sorted.sort_by(|a, b| {
            b.cut_set_count
                .cmp(&a.cut_set_count)
                .then(a.smallest_cut_set.cmp(&b.smallest_cut_set))
                .then(a.name.cmp(&b.name))
        });
        sorted.into_iter().take(n).collect()
    }

    /// All single points of failure, in name order.
    pub fn single_points(&self) -> Vec<&LeafImportance> {
        self.scores.iter().filter(|s| s.is_single_point).collect()
    }
}

/// Compute leaf importance over a (minimal) cut set collection.
pub fn compute_importance(tree: &FaultTree, collection: &CutSetCollection) -> ImportanceRanking {
    // Leaf -> (containing set count, smallest containing set size).
    let mut leaf_data: BTreeMap<NodeId, (u32, usize)> = BTreeMap::new();

    let total = collection.len();
    for set in collection {
        let size = set.member_set().len();
        for id in set.member_set() {
            let entry = leaf_data.entry(id).or_insert((0, usize::MAX));
            entry.0 += 1;
            entry.1 = entry.1.min(size);
        }
    }

    let scores: Vec<LeafImportance> = leaf_data
        .into_iter()
        .map(|(id, (count, smallest))| LeafImportance {
            name: tree.display_name(id).to_string(),
            id,
            cut_set_count: count,
            cut_set_fraction: if total == 0 { 0.0 } else { count as f32 / total as f32 },
            smallest_cut_set: smallest,
            is_single_point: smallest == 1,
        })
        .collect();

    ImportanceRanking::new(scores, total)
}
