//! Cut set normalization.
//!
//! The raw enumeration is duplicate-laden in two ways: a leaf reachable
//! through two gate branches is unioned twice into one cut set by the AND
//! fold, and shared subtrees produce whole repeated cut sets. Normalization
//! removes both while preserving enumeration order.

use std::collections::HashSet;

use crate::types::{CutSetCollection, NodeId};

/// Remove repeated leaves inside each cut set and repeated cut sets across
/// the collection.
///
/// Within a cut set the first occurrence of each leaf is kept; across the
/// collection the first cut set of each member set is kept. Order is
/// otherwise preserved.
pub fn normalize(collection: CutSetCollection) -> CutSetCollection {
    let mut seen: HashSet<Vec<NodeId>> = HashSet::new();
    let mut out = CutSetCollection::with_capacity(collection.len());

    for set in collection.into_sets() {
        let deduped = set.deduped();
        // Sorted member list as the set identity, so order never splits
        // equal sets.
        let key: Vec<NodeId> = deduped.member_set().into_iter().collect();
        if seen.insert(key) {
            out.push(deduped);
        }
    }
    out
}
