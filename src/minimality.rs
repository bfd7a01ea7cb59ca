//! Subset-minimality filtering.
//!
//! A cut set is minimal when no proper subset of it is itself a cut set.
//! The filter is the direct definition: every set is scanned against every
//! other, `O(n² · m)` in set count and average size. Post-normalization
//! counts are small relative to the intermediate combinatorial blow-up, so
//! the quadratic scan is not the bottleneck.

use std::collections::BTreeSet;

use crate::types::{CutSetCollection, NodeId};

/// Keep only the cut sets with no proper subset elsewhere in the collection.
///
/// Runs on the normalized collection; set-equal duplicates (which only occur
/// on unnormalized input) do not eliminate each other. Idempotent: the
/// output is an antichain under set inclusion and passes through unchanged
/// on a second application.
pub fn filter_minimal(collection: &CutSetCollection) -> CutSetCollection {
    let members: Vec<BTreeSet<NodeId>> = collection.iter().map(|s| s.member_set()).collect();

    let mut out = CutSetCollection::new();
    for (i, set) in collection.iter().enumerate() {
        let dominated = members.iter().enumerate().any(|(j, other)| {
            j != i && other.len() < members[i].len() && other.is_subset(&members[i])
        });
        if !dominated {
            out.push(set.clone());
        }
    }
    out
}
