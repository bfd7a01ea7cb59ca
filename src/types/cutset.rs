//! Cut sets and cut set collections.
//!
//! A cut set is a set of leaf failures whose simultaneous occurrence suffices
//! to cause the event under analysis. The evaluator produces cut sets as
//! leaf-id lists in enumeration order; repeated leaves (one leaf reached
//! through two gate branches) and repeated sets are legal in that raw form
//! and are removed by [`normalize`](crate::normalize::normalize).
//!
//! Semantic equality of two cut sets is equality of their member **sets**;
//! the derived `PartialEq` compares the underlying lists and is only suitable
//! where enumeration order is itself under test.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::node::NodeId;
use crate::model::FaultTree;

/// An ordered list of leaf ids standing for one joint-failure cause.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CutSet {
    leaves: Vec<NodeId>,
}

impl CutSet {
    /// Cut set containing a single leaf.
    pub fn singleton(leaf: NodeId) -> Self {
        Self { leaves: vec![leaf] }
    }

    /// Cut set from a list of leaves, kept in the given order.
    pub fn from_leaves(leaves: Vec<NodeId>) -> Self {
        Self { leaves }
    }

    /// The member leaves in enumeration order.
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    /// Number of member entries (duplicates counted until normalized).
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether the cut set has no members.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Union of two cut sets as used by the AND fold: plain concatenation.
    /// Duplicate removal is deferred to normalization.
    pub fn union(&self, other: &CutSet) -> CutSet {
        let mut leaves = Vec::with_capacity(self.leaves.len() + other.leaves.len());
        leaves.extend_from_slice(&self.leaves);
        leaves.extend_from_slice(&other.leaves);
        CutSet { leaves }
    }

    /// The member set, ignoring order and duplicates.
    pub fn member_set(&self) -> BTreeSet<NodeId> {
        self.leaves.iter().copied().collect()
    }

    /// Set equality: same members, any order, duplicates ignored.
    pub fn set_eq(&self, other: &CutSet) -> bool {
        self.member_set() == other.member_set()
    }

    /// Whether every member of `self` is a member of `other`.
    pub fn is_subset_of(&self, other: &CutSet) -> bool {
        self.member_set().is_subset(&other.member_set())
    }

    /// Copy with repeated members removed, first occurrence kept.
    pub fn deduped(&self) -> CutSet {
        let mut seen = BTreeSet::new();
        let leaves = self
            .leaves
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();
        CutSet { leaves }
    }

    /// Display form `"[name1, name2, ...]"` using the tree's node names.
    pub fn render(&self, tree: &FaultTree) -> String {
        let names: Vec<&str> = self.leaves.iter().map(|id| tree.display_name(*id)).collect();
        format!("[{}]", names.join(", "))
    }
}

/// An ordered sequence of cut sets.
///
/// Order is not semantically meaningful but is preserved for determinism and
/// testability. Duplicates are possible before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutSetCollection {
    sets: Vec<CutSet>,
}

impl CutSetCollection {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty collection with reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { sets: Vec::with_capacity(capacity) }
    }

    /// Append one cut set.
    pub fn push(&mut self, set: CutSet) {
        self.sets.push(set);
    }

    /// Append every cut set of `other`, preserving order.
    pub fn append(&mut self, other: CutSetCollection) {
        self.sets.extend(other.sets);
    }

    /// Number of cut sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether the collection holds no cut sets.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Iterate the cut sets in order.
    pub fn iter(&self) -> std::slice::Iter<'_, CutSet> {
        self.sets.iter()
    }

    /// The cut sets in order.
    pub fn sets(&self) -> &[CutSet] {
        &self.sets
    }

    /// Consume into the underlying list.
    pub fn into_sets(self) -> Vec<CutSet> {
        self.sets
    }

    /// Whether some cut set here is set-equal to `candidate`.
    pub fn contains_set(&self, candidate: &CutSet) -> bool {
        self.sets.iter().any(|s| s.set_eq(candidate))
    }

    /// Display form of every cut set, in collection order.
    pub fn render(&self, tree: &FaultTree) -> Vec<String> {
        self.sets.iter().map(|s| s.render(tree)).collect()
    }
}

impl From<Vec<CutSet>> for CutSetCollection {
    fn from(sets: Vec<CutSet>) -> Self {
        Self { sets }
    }
}

impl<'a> IntoIterator for &'a CutSetCollection {
    type Item = &'a CutSet;
    type IntoIter = std::slice::Iter<'a, CutSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sets.iter()
    }
}
