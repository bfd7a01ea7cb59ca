//! Node identity and node kinds for the fault tree arena.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node inside a [`FaultTree`](crate::model::FaultTree) arena.
///
/// Wraps the node's arena index and implements `Ord` for deterministic
/// ordering. A `NodeId` is only meaningful for the tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a NodeId from an arena index.
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// The arena index of this node.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of a fault tree node.
///
/// Structure (children, the inhibit condition, the voting width `n`) lives in
/// the arena; the kind carries only what distinguishes the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// The single hazard at the root of the tree. Has exactly one child.
    TopEvent,
    /// Leaf: a component failure.
    Component,
    /// Leaf: an enabling condition.
    Condition,
    /// Fires when all children fail.
    And,
    /// Fires when any child fails.
    Or,
    /// Fires when at least `k` of the `n` children fail.
    KOfN {
        /// Failure threshold; valid when `1 <= k <= n`.
        k: usize,
    },
    /// Fires when all children fail while the condition child holds.
    Inhibit,
}

impl NodeKind {
    /// Whether this node is a leaf (terminal failure cause).
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Component | Self::Condition)
    }

    /// Whether this node is a gate (has child semantics).
    pub fn is_gate(&self) -> bool {
        matches!(self, Self::And | Self::Or | Self::KOfN { .. } | Self::Inhibit)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopEvent => write!(f, "top event"),
            Self::Component => write!(f, "component"),
            Self::Condition => write!(f, "condition"),
            Self::And => write!(f, "AND gate"),
            Self::Or => write!(f, "OR gate"),
            Self::KOfN { k } => write!(f, "{k}-of-N gate"),
            Self::Inhibit => write!(f, "INHIBIT gate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_ordering() {
        let a = NodeId::new(1);
        let b = NodeId::new(2);
        assert!(a < b);
        assert_eq!(a, NodeId::new(1));
    }

    #[test]
    fn test_kind_predicates() {
        assert!(NodeKind::Component.is_leaf());
        assert!(NodeKind::Condition.is_leaf());
        assert!(!NodeKind::Or.is_leaf());
        assert!(NodeKind::KOfN { k: 2 }.is_gate());
        assert!(!NodeKind::TopEvent.is_gate());
        assert!(!NodeKind::TopEvent.is_leaf());
    }
}
