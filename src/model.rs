//! Fault tree arena and builder.
//!
//! The tree is built once per document version by the language front end and
//! is immutable for the duration of an analysis. Nodes live in an arena
//! indexed by [`NodeId`]; gates store child references resolved once at
//! build time through a name lookup table, so no reference validity needs
//! tracking across calls.
//!
//! A dangling child reference is deliberately **not** a build error: the
//! front end may hand over a tree mid-edit. The reference is kept unresolved
//! and surfaces as a structural diagnostic when an analysis touches it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::fingerprint::fingerprint_hex;
use crate::types::{NodeId, NodeKind};

/// Error type for fault tree construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Two nodes were declared with the same name.
    #[error("duplicate node name: {0}")]
    DuplicateName(String),
    /// More than one top event was declared.
    #[error("multiple top events: '{first}' and '{second}'")]
    MultipleTopEvents {
        /// First declared top event.
        first: String,
        /// Conflicting later declaration.
        second: String,
    },
    /// The declared gates form a cycle.
    #[error("cycle through node '{0}'")]
    Cycle(String),
}

/// A child reference held by a gate.
///
/// `target` is `None` when the referenced name did not resolve at build
/// time; the evaluator reports that as a structural diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRef {
    /// The name the gate declared.
    pub name: String,
    /// Resolved node, when the name exists in the tree.
    pub target: Option<NodeId>,
}

/// One node in the arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct NodeData {
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) children: Vec<ChildRef>,
    /// Distinguished condition child of an INHIBIT gate.
    pub(crate) condition: Option<ChildRef>,
}

/// A `{display_name, id}` pair for populating a selection control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeHandle {
    /// Name shown to the user.
    pub display_name: String,
    /// Arena id of the node.
    pub id: NodeId,
}

/// Immutable fault tree snapshot.
///
/// Read-only view over node identities, node kinds and per-gate ordered
/// child lists. Analyses are pure queries against this snapshot; concurrent
/// calls against the same tree are independent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultTree {
    nodes: Vec<NodeData>,
    /// Name lookup built once at construction.
    index: BTreeMap<String, NodeId>,
    top_event: Option<NodeId>,
}

impl FaultTree {
    /// Start building a tree.
    pub fn builder() -> FaultTreeBuilder {
        FaultTreeBuilder::default()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve a node name to its id.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// The unique top event, when one was declared.
    pub fn top_event(&self) -> Option<NodeId> {
        self.top_event
    }

    /// The single child of the top event, when declared and resolved.
    pub fn top_event_child(&self) -> Option<NodeId> {
        let top = self.top_event?;
        self.node(top).children.first().and_then(|c| c.target)
    }

    /// Display name of a node.
    pub fn display_name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    /// Kind of a node.
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    /// Ordered child references of a node (empty for leaves).
    pub fn children(&self, id: NodeId) -> &[ChildRef] {
        &self.node(id).children
    }

    /// The condition child of an INHIBIT gate.
    pub fn condition(&self, id: NodeId) -> Option<&ChildRef> {
        self.node(id).condition.as_ref()
    }

    /// Iterate all node ids in arena order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Handles for the nodes an analysis can start from: the top event and
    /// every gate, in arena (declaration) order.
    pub fn selectable_nodes(&self) -> Vec<NodeHandle> {
        self.node_ids()
            .filter(|id| {
                let kind = self.kind(*id);
                kind.is_gate() || kind == NodeKind::TopEvent
            })
            .map(|id| NodeHandle { display_name: self.node(id).name.clone(), id })
            .collect()
    }

    /// Canonical fingerprint of the tree structure.
    ///
    /// Identical trees (same nodes in the same order with the same wiring)
    /// produce identical fingerprints; any structural edit changes it.
    pub fn fingerprint(&self) -> String {
        fingerprint_hex(&self.nodes)
    }

    pub(crate) fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
}

/// Pending node declaration inside the builder.
#[derive(Debug, Clone)]
struct PendingNode {
    name: String,
    kind: NodeKind,
    children: Vec<String>,
    condition: Option<String>,
}

/// Builder used by the front end to hand a resolved tree to the kernel.
///
/// Children are referenced by name; resolution happens once in [`build`].
///
/// ```
/// use cutset_kernel::model::FaultTree;
///
/// let mut builder = FaultTree::builder();
/// builder
///     .component("Pump A")
///     .component("Pump B")
///     .or_gate("Pumps", ["Pump A", "Pump B"])
///     .top_event("Loss of coolant", "Pumps");
/// let tree = builder.build().unwrap();
/// assert_eq!(tree.len(), 4);
/// ```
///
/// [`build`]: FaultTreeBuilder::build
#[derive(Debug, Clone, Default)]
pub struct FaultTreeBuilder {
    nodes: Vec<PendingNode>,
}

impl FaultTreeBuilder {
    /// Declare a component leaf.
    pub fn component(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(name.into(), NodeKind::Component, Vec::new(), None)
    }

    /// Declare a condition leaf.
    pub fn condition(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(name.into(), NodeKind::Condition, Vec::new(), None)
    }

    /// Declare an AND gate over the named children.
    pub fn and_gate<I, S>(&mut self, name: impl Into<String>, children: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let children = children.into_iter().map(Into::into).collect();
        self.push(name.into(), NodeKind::And, children, None)
    }

    /// Declare an OR gate over the named children.
    pub fn or_gate<I, S>(&mut self, name: impl Into<String>, children: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let children = children.into_iter().map(Into::into).collect();
        self.push(name.into(), NodeKind::Or, children, None)
    }

    /// Declare a K-of-N voting gate over the named children.
    ///
    /// The threshold is validated at analysis time, not here: a tree
    /// mid-edit may carry `k` outside `1..=n` and still build.
    pub fn voting_gate<I, S>(&mut self, name: impl Into<String>, k: usize, children: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let children = children.into_iter().map(Into::into).collect();
        self.push(name.into(), NodeKind::KOfN { k }, children, None)
    }

    /// Declare an INHIBIT gate over the named children with a distinguished
    /// condition child.
    pub fn inhibit_gate<I, S>(
        &mut self,
        name: impl Into<String>,
        children: I,
        condition: impl Into<String>,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let children = children.into_iter().map(Into::into).collect();
        self.push(name.into(), NodeKind::Inhibit, children, Some(condition.into()))
    }

    /// Declare the top event with its single child.
    pub fn top_event(&mut self, name: impl Into<String>, child: impl Into<String>) -> &mut Self {
        self.push(name.into(), NodeKind::TopEvent, vec![child.into()], None)
    }

    fn push(
        &mut self,
        name: String,
        kind: NodeKind,
        children: Vec<String>,
        condition: Option<String>,
    ) -> &mut Self {
        self.nodes.push(PendingNode { name, kind, children, condition });
        self
    }

    /// Resolve names, validate global invariants and freeze the tree.
    ///
    /// Fails on duplicate names, more than one top event, or a cycle.
    /// Unknown child names do not fail the build (see module docs).
    pub fn build(&self) -> Result<FaultTree, ModelError> {
        let mut index: BTreeMap<String, NodeId> = BTreeMap::new();
        for (i, pending) in self.nodes.iter().enumerate() {
            if index.insert(pending.name.clone(), NodeId::new(i)).is_some() {
                return Err(ModelError::DuplicateName(pending.name.clone()));
            }
        }

        let mut top_event: Option<NodeId> = None;
        for (i, pending) in self.nodes.iter().enumerate() {
            if pending.kind == NodeKind::TopEvent {
                if let Some(first) = top_event {
                    return Err(ModelError::MultipleTopEvents {
                        first: self.nodes[first.index()].name.clone(),
                        second: pending.name.clone(),
                    });
                }
                top_event = Some(NodeId::new(i));
            }
        }

        let resolve = |name: &str| ChildRef {
            name: name.to_string(),
            target: index.get(name).copied(),
        };

        let nodes: Vec<NodeData> = self
            .nodes
            .iter()
            .map(|pending| NodeData {
                name: pending.name.clone(),
                kind: pending.kind,
                children: pending.children.iter().map(|c| resolve(c)).collect(),
                condition: pending.condition.as_deref().map(resolve),
            })
            .collect();

        let tree = FaultTree { nodes, index, top_event };
        tree.check_acyclic()?;
        Ok(tree)
    }
}

impl FaultTree {
    /// Depth-first cycle check over resolved edges.
    fn check_acyclic(&self) -> Result<(), ModelError> {
        const UNSEEN: u8 = 0;
        const OPEN: u8 = 1;
        const DONE: u8 = 2;

        let mut state = vec![UNSEEN; self.nodes.len()];

        for root in self.node_ids() {
            if state[root.index()] != UNSEEN {
                continue;
            }
            // Explicit stack: (node, next child position), so deep trees do
            // not overflow the build-time check.
            let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
            state[root.index()] = OPEN;

            while let Some(frame) = stack.last_mut() {
                let id = frame.0;
                let edges = self.resolved_edges(id);
                if frame.1 < edges.len() {
                    let next = edges[frame.1];
                    frame.1 += 1;
                    match state[next.index()] {
                        OPEN => return Err(ModelError::Cycle(self.node(next).name.clone())),
                        UNSEEN => {
                            state[next.index()] = OPEN;
                            stack.push((next, 0));
                        }
                        _ => {}
                    }
                } else {
                    state[id.index()] = DONE;
                    stack.pop();
                }
            }
        }
        Ok(())
    }

    fn resolved_edges(&self, id: NodeId) -> Vec<NodeId> {
        let node = self.node(id);
        node.children
            .iter()
            .chain(node.condition.iter())
            .filter_map(|c| c.target)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_lookup() {
        let mut builder = FaultTree::builder();
        builder
            .component("A")
            .component("B")
            .and_gate("G", ["A", "B"])
            .top_event("TOP", "G");
        let tree = builder.build().unwrap();

        assert_eq!(tree.len(), 4);
        let g = tree.lookup("G").unwrap();
        assert_eq!(tree.kind(g), NodeKind::And);
        assert_eq!(tree.children(g).len(), 2);
        assert_eq!(tree.top_event_child(), Some(g));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut builder = FaultTree::builder();
        builder.component("A").condition("A");
        assert_eq!(builder.build().unwrap_err(), ModelError::DuplicateName("A".to_string()));
    }

    #[test]
    fn test_multiple_top_events_rejected() {
        let mut builder = FaultTree::builder();
        builder.component("A").top_event("T1", "A").top_event("T2", "A");
        assert!(matches!(builder.build().unwrap_err(), ModelError::MultipleTopEvents { .. }));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut builder = FaultTree::builder();
        builder.and_gate("G1", ["G2"]).and_gate("G2", ["G1"]);
        assert!(matches!(builder.build().unwrap_err(), ModelError::Cycle(_)));
    }

    #[test]
    fn test_dangling_child_is_not_a_build_error() {
        let mut builder = FaultTree::builder();
        builder.or_gate("G", ["Nowhere"]);
        let tree = builder.build().unwrap();
        let g = tree.lookup("G").unwrap();
        assert_eq!(tree.children(g)[0].target, None);
        assert_eq!(tree.children(g)[0].name, "Nowhere");
    }

    #[test]
    fn test_shared_subtree_is_allowed() {
        // DAG sharing: one leaf feeding two gates is not a cycle.
        let mut builder = FaultTree::builder();
        builder
            .component("A")
            .or_gate("G1", ["A"])
            .or_gate("G2", ["A"])
            .and_gate("G3", ["G1", "G2"]);
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_selectable_nodes_are_gates_and_top() {
        let mut builder = FaultTree::builder();
        builder
            .component("A")
            .component("B")
            .or_gate("G", ["A", "B"])
            .top_event("TOP", "G");
        let tree = builder.build().unwrap();

        let handles = tree.selectable_nodes();
        let names: Vec<&str> = handles.iter().map(|h| h.display_name.as_str()).collect();
        assert_eq!(names, vec!["G", "TOP"]);
    }

    #[test]
    fn test_fingerprint_changes_with_structure() {
        let mut b1 = FaultTree::builder();
        b1.component("A").component("B").and_gate("G", ["A", "B"]);
        let mut b2 = FaultTree::builder();
        b2.component("A").component("B").or_gate("G", ["A", "B"]);

        let t1 = b1.build().unwrap();
        let t2 = b2.build().unwrap();
        assert_ne!(t1.fingerprint(), t2.fingerprint());
        assert_eq!(t1.fingerprint(), b1.build().unwrap().fingerprint());
    }
}
