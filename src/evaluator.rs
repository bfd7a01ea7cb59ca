//! Recursive cut set enumeration over gate semantics.
//!
//! `evaluate` computes the raw (non-minimal, possibly duplicate-laden) cut
//! set collection for the subtree rooted at any node, dispatching on the
//! node kind:
//!
//! - **Leaf**: the single-set collection `[{leaf}]`
//! - **AND / INHIBIT**: fold of a binary concatenate-product over all
//!   children (INHIBIT folds its condition child too), i.e. the Cartesian
//!   cross-product of the children's collections, each pair unioned
//! - **OR**: concatenation of the children's collections; children are
//!   alternatives, not co-requirements, so no cross-product is taken
//! - **K-of-N**: for every `i` in `[k, n]`, every `i`-combination of
//!   children is folded like an AND and the results appended
//!
//! The empty collection is the fold's identity element and is preserved
//! exactly: a gate with zero children (or a subtree suppressed by a
//! structural defect) contributes no cut sets, which is a legitimate result
//! distinct from a failed analysis.
//!
//! Every recursion boundary checks the cancellation flag and the visit /
//! cut-set ceilings; exceeding either unwinds with an
//! [`EvaluationInterrupt`] which the top-level query turns into an aborted
//! report. Structural defects never unwind: they suppress the offending
//! subtree and record a [`Diagnostic`].

use crate::combinations::combinations;
use crate::limits::{AnalysisLimits, CancellationFlag};
use crate::model::FaultTree;
use crate::types::diagnostic::{Diagnostic, DiagnosticKind};
use crate::types::{CutSet, CutSetCollection, NodeId, NodeKind};

/// Why an evaluation stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationInterrupt {
    /// The node visit ceiling was exceeded.
    #[error("node visit ceiling exceeded ({visited} visited, limit {limit})")]
    NodeBudget {
        /// Nodes visited when the evaluation stopped.
        visited: usize,
        /// Configured ceiling.
        limit: usize,
    },
    /// The cut set materialization ceiling was exceeded.
    #[error("cut set ceiling exceeded ({generated} materialized, limit {limit})")]
    CutSetBudget {
        /// Cut sets materialized when the evaluation stopped.
        generated: usize,
        /// Configured ceiling.
        limit: usize,
    },
    /// The caller cancelled the analysis.
    #[error("analysis cancelled")]
    Cancelled,
}

/// Recursive evaluator over one immutable tree snapshot.
///
/// Single-threaded and purely functional over the snapshot; all mutable
/// state (counters, collected diagnostics) is local to the evaluator, so
/// concurrent analyses of the same tree are independent.
pub struct GateEvaluator<'a> {
    tree: &'a FaultTree,
    limits: &'a AnalysisLimits,
    cancel: &'a CancellationFlag,
    visited: usize,
    generated: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> GateEvaluator<'a> {
    /// Create an evaluator for one analysis run.
    pub fn new(tree: &'a FaultTree, limits: &'a AnalysisLimits, cancel: &'a CancellationFlag) -> Self {
        Self {
            tree,
            limits,
            cancel,
            visited: 0,
            generated: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Nodes visited so far.
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Cut sets materialized so far.
    pub fn generated(&self) -> usize {
        self.generated
    }

    /// Structural diagnostics collected so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the evaluator, yielding its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Raw cut set collection for the subtree rooted at `id`.
    pub fn evaluate(&mut self, id: NodeId) -> Result<CutSetCollection, EvaluationInterrupt> {
        if self.cancel.is_cancelled() {
            return Err(EvaluationInterrupt::Cancelled);
        }
        self.visited += 1;
        if self.visited > self.limits.max_visited_nodes {
            return Err(EvaluationInterrupt::NodeBudget {
                visited: self.visited,
                limit: self.limits.max_visited_nodes,
            });
        }

        // Ids minted by another tree are a caller bug: fail fast in debug,
        // degrade to a structural defect in release.
        if id.index() >= self.tree.len() {
            debug_assert!(false, "node id {id} is not in this tree's arena");
            self.structural(DiagnosticKind::NodeOutOfRange { index: id.index() });
            return Ok(CutSetCollection::new());
        }

        match self.tree.kind(id) {
            NodeKind::Component | NodeKind::Condition => {
                self.charge_sets(1)?;
                Ok(CutSetCollection::from(vec![CutSet::singleton(id)]))
            }
            NodeKind::TopEvent => self.evaluate_top_event(id),
            NodeKind::And => {
                let children = self.resolved_children(id);
                self.evaluate_product(&children)
            }
            NodeKind::Inhibit => self.evaluate_inhibit(id),
            NodeKind::Or => self.evaluate_or(id),
            NodeKind::KOfN { k } => self.evaluate_voting(id, k),
        }
    }

    /// A top event evaluated directly stands for its single child.
    fn evaluate_top_event(&mut self, id: NodeId) -> Result<CutSetCollection, EvaluationInterrupt> {
        match self.tree.top_event_child() {
            Some(child) => self.evaluate(child),
            None => {
                self.structural(DiagnosticKind::UnresolvedTopEventChild {
                    top_event: self.tree.display_name(id).to_string(),
                });
                Ok(CutSetCollection::new())
            }
        }
    }

    fn evaluate_or(&mut self, id: NodeId) -> Result<CutSetCollection, EvaluationInterrupt> {
        let children = self.resolved_children(id);
        let mut out = CutSetCollection::new();
        for child in children {
            out.append(self.evaluate(child)?);
        }
        Ok(out)
    }

    fn evaluate_inhibit(&mut self, id: NodeId) -> Result<CutSetCollection, EvaluationInterrupt> {
        let mut members = self.resolved_children(id);
        match self.tree.condition(id).and_then(|c| c.target) {
            Some(condition) => members.push(condition),
            None => {
                self.structural(DiagnosticKind::UnresolvedInhibitCondition {
                    gate: self.tree.display_name(id).to_string(),
                });
            }
        }
        self.evaluate_product(&members)
    }

    fn evaluate_voting(
        &mut self,
        id: NodeId,
        k: usize,
    ) -> Result<CutSetCollection, EvaluationInterrupt> {
        let children = self.resolved_children(id);
        let n = self.tree.children(id).len();
        if n == 0 {
            // Degenerate childless gate, same as And/Or: nothing to fail.
            return Ok(CutSetCollection::new());
        }
        if k < 1 || k > n {
            self.structural(DiagnosticKind::InvalidVotingThreshold {
                gate: self.tree.display_name(id).to_string(),
                k,
                n,
            });
            return Ok(CutSetCollection::new());
        }

        let mut out = CutSetCollection::new();
        // Any >= k children failing jointly causes the gate, so every
        // combination size from k up to n is enumerated.
        for size in k..=children.len() {
            for combo in combinations(&children, size) {
                out.append(self.evaluate_product(&combo)?);
            }
        }
        Ok(out)
    }

    /// AND-style fold of the concatenate-product over the given members.
    fn evaluate_product(
        &mut self,
        members: &[NodeId],
    ) -> Result<CutSetCollection, EvaluationInterrupt> {
        let mut acc = CutSetCollection::new();
        for &member in members {
            let rhs = self.evaluate(member)?;
            acc = self.concat_product(acc, rhs)?;
        }
        Ok(acc)
    }

    /// Binary concatenate operator of the AND fold.
    ///
    /// The empty collection is the identity on both sides; otherwise every
    /// pair of cut sets is unioned. Losing the identity cases would silently
    /// drop valid cut sets, so they are matched explicitly.
    fn concat_product(
        &mut self,
        a: CutSetCollection,
        b: CutSetCollection,
    ) -> Result<CutSetCollection, EvaluationInterrupt> {
        if a.is_empty() {
            return Ok(b);
        }
        if b.is_empty() {
            return Ok(a);
        }
        // Charge before allocating, so the ceiling bounds memory too.
        let pairs = a.len().saturating_mul(b.len());
        self.charge_sets(pairs)?;
        let mut out = CutSetCollection::with_capacity(pairs);
        for x in a.iter() {
            for y in b.iter() {
                out.push(x.union(y));
            }
        }
        Ok(out)
    }

    fn resolved_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let gate = self.tree.display_name(id).to_string();
        let mut out = Vec::with_capacity(self.tree.children(id).len());
        let unresolved: Vec<String> = self
            .tree
            .children(id)
            .iter()
            .filter(|c| c.target.is_none())
            .map(|c| c.name.clone())
            .collect();
        for child in self.tree.children(id) {
            if let Some(target) = child.target {
                out.push(target);
            }
        }
        for child in unresolved {
            self.structural(DiagnosticKind::UnresolvedChild { gate: gate.clone(), child });
        }
        out
    }

    fn structural(&mut self, kind: DiagnosticKind) {
        let diagnostic = Diagnostic::structural(kind);
        tracing::warn!(diagnostic = %diagnostic, "structural defect in fault tree");
        self.diagnostics.push(diagnostic);
    }

    fn charge_sets(&mut self, count: usize) -> Result<(), EvaluationInterrupt> {
        self.generated = self.generated.saturating_add(count);
        if self.generated > self.limits.max_cut_sets {
            return Err(EvaluationInterrupt::CutSetBudget {
                generated: self.generated,
                limit: self.limits.max_cut_sets,
            });
        }
        Ok(())
    }
}
