//! Top-level minimal cut set query.
//!
//! `determine_minimal_cut_sets` composes the pipeline:
//!
//! 1. Resolve the start node (explicit name, or the top event's child)
//! 2. Raw enumeration via [`GateEvaluator`]
//! 3. Duplicate removal via [`normalize`]
//! 4. Subset-minimality via [`filter_minimal`]
//!
//! The query is pure over the tree snapshot and independently re-entrant;
//! the report carries everything display layers need, including the top
//! event name threaded explicitly rather than through any process-wide
//! state.

use serde::{Deserialize, Serialize};

use crate::evaluator::{EvaluationInterrupt, GateEvaluator};
use crate::fingerprint::fingerprint_hex;
use crate::limits::{AnalysisLimits, CancellationFlag};
use crate::minimality::filter_minimal;
use crate::model::FaultTree;
use crate::normalize::normalize;
use crate::types::diagnostic::{Diagnostic, DiagnosticKind};
use crate::types::{CutSetCollection, NodeId};
use crate::CUTSET_KERNEL_SCHEMA_VERSION;

/// How the analysis ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// The pipeline ran to completion. The result may still be empty and
    /// may carry structural diagnostics.
    Complete,
    /// Aborted: the node visit ceiling was exceeded.
    AbortedNodeBudget {
        /// Nodes visited when the analysis stopped.
        visited: usize,
        /// Configured ceiling.
        limit: usize,
    },
    /// Aborted: the cut set materialization ceiling was exceeded.
    AbortedCutSetBudget {
        /// Cut sets materialized when the analysis stopped.
        generated: usize,
        /// Configured ceiling.
        limit: usize,
    },
    /// The caller cancelled the analysis through its [`CancellationFlag`].
    Cancelled,
}

impl AnalysisStatus {
    /// Whether the analysis ran to completion.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Evaluation counters for one analysis run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// Nodes visited by the evaluator.
    pub visited_nodes: usize,
    /// Cut sets materialized by the evaluator (including intermediates).
    pub generated_cut_sets: usize,
    /// Raw cut sets produced for the start node.
    pub raw_cut_sets: usize,
    /// Cut sets remaining after duplicate removal.
    pub deduplicated_cut_sets: usize,
    /// Minimal cut sets in the final result.
    pub minimal_cut_sets: usize,
}

/// Result of one minimal cut set analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version of this report shape.
    pub schema_version: String,
    /// Display name of the tree's top event, when one exists.
    pub top_event: Option<String>,
    /// Display name of the node the analysis actually started from.
    pub start_node: Option<String>,
    /// The minimal cut sets (empty when aborted or structurally defective).
    pub cut_sets: CutSetCollection,
    /// Leaves that alone suffice to cause the analyzed event, in collection
    /// order.
    pub single_points_of_failure: Vec<String>,
    /// Structural and resource diagnostics collected during the run.
    pub diagnostics: Vec<Diagnostic>,
    /// How the run ended.
    pub status: AnalysisStatus,
    /// Evaluation counters.
    pub stats: AnalysisStats,
    /// Canonical fingerprint of the result content.
    pub fingerprint: String,
}

impl AnalysisReport {
    /// Display form `"[id1, id2, ...]"` of every minimal cut set.
    pub fn render_cut_sets(&self, tree: &FaultTree) -> Vec<String> {
        self.cut_sets.render(tree)
    }
}

/// The leaves that appear alone as a size-1 cut set of the collection.
///
/// On a minimal collection these are the single component failures that
/// suffice on their own; callers highlight them as critical.
pub fn single_points_of_failure(collection: &CutSetCollection) -> Vec<NodeId> {
    collection
        .iter()
        .filter(|s| s.len() == 1)
        .map(|s| s.leaves()[0])
        .collect()
}

/// Minimal cut set analyzer over immutable tree snapshots.
///
/// Holds only the resource ceilings; every call is an independent pure
/// query, so one analyzer may serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct CutSetAnalyzer {
    limits: AnalysisLimits,
}

impl CutSetAnalyzer {
    /// Analyzer with explicit ceilings.
    pub fn new(limits: AnalysisLimits) -> Self {
        Self { limits }
    }

    /// The configured ceilings.
    pub fn limits(&self) -> &AnalysisLimits {
        &self.limits
    }

    /// Compute the minimal cut sets for `start` (by name), or for the top
    /// event's child when `start` is `None`.
    pub fn determine_minimal_cut_sets(
        &self,
        tree: &FaultTree,
        start: Option<&str>,
    ) -> AnalysisReport {
        self.determine_with_cancel(tree, start, &CancellationFlag::new())
    }

    /// Like [`determine_minimal_cut_sets`], checking `cancel` at every
    /// recursion boundary so a newer request can supersede this one.
    ///
    /// [`determine_minimal_cut_sets`]: Self::determine_minimal_cut_sets
    pub fn determine_with_cancel(
        &self,
        tree: &FaultTree,
        start: Option<&str>,
        cancel: &CancellationFlag,
    ) -> AnalysisReport {
        let top_event = tree.top_event().map(|id| tree.display_name(id).to_string());
        let mut diagnostics = Vec::new();

        let start_id = self.resolve_start(tree, start, &mut diagnostics);
        let start_node = start_id.map(|id| tree.display_name(id).to_string());
        tracing::debug!(start = ?start_node, "starting cut set analysis");

        let mut evaluator = GateEvaluator::new(tree, &self.limits, cancel);
        let (status, raw) = match start_id {
            None => (AnalysisStatus::Complete, CutSetCollection::new()),
            Some(id) => match evaluator.evaluate(id) {
                Ok(raw) => (AnalysisStatus::Complete, raw),
                Err(interrupt) => {
                    tracing::warn!(interrupt = %interrupt, "cut set analysis aborted");
                    diagnostics.push(interrupt_diagnostic(interrupt));
                    (interrupt_status(interrupt), CutSetCollection::new())
                }
            },
        };

        let mut stats = AnalysisStats {
            visited_nodes: evaluator.visited(),
            generated_cut_sets: evaluator.generated(),
            raw_cut_sets: raw.len(),
            ..AnalysisStats::default()
        };
        diagnostics.extend(evaluator.into_diagnostics());

        let deduplicated = normalize(raw);
        stats.deduplicated_cut_sets = deduplicated.len();
        let minimal = filter_minimal(&deduplicated);
        stats.minimal_cut_sets = minimal.len();

        let spof_names: Vec<String> = single_points_of_failure(&minimal)
            .into_iter()
            .map(|id| tree.display_name(id).to_string())
            .collect();

        // Fingerprint over names, not arena ids, so re-building an
        // identical document yields an identical fingerprint.
        let rendered = minimal.render(tree);
        let fingerprint = fingerprint_hex(&(&top_event, &start_node, &status, &rendered));

        AnalysisReport {
            schema_version: CUTSET_KERNEL_SCHEMA_VERSION.to_string(),
            top_event,
            start_node,
            cut_sets: minimal,
            single_points_of_failure: spof_names,
            diagnostics,
            status,
            stats,
            fingerprint,
        }
    }

    fn resolve_start(
        &self,
        tree: &FaultTree,
        start: Option<&str>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<NodeId> {
        match start {
            Some(name) => match tree.lookup(name) {
                Some(id) => Some(id),
                None => {
                    diagnostics.push(Diagnostic::structural(DiagnosticKind::UnknownStartNode {
                        name: name.to_string(),
                    }));
                    None
                }
            },
            None => match tree.top_event() {
                None => {
                    diagnostics.push(Diagnostic::structural(DiagnosticKind::MissingTopEvent));
                    None
                }
                Some(top) => match tree.top_event_child() {
                    Some(child) => Some(child),
                    None => {
                        diagnostics.push(Diagnostic::structural(
                            DiagnosticKind::UnresolvedTopEventChild {
                                top_event: tree.display_name(top).to_string(),
                            },
                        ));
                        None
                    }
                },
            },
        }
    }
}

fn interrupt_status(interrupt: EvaluationInterrupt) -> AnalysisStatus {
    match interrupt {
        EvaluationInterrupt::NodeBudget { visited, limit } => {
            AnalysisStatus::AbortedNodeBudget { visited, limit }
        }
        EvaluationInterrupt::CutSetBudget { generated, limit } => {
            AnalysisStatus::AbortedCutSetBudget { generated, limit }
        }
        EvaluationInterrupt::Cancelled => AnalysisStatus::Cancelled,
    }
}

fn interrupt_diagnostic(interrupt: EvaluationInterrupt) -> Diagnostic {
    match interrupt {
        EvaluationInterrupt::NodeBudget { visited, limit } => {
            Diagnostic::resource(DiagnosticKind::NodeBudgetExceeded { visited, limit })
        }
        EvaluationInterrupt::CutSetBudget { generated, limit } => {
            Diagnostic::resource(DiagnosticKind::CutSetBudgetExceeded { generated, limit })
        }
        EvaluationInterrupt::Cancelled => Diagnostic::resource(DiagnosticKind::Cancelled),
    }
}
