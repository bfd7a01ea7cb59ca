//! Budget and cancellation controls for an analysis.
//!
//! K-of-N gates and wide AND folds blow up combinatorially, so every
//! analysis runs under explicit ceilings. Hitting a ceiling is a reported
//! outcome, never a silent truncation. Because the engine is re-invoked on
//! every edit in an interactive host, a newer request can cooperatively
//! cancel an in-flight older one through a shared [`CancellationFlag`]; the
//! evaluator checks the flag at each recursion boundary.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::fingerprint::fingerprint_hex;

/// Resource ceilings for one analysis.
///
/// ## Parameters
///
/// - `max_visited_nodes`: ceiling on `evaluate` calls, bounding depth-first
///   re-walks of shared subtrees under K-of-N combinations
/// - `max_cut_sets`: ceiling on materialized cut sets across all folds,
///   bounding the intermediate combinatorial blow-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisLimits {
    /// Maximum number of node visits during evaluation.
    pub max_visited_nodes: usize,
    /// Maximum number of cut sets materialized during evaluation.
    pub max_cut_sets: usize,
}

impl AnalysisLimits {
    /// Create limits with explicit ceilings.
    pub fn new(max_visited_nodes: usize, max_cut_sets: usize) -> Self {
        Self { max_visited_nodes, max_cut_sets }
    }

    /// Canonical hash of the parameters, used in cache keys so a limit
    /// change never serves a result computed under different ceilings.
    pub fn params_hash(&self) -> String {
        fingerprint_hex(self)
    }

    /// Tiny ceilings for exercising the abort paths in tests.
    pub fn minimal() -> Self {
        Self { max_visited_nodes: 16, max_cut_sets: 16 }
    }
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self {
            max_visited_nodes: 100_000,
            max_cut_sets: 500_000,
        }
    }
}

/// Cooperative cancellation flag shared between a caller and an in-flight
/// analysis.
///
/// Cloning the flag shares the underlying state. There is no other shared
/// mutable state in the engine, so no locking is involved.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// A fresh, uncancelled flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the analysis holding this flag.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
