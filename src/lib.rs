//! # cutset-kernel
//!
//! Deterministic minimal cut set analysis for fault tree DAGs.
//!
//! The kernel answers one question:
//!
//! > Given a fault tree, which combinations of leaf failures are **sufficient
//! > to cause the top event**, and which of those combinations are minimal?
//!
//! ## Core Contract
//!
//! 1. Given an immutable fault tree snapshot, enumerate the cut sets of the
//!    subtree rooted at a start node (top event child by default)
//! 2. Normalize the enumeration: drop repeated leaves inside a cut set and
//!    repeated cut sets across the collection
//! 3. Keep only subset-minimal cut sets and report them with diagnostics,
//!    statistics and a **result fingerprint** for downstream provenance
//!
//! ## Architecture
//!
//! ```text
//! FaultTree → GateEvaluator → SetDeduplication → MinimalityFilter → Report
//!                  ↓
//!          CombinationGenerator (K-of-N gates)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same tree + same start node + same limits → identical report fingerprint
//! - Child ordering is the declaration order of the source model
//! - Cut set ordering is the enumeration order of the evaluator
//!
//! Structural defects in the tree (dangling references, bad voting
//! thresholds, a top event without a child) never panic and never abort the
//! analysis: the offending subtree contributes nothing and a diagnostic is
//! attached to the report so an interactive host stays responsive.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod cache;
pub mod combinations;
pub mod evaluator;
pub mod fingerprint;
pub mod importance;
pub mod limits;
pub mod minimality;
pub mod model;
pub mod normalize;
pub mod types;

// Re-exports
pub use types::{NodeId, NodeKind, CutSet, CutSetCollection};
pub use types::diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use model::{ChildRef, FaultTree, FaultTreeBuilder, ModelError, NodeHandle};
pub use limits::{AnalysisLimits, CancellationFlag};
pub use combinations::combinations;
pub use evaluator::{EvaluationInterrupt, GateEvaluator};
pub use normalize::normalize;
pub use minimality::filter_minimal;
pub use analysis::{
    single_points_of_failure, AnalysisReport, AnalysisStats, AnalysisStatus, CutSetAnalyzer,
};
pub use importance::{compute_importance, ImportanceRanking, LeafImportance};
pub use cache::{AnalysisCache, CacheConfig, CacheStats};
pub use fingerprint::{canonical_bytes, fingerprint64, fingerprint_hex};

/// Schema version for all kernel report types.
/// Increment on breaking changes to any serialized type.
pub const CUTSET_KERNEL_SCHEMA_VERSION: &str = "1.0.0";
