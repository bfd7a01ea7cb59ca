//! Non-fatal diagnostics surfaced by an analysis.
//!
//! The kernel never panics on a malformed tree and never aborts an analysis
//! because of one. Structural defects make the offending subtree contribute
//! an empty cut set collection and leave a diagnostic in the report, so an
//! interactive host (re-running on every edit) stays responsive. Resource
//! ceilings end the analysis with an explicit aborted status plus a
//! diagnostic, never with a silently truncated answer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Structural defect; the analysis continued without the offending subtree.
    Warning,
    /// The analysis could not run to completion.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The tree has no top event to start from.
    MissingTopEvent,
    /// The top event's child could not be resolved.
    UnresolvedTopEventChild {
        /// Name of the top event.
        top_event: String,
    },
    /// A gate references a child that does not exist in the tree.
    UnresolvedChild {
        /// Name of the referencing gate.
        gate: String,
        /// The unresolved child name.
        child: String,
    },
    /// An INHIBIT gate has no resolvable condition child.
    UnresolvedInhibitCondition {
        /// Name of the gate.
        gate: String,
    },
    /// A voting gate's threshold is outside `1..=n`.
    InvalidVotingThreshold {
        /// Name of the gate.
        gate: String,
        /// Declared threshold.
        k: usize,
        /// Number of declared children.
        n: usize,
    },
    /// The requested start node name is not in the tree.
    UnknownStartNode {
        /// The requested name.
        name: String,
    },
    /// An evaluated node id does not belong to this tree's arena.
    NodeOutOfRange {
        /// The offending arena index.
        index: usize,
    },
    /// The node visit ceiling was exceeded.
    NodeBudgetExceeded {
        /// Nodes visited when the analysis stopped.
        visited: usize,
        /// Configured ceiling.
        limit: usize,
    },
    /// The cut set materialization ceiling was exceeded.
    CutSetBudgetExceeded {
        /// Cut sets materialized when the analysis stopped.
        generated: usize,
        /// Configured ceiling.
        limit: usize,
    },
    /// The analysis was cancelled cooperatively by the caller.
    Cancelled,
}

/// A single diagnostic attached to an analysis report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity of the finding.
    pub severity: Severity,
    /// The finding itself.
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// A structural defect: non-fatal, subtree contributed nothing.
    pub fn structural(kind: DiagnosticKind) -> Self {
        Self { severity: Severity::Warning, kind }
    }

    /// A resource-limit or cancellation condition: the analysis was cut short.
    pub fn resource(kind: DiagnosticKind) -> Self {
        Self { severity: Severity::Error, kind }
    }

    /// Human-readable message.
    pub fn message(&self) -> String {
        match &self.kind {
            DiagnosticKind::MissingTopEvent => "fault tree has no top event".to_string(),
            DiagnosticKind::UnresolvedTopEventChild { top_event } => {
                format!("top event '{top_event}' has no resolvable child")
            }
            DiagnosticKind::UnresolvedChild { gate, child } => {
                format!("gate '{gate}' references unknown child '{child}'")
            }
            DiagnosticKind::UnresolvedInhibitCondition { gate } => {
                format!("INHIBIT gate '{gate}' has no resolvable condition")
            }
            DiagnosticKind::InvalidVotingThreshold { gate, k, n } => {
                format!("voting gate '{gate}' has threshold {k} outside 1..={n}")
            }
            DiagnosticKind::UnknownStartNode { name } => {
                format!("start node '{name}' is not in the tree")
            }
            DiagnosticKind::NodeOutOfRange { index } => {
                format!("node id #{index} is not in this tree")
            }
            DiagnosticKind::NodeBudgetExceeded { visited, limit } => {
                format!("node visit ceiling exceeded: {visited} visited, limit {limit}")
            }
            DiagnosticKind::CutSetBudgetExceeded { generated, limit } => {
                format!("cut set ceiling exceeded: {generated} materialized, limit {limit}")
            }
            DiagnosticKind::Cancelled => "analysis cancelled".to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_is_warning() {
        let d = Diagnostic::structural(DiagnosticKind::MissingTopEvent);
        assert_eq!(d.severity, Severity::Warning);
    }

    #[test]
    fn test_display_includes_names() {
        let d = Diagnostic::structural(DiagnosticKind::UnresolvedChild {
            gate: "G1".to_string(),
            child: "PumpX".to_string(),
        });
        let text = d.to_string();
        assert!(text.contains("G1"));
        assert!(text.contains("PumpX"));
        assert!(text.starts_with("WARNING"));
    }

    #[test]
    fn test_resource_is_error() {
        let d = Diagnostic::resource(DiagnosticKind::NodeBudgetExceeded { visited: 11, limit: 10 });
        assert_eq!(d.severity, Severity::Error);
        assert!(d.message().contains("11"));
    }
}
