//! Results of an equivalence-checking run.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use veriq_dd::DdHandle;

use crate::config::Strategy;

/// The outcome of one equivalence-checking run.
///
/// The verdict is the exact structural comparison of the reduced operator
/// against the goal matrix; the fidelity, when requested, is an auxiliary
/// numeric signal and never overrides the verdict. The final operator stays
/// retained through `result` until this value is dropped.
#[derive(Debug)]
pub struct EquivalenceCheckingResult<'p> {
    /// Whether the circuits were found equivalent.
    pub equivalence: bool,
    /// The strategy that produced this verdict.
    pub strategy: Strategy,
    /// Wall-clock time spent in pre-check passes.
    pub preprocessing_time: Duration,
    /// Wall-clock time spent scheduling, reducing and deciding.
    pub verification_time: Duration,
    /// Peak number of concurrently active diagram nodes over the whole run.
    pub max_active_nodes: usize,
    /// The fully reduced comparison operator.
    pub result: DdHandle<'p>,
    /// Weighted-trace fidelity of the final operator, if requested.
    pub fidelity: Option<f64>,
}

impl EquivalenceCheckingResult<'_> {
    /// Get the serializable scalar summary of this result.
    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            equivalence: self.equivalence,
            strategy: self.strategy,
            preprocessing_seconds: self.preprocessing_time.as_secs_f64(),
            verification_seconds: self.verification_time.as_secs_f64(),
            max_active_nodes: self.max_active_nodes,
            fidelity: self.fidelity,
        }
    }
}

/// Serializable scalar view of an [`EquivalenceCheckingResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    /// Whether the circuits were found equivalent.
    pub equivalence: bool,
    /// The strategy used.
    pub strategy: Strategy,
    /// Preprocessing time in seconds.
    pub preprocessing_seconds: f64,
    /// Verification time in seconds.
    pub verification_seconds: f64,
    /// Peak number of concurrently active diagram nodes.
    pub max_active_nodes: usize,
    /// Weighted-trace fidelity, if computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fidelity: Option<f64>,
}

impl ResultSummary {
    /// Render the summary as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
