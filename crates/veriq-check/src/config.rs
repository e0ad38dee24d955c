//! Checker configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gate-interleaving strategy for the alternating scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Strategy {
    /// Strictly alternate one gate per side.
    Naive,
    /// Alternate according to the gate-count ratio of the two circuits.
    #[default]
    Proportional,
    /// Tentatively fold either side and commit the smaller intermediate.
    Lookahead,
    /// Reserved for the compilation-flow checker; not handled here.
    CompilationFlow,
}

impl Strategy {
    /// Get the name of this strategy.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Naive => "naive",
            Strategy::Proportional => "proportional",
            Strategy::Lookahead => "lookahead",
            Strategy::CompilationFlow => "compilationflow",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Configuration of a single equivalence-checking run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Configuration {
    /// The interleaving strategy to use.
    pub strategy: Strategy,
    /// Compute the weighted-trace fidelity of the final operator.
    pub compute_fidelity: bool,
    /// Pre-check: reconstruct SWAP operations from CX triples.
    pub reconstruct_swaps: bool,
    /// Pre-check: fuse runs of single-qubit gates.
    pub fuse_single_qubit_gates: bool,
    /// Pre-check: drop diagonal gates directly before measurements.
    pub remove_diagonal_gates_before_measure: bool,
}

impl Configuration {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interleaving strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Request the fidelity estimate alongside the verdict.
    #[must_use]
    pub fn with_fidelity(mut self) -> Self {
        self.compute_fidelity = true;
        self
    }

    /// Enable SWAP reconstruction during preprocessing.
    #[must_use]
    pub fn with_swap_reconstruction(mut self) -> Self {
        self.reconstruct_swaps = true;
        self
    }

    /// Enable single-qubit gate fusion during preprocessing.
    #[must_use]
    pub fn with_single_qubit_gate_fusion(mut self) -> Self {
        self.fuse_single_qubit_gates = true;
        self
    }

    /// Enable removal of diagonal gates before measurements.
    #[must_use]
    pub fn with_diagonal_gate_removal(mut self) -> Self {
        self.remove_diagonal_gates_before_measure = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_strategy_is_proportional() {
        assert_eq!(Configuration::new().strategy, Strategy::Proportional);
    }

    #[test]
    fn test_builder_chain() {
        let config = Configuration::new()
            .with_strategy(Strategy::Lookahead)
            .with_fidelity()
            .with_swap_reconstruction();
        assert_eq!(config.strategy, Strategy::Lookahead);
        assert!(config.compute_fidelity);
        assert!(config.reconstruct_swaps);
        assert!(!config.fuse_single_qubit_gates);
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(Strategy::Naive.name(), "naive");
        assert_eq!(format!("{}", Strategy::CompilationFlow), "compilationflow");
    }
}
