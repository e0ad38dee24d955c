//! Qubit-to-line permutations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;

/// A bijective mapping from circuit-local qubits to decision-diagram lines.
///
/// Each circuit carries two of these: the initial layout and the declared
/// output permutation. A third, working copy evolves while gates are folded —
/// layout-changing operations (SWAP) mutate it instead of producing a
/// diagram. Backed by an ordered map so that iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permutation {
    map: BTreeMap<QubitId, QubitId>,
}

impl Permutation {
    /// Create an empty permutation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the identity permutation over `n` qubits.
    pub fn identity(n: u32) -> Self {
        let map = (0..n).map(|q| (QubitId(q), QubitId(q))).collect();
        Self { map }
    }

    /// Number of mapped qubits.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if no qubit is mapped.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Check whether `qubit` is mapped.
    pub fn contains(&self, qubit: QubitId) -> bool {
        self.map.contains_key(&qubit)
    }

    /// Map a qubit to a line, replacing any previous mapping.
    pub fn set(&mut self, qubit: QubitId, line: QubitId) {
        self.map.insert(qubit, line);
    }

    /// Get the line a qubit currently occupies.
    pub fn line_of(&self, qubit: QubitId) -> Option<QubitId> {
        self.map.get(&qubit).copied()
    }

    /// Get the line a qubit occupies, failing if it is unmapped.
    pub fn require_line_of(&self, qubit: QubitId) -> IrResult<QubitId> {
        self.line_of(qubit)
            .ok_or_else(|| IrError::InvalidPermutation(format!("qubit {qubit} is not mapped")))
    }

    /// Find the circuit qubit occupying a given line, if any.
    pub fn qubit_on_line(&self, line: QubitId) -> Option<QubitId> {
        self.map
            .iter()
            .find(|&(_, &l)| l == line)
            .map(|(&q, _)| q)
    }

    /// Exchange the lines assigned to two qubits.
    pub fn swap_lines_of(&mut self, a: QubitId, b: QubitId) -> IrResult<()> {
        let la = self.require_line_of(a)?;
        let lb = self.require_line_of(b)?;
        self.map.insert(a, lb);
        self.map.insert(b, la);
        Ok(())
    }

    /// Iterate over `(qubit, line)` pairs in ascending qubit order.
    pub fn iter(&self) -> impl Iterator<Item = (QubitId, QubitId)> + '_ {
        self.map.iter().map(|(&q, &l)| (q, l))
    }
}
