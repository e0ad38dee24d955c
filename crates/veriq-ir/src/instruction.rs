//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::gate::StandardGate;
use crate::qubit::{ClbitId, QubitId};

/// A single operation in a circuit's ordered instruction stream.
///
/// `Measure` is the terminal sentinel of the gate stream: scheduling stops
/// when it is reached, and it is never folded into an operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// A (possibly controlled) standard gate applied to one target.
    Gate {
        /// The base single-qubit gate.
        gate: StandardGate,
        /// Positive control qubits; empty for an uncontrolled gate.
        controls: Vec<QubitId>,
        /// The target qubit.
        target: QubitId,
    },
    /// A SWAP of two qubits. Applied by relabeling, not as an operator.
    Swap {
        /// First qubit.
        a: QubitId,
        /// Second qubit.
        b: QubitId,
    },
    /// Measurement of one qubit into a classical bit.
    Measure {
        /// The measured qubit.
        qubit: QubitId,
        /// The classical bit receiving the outcome.
        clbit: ClbitId,
    },
    /// Barrier (synchronization point).
    Barrier {
        /// Qubits the barrier spans.
        qubits: Vec<QubitId>,
    },
}

impl Instruction {
    /// Create an uncontrolled gate instruction.
    pub fn gate(gate: StandardGate, target: QubitId) -> Self {
        Instruction::Gate {
            gate,
            controls: vec![],
            target,
        }
    }

    /// Create a controlled gate instruction.
    pub fn controlled_gate(
        gate: StandardGate,
        controls: impl IntoIterator<Item = QubitId>,
        target: QubitId,
    ) -> Self {
        Instruction::Gate {
            gate,
            controls: controls.into_iter().collect(),
            target,
        }
    }

    /// Create a SWAP instruction.
    pub fn swap(a: QubitId, b: QubitId) -> Self {
        Instruction::Swap { a, b }
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Instruction::Measure { qubit, clbit }
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Instruction::Barrier {
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self, Instruction::Gate { .. })
    }

    /// Check if this is a SWAP.
    pub fn is_swap(&self) -> bool {
        matches!(self, Instruction::Swap { .. })
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self, Instruction::Measure { .. })
    }

    /// Check if this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self, Instruction::Barrier { .. })
    }

    /// Check if this instruction denotes a unitary operation.
    pub fn is_unitary(&self) -> bool {
        matches!(self, Instruction::Gate { .. } | Instruction::Swap { .. })
    }

    /// Get the qubits this instruction operates on, target last for gates.
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Instruction::Gate {
                controls, target, ..
            } => {
                let mut qs = controls.clone();
                qs.push(*target);
                qs
            }
            Instruction::Swap { a, b } => vec![*a, *b],
            Instruction::Measure { qubit, .. } => vec![*qubit],
            Instruction::Barrier { qubits } => qubits.clone(),
        }
    }

    /// Check whether this instruction acts on the given qubit.
    pub fn acts_on(&self, qubit: QubitId) -> bool {
        match self {
            Instruction::Gate {
                controls, target, ..
            } => *target == qubit || controls.contains(&qubit),
            Instruction::Swap { a, b } => *a == qubit || *b == qubit,
            Instruction::Measure { qubit: q, .. } => *q == qubit,
            Instruction::Barrier { qubits } => qubits.contains(&qubit),
        }
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &'static str {
        match self {
            Instruction::Gate { gate, controls, .. } => {
                if controls.is_empty() {
                    gate.name()
                } else {
                    "ctrl"
                }
            }
            Instruction::Swap { .. } => "swap",
            Instruction::Measure { .. } => "measure",
            Instruction::Barrier { .. } => "barrier",
        }
    }
}
