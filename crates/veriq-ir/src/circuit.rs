//! High-level circuit builder API.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::permutation::Permutation;
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit as an ordered gate stream.
///
/// Instructions are stored flat, in application order. Alongside the stream
/// the circuit carries the metadata the equivalence checker consumes:
/// per-line ancillary and garbage flags, the initial qubit-to-line layout,
/// and the declared output permutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubit lines.
    num_qubits: u32,
    /// The ordered instruction stream.
    instructions: Vec<Instruction>,
    /// Per-line ancillary flags.
    ancillary: Vec<bool>,
    /// Per-line garbage flags.
    garbage: Vec<bool>,
    /// Initial qubit-to-line layout.
    initial_layout: Permutation,
    /// Declared output permutation.
    output_permutation: Permutation,
}

impl Circuit {
    /// Create a circuit with `num_qubits` lines and identity layouts.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            instructions: vec![],
            ancillary: vec![false; num_qubits as usize],
            garbage: vec![false; num_qubits as usize],
            initial_layout: Permutation::identity(num_qubits),
            output_permutation: Permutation::identity(num_qubits),
        }
    }

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubit lines.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the number of operations in the stream.
    pub fn num_ops(&self) -> usize {
        self.instructions.len()
    }

    /// Get the instruction stream.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Get a mutable view of the instruction stream.
    ///
    /// Used by pre-check passes, which rewrite the stream in place.
    pub fn instructions_mut(&mut self) -> &mut Vec<Instruction> {
        &mut self.instructions
    }

    /// Get the initial qubit-to-line layout.
    pub fn initial_layout(&self) -> &Permutation {
        &self.initial_layout
    }

    /// Get the declared output permutation.
    pub fn output_permutation(&self) -> &Permutation {
        &self.output_permutation
    }

    /// Replace the initial layout.
    pub fn set_initial_layout(&mut self, layout: Permutation) {
        self.initial_layout = layout;
    }

    /// Replace the output permutation.
    pub fn set_output_permutation(&mut self, permutation: Permutation) {
        self.output_permutation = permutation;
    }

    /// Check whether a line is flagged ancillary.
    pub fn is_ancillary(&self, line: QubitId) -> bool {
        self.ancillary.get(line.index()).copied().unwrap_or(false)
    }

    /// Check whether a line is flagged garbage.
    pub fn is_garbage(&self, line: QubitId) -> bool {
        self.garbage.get(line.index()).copied().unwrap_or(false)
    }

    /// Get the per-line ancillary flags.
    pub fn ancillary(&self) -> &[bool] {
        &self.ancillary
    }

    /// Get the per-line garbage flags.
    pub fn garbage(&self) -> &[bool] {
        &self.garbage
    }

    /// Flag a line as ancillary.
    pub fn set_ancillary(&mut self, line: QubitId) -> IrResult<()> {
        self.check_qubit(line, None)?;
        self.ancillary[line.index()] = true;
        Ok(())
    }

    /// Flag a line as garbage.
    pub fn set_garbage(&mut self, line: QubitId) -> IrResult<()> {
        self.check_qubit(line, None)?;
        self.garbage[line.index()] = true;
        Ok(())
    }

    /// Check whether a qubit is never acted upon by any instruction.
    pub fn is_idle_qubit(&self, qubit: QubitId) -> bool {
        !self.instructions.iter().any(|inst| inst.acts_on(qubit))
    }

    /// Extend the circuit to `num_qubits` lines.
    ///
    /// New lines are flagged ancillary and garbage and stay absent from both
    /// layouts: they exist only so that two circuits of different widths can
    /// be compared over a common line count.
    pub fn pad_to(&mut self, num_qubits: u32) {
        while self.num_qubits < num_qubits {
            self.num_qubits += 1;
            self.ancillary.push(true);
            self.garbage.push(true);
        }
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::Z, qubit))
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::S, qubit))
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::Sdg, qubit))
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::T, qubit))
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::Tdg, qubit))
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::SX, qubit))
    }

    /// Apply sqrt(X)-dagger gate.
    pub fn sxdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::SXdg, qubit))
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::Rx(theta), qubit))
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::Ry(theta), qubit))
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::Rz(theta), qubit))
    }

    /// Apply phase gate.
    pub fn p(&mut self, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::P(lambda), qubit))
    }

    /// Apply universal U gate.
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::U(theta, phi, lambda), qubit))
    }

    /// Apply a global phase, attached to the given qubit line.
    pub fn gphase(&mut self, gamma: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::GPhase(gamma), qubit))
    }

    // =========================================================================
    // Controlled and two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::controlled_gate(
            StandardGate::X,
            [control],
            target,
        ))
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::controlled_gate(
            StandardGate::Y,
            [control],
            target,
        ))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::controlled_gate(
            StandardGate::Z,
            [control],
            target,
        ))
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::controlled_gate(
            StandardGate::H,
            [control],
            target,
        ))
    }

    /// Apply controlled Rx rotation.
    pub fn crx(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::controlled_gate(
            StandardGate::Rx(theta),
            [control],
            target,
        ))
    }

    /// Apply controlled Ry rotation.
    pub fn cry(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::controlled_gate(
            StandardGate::Ry(theta),
            [control],
            target,
        ))
    }

    /// Apply controlled Rz rotation.
    pub fn crz(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::controlled_gate(
            StandardGate::Rz(theta),
            [control],
            target,
        ))
    }

    /// Apply controlled phase gate.
    pub fn cp(&mut self, lambda: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::controlled_gate(
            StandardGate::P(lambda),
            [control],
            target,
        ))
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::controlled_gate(
            StandardGate::X,
            [c1, c2],
            target,
        ))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::swap(a, b))
    }

    // =========================================================================
    // Non-unitary operations
    // =========================================================================

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    /// Measure every qubit line into the classical bit of the same index.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        for q in 0..self.num_qubits {
            self.apply(Instruction::measure(QubitId(q), ClbitId(q)))?;
        }
        Ok(self)
    }

    /// Add a barrier across the given qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits))
    }

    /// Append a pre-built instruction, validating its operands.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        let gate_name = instruction.name();
        let operands = instruction.qubits();
        for (i, &q) in operands.iter().enumerate() {
            self.check_qubit(q, Some(gate_name))?;
            if operands[..i].contains(&q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q,
                    gate_name: Some(gate_name.to_string()),
                });
            }
        }
        self.instructions.push(instruction);
        Ok(self)
    }

    fn check_qubit(&self, qubit: QubitId, gate_name: Option<&str>) -> IrResult<()> {
        if qubit.0 >= self.num_qubits {
            return Err(IrError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
                gate_name: gate_name.map(String::from),
            });
        }
        Ok(())
    }
}
