//! Pre-check passes.
//!
//! Opt-in stream rewrites that run once per circuit before scheduling. SWAP
//! reconstruction and gate fusion preserve operator semantics exactly,
//! global phase included; diagonal-gate removal is sound only under the
//! terminal measurements it requires, which is why all passes default off.

use rustc_hash::FxHashMap;
use tracing::debug;

use veriq_ir::{Circuit, Instruction, QubitId, StandardGate, Unitary2x2};

use crate::config::Configuration;
use crate::error::CheckResult;

/// Angle threshold below which a residual rotation or phase is dropped.
const EPSILON: f64 = 1e-10;

/// A rewrite applied to both circuits before scheduling.
pub trait PrecheckPass {
    /// Get the name of this pass.
    fn name(&self) -> &'static str;

    /// Rewrite one circuit's instruction stream in place.
    fn run(&self, circuit: &mut Circuit) -> CheckResult<()>;
}

/// Runs the configured pre-check passes over both circuits.
pub struct PrecheckRunner {
    passes: Vec<Box<dyn PrecheckPass>>,
}

impl PrecheckRunner {
    /// Assemble the runner for the passes enabled in the configuration.
    pub fn from_config(config: &Configuration) -> Self {
        let mut passes: Vec<Box<dyn PrecheckPass>> = vec![];
        if config.reconstruct_swaps {
            passes.push(Box::new(ReconstructSwaps));
        }
        if config.fuse_single_qubit_gates {
            passes.push(Box::new(FuseSingleQubitGates));
        }
        if config.remove_diagonal_gates_before_measure {
            passes.push(Box::new(RemoveDiagonalGatesBeforeMeasure));
        }
        Self { passes }
    }

    /// Number of enabled passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if no pass is enabled.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Run every enabled pass on both circuits, in order.
    pub fn run(&self, lhs: &mut Circuit, rhs: &mut Circuit) -> CheckResult<()> {
        for pass in &self.passes {
            debug!(pass = pass.name(), "running pre-check pass");
            pass.run(lhs)?;
            pass.run(rhs)?;
        }
        Ok(())
    }
}

/// Rewrite `CX(a,b) · CX(b,a) · CX(a,b)` triples into a single SWAP.
///
/// A SWAP folds as a permutation relabeling instead of three operator
/// multiplications, so reconstruction pays off directly during scheduling.
pub struct ReconstructSwaps;

fn as_cx(instruction: &Instruction) -> Option<(QubitId, QubitId)> {
    match instruction {
        Instruction::Gate {
            gate: StandardGate::X,
            controls,
            target,
        } if controls.len() == 1 => Some((controls[0], *target)),
        _ => None,
    }
}

impl PrecheckPass for ReconstructSwaps {
    fn name(&self) -> &'static str {
        "reconstruct_swaps"
    }

    fn run(&self, circuit: &mut Circuit) -> CheckResult<()> {
        let instructions = std::mem::take(circuit.instructions_mut());
        let mut out: Vec<Instruction> = Vec::with_capacity(instructions.len());
        for inst in instructions {
            out.push(inst);
            let k = out.len();
            if k < 3 {
                continue;
            }
            if let (Some((c1, t1)), Some((c2, t2)), Some((c3, t3))) =
                (as_cx(&out[k - 3]), as_cx(&out[k - 2]), as_cx(&out[k - 1]))
            {
                if c1 == t2 && t1 == c2 && c1 == c3 && t1 == t3 {
                    out.truncate(k - 3);
                    out.push(Instruction::swap(c1, t1));
                }
            }
        }
        *circuit.instructions_mut() = out;
        Ok(())
    }
}

/// Accumulated run of single-qubit gates on one qubit.
struct PendingRun {
    matrix: Unitary2x2,
    count: usize,
    first: Instruction,
}

/// Fuse maximal runs of uncontrolled single-qubit gates per qubit.
///
/// A run of length one is kept verbatim. Longer runs collapse into a single
/// `U(θ, φ, λ)` via the matrix product's ZYZ decomposition, followed by a
/// `GPhase` capturing the residual global phase when it is non-negligible;
/// a run that multiplies out to the identity vanishes entirely.
pub struct FuseSingleQubitGates;

impl FuseSingleQubitGates {
    fn flush(qubit: QubitId, pending: &mut FxHashMap<QubitId, PendingRun>, out: &mut Vec<Instruction>) {
        let Some(run) = pending.remove(&qubit) else {
            return;
        };
        if run.count == 1 {
            out.push(run.first);
            return;
        }
        if run.matrix.is_identity() {
            return;
        }
        let (alpha, beta, gamma, phase) = run.matrix.zyz_decomposition();
        out.push(Instruction::gate(StandardGate::U(beta, alpha, gamma), qubit));
        let residual = Unitary2x2::normalize_angle(phase - (alpha + gamma) / 2.0);
        if residual.abs() > EPSILON {
            out.push(Instruction::gate(StandardGate::GPhase(residual), qubit));
        }
    }
}

impl PrecheckPass for FuseSingleQubitGates {
    fn name(&self) -> &'static str {
        "fuse_single_qubit_gates"
    }

    fn run(&self, circuit: &mut Circuit) -> CheckResult<()> {
        let instructions = std::mem::take(circuit.instructions_mut());
        let mut out: Vec<Instruction> = Vec::with_capacity(instructions.len());
        let mut pending: FxHashMap<QubitId, PendingRun> = FxHashMap::default();

        for inst in instructions {
            match &inst {
                Instruction::Gate {
                    gate,
                    controls,
                    target,
                } if controls.is_empty() => {
                    let matrix = gate.matrix();
                    pending
                        .entry(*target)
                        .and_modify(|run| {
                            // the later gate multiplies from the left
                            run.matrix = matrix * run.matrix;
                            run.count += 1;
                        })
                        .or_insert_with(|| PendingRun {
                            matrix,
                            count: 1,
                            first: inst.clone(),
                        });
                }
                other => {
                    for qubit in other.qubits() {
                        Self::flush(qubit, &mut pending, &mut out);
                    }
                    out.push(inst);
                }
            }
        }

        let mut open: Vec<QubitId> = pending.keys().copied().collect();
        open.sort_unstable();
        for qubit in open {
            Self::flush(qubit, &mut pending, &mut out);
        }

        *circuit.instructions_mut() = out;
        Ok(())
    }
}

/// Drop diagonal gates whose every operand is measured next.
///
/// A diagonal gate directly before measurements only shifts phases of
/// outcomes that are about to be projected away. Global-phase instructions
/// are left alone: they act on no measured operand in particular.
pub struct RemoveDiagonalGatesBeforeMeasure;

impl RemoveDiagonalGatesBeforeMeasure {
    fn removable(instructions: &[Instruction], index: usize) -> bool {
        let Instruction::Gate {
            gate,
            controls,
            target,
        } = &instructions[index]
        else {
            return false;
        };
        if !gate.is_diagonal() || matches!(gate, StandardGate::GPhase(_)) {
            return false;
        }
        let mut operands = controls.clone();
        operands.push(*target);
        operands.iter().all(|&q| {
            instructions[index + 1..]
                .iter()
                .find(|later| later.acts_on(q))
                .is_some_and(Instruction::is_measure)
        })
    }
}

impl PrecheckPass for RemoveDiagonalGatesBeforeMeasure {
    fn name(&self) -> &'static str {
        "remove_diagonal_gates_before_measure"
    }

    fn run(&self, circuit: &mut Circuit) -> CheckResult<()> {
        loop {
            let found = (0..circuit.instructions().len())
                .find(|&i| Self::removable(circuit.instructions(), i));
            match found {
                Some(i) => {
                    circuit.instructions_mut().remove(i);
                }
                None => break,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veriq_ir::ClbitId;

    #[test]
    fn test_swap_reconstruction() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .cx(QubitId(1), QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();
        ReconstructSwaps.run(&mut circuit).unwrap();
        assert_eq!(circuit.num_ops(), 1);
        assert!(circuit.instructions()[0].is_swap());
    }

    #[test]
    fn test_same_direction_cx_triple_untouched() {
        let mut circuit = Circuit::with_size("test", 2);
        for _ in 0..3 {
            circuit.cx(QubitId(0), QubitId(1)).unwrap();
        }
        ReconstructSwaps.run(&mut circuit).unwrap();
        assert_eq!(circuit.num_ops(), 3);
    }

    #[test]
    fn test_fusion_collapses_run() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .t(QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap()
            .x(QubitId(1))
            .unwrap();
        FuseSingleQubitGates.run(&mut circuit).unwrap();
        // the run on qubit 0 becomes one U (plus at most a phase); the
        // lone X on qubit 1 is kept verbatim
        assert!(circuit.num_ops() <= 3);
        assert!(
            circuit
                .instructions()
                .iter()
                .any(|i| matches!(i, Instruction::Gate { gate: StandardGate::X, .. }))
        );
    }

    #[test]
    fn test_fusion_cancels_inverse_pair() {
        let mut circuit = Circuit::with_size("test", 1);
        circuit.h(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
        FuseSingleQubitGates.run(&mut circuit).unwrap();
        assert_eq!(circuit.num_ops(), 0);
    }

    #[test]
    fn test_fusion_respects_entangling_boundary() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit
            .t(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .t(QubitId(0))
            .unwrap();
        FuseSingleQubitGates.run(&mut circuit).unwrap();
        // the CX splits the run: nothing fuses across it
        assert_eq!(circuit.num_ops(), 3);
    }

    #[test]
    fn test_diagonal_gate_before_measure_removed() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .z(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap();
        RemoveDiagonalGatesBeforeMeasure.run(&mut circuit).unwrap();
        assert_eq!(circuit.num_ops(), 2);
        assert!(circuit.instructions()[0].name() == "h");
    }

    #[test]
    fn test_diagonal_gate_mid_circuit_kept() {
        let mut circuit = Circuit::with_size("test", 1);
        circuit
            .z(QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap();
        RemoveDiagonalGatesBeforeMeasure.run(&mut circuit).unwrap();
        assert_eq!(circuit.num_ops(), 3);
    }

    #[test]
    fn test_controlled_diagonal_needs_both_operands_measured() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit
            .cz(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap();
        RemoveDiagonalGatesBeforeMeasure.run(&mut circuit).unwrap();
        // qubit 1 is never measured, so the CZ stays
        assert_eq!(circuit.num_ops(), 2);

        let mut measured = Circuit::with_size("test", 2);
        measured
            .cz(QubitId(0), QubitId(1))
            .unwrap()
            .measure_all()
            .unwrap();
        RemoveDiagonalGatesBeforeMeasure.run(&mut measured).unwrap();
        assert_eq!(measured.num_ops(), 2);
        assert!(measured.instructions().iter().all(Instruction::is_measure));
    }

    #[test]
    fn test_runner_respects_configuration() {
        let none = PrecheckRunner::from_config(&Configuration::new());
        assert!(none.is_empty());
        let all = PrecheckRunner::from_config(
            &Configuration::new()
                .with_swap_reconstruction()
                .with_single_qubit_gate_fusion()
                .with_diagonal_gate_removal(),
        );
        assert_eq!(all.len(), 3);
    }
}
