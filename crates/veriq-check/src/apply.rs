//! Folding gates into the running comparison operator.

use veriq_dd::{DdHandle, Package, Side};
use veriq_ir::{Instruction, IrError, IrResult, Permutation, QubitId, StandardGate};

use crate::error::CheckResult;

/// Build the decision diagram of a gate, with its operands routed through
/// the side's current permutation. `inverted` selects the adjoint, which the
/// right side needs so that `G · R · G'⁻¹` composition is preserved.
pub(crate) fn gate_dd<'p>(
    package: &'p Package,
    gate: StandardGate,
    controls: &[QubitId],
    target: QubitId,
    permutation: &Permutation,
    nqubits: u32,
    inverted: bool,
) -> CheckResult<DdHandle<'p>> {
    let applied = if inverted { gate.inverse() } else { gate };
    let target_line = permutation.require_line_of(target)?.0;
    let control_lines = controls
        .iter()
        .map(|&c| permutation.require_line_of(c).map(|line| line.0))
        .collect::<IrResult<Vec<u32>>>()?;
    Ok(package.make_gate(nqubits, applied.matrix().data, &control_lines, target_line)?)
}

/// Fold one instruction into the running operator on the given side.
///
/// Gates multiply onto the result (`g · R` on the left, `R · g⁻¹` on the
/// right); SWAPs relabel the permutation instead of building an operator;
/// non-unitary instructions fold nothing. The superseded operator is
/// released when the old handle drops, and the engine gets a collection
/// opportunity after every committed fold.
pub(crate) fn fold_instruction<'p>(
    package: &'p Package,
    result: DdHandle<'p>,
    instruction: &Instruction,
    permutation: &mut Permutation,
    side: Side,
    nqubits: u32,
) -> CheckResult<DdHandle<'p>> {
    match instruction {
        Instruction::Gate {
            gate,
            controls,
            target,
        } => {
            let op = gate_dd(
                package,
                *gate,
                controls,
                *target,
                permutation,
                nqubits,
                side == Side::Right,
            )?;
            let folded = match side {
                Side::Left => package.multiply(&op, &result)?,
                Side::Right => package.multiply(&result, &op)?,
            };
            package.garbage_collect(false);
            Ok(folded)
        }
        Instruction::Swap { a, b } => {
            permutation.swap_lines_of(*a, *b)?;
            Ok(result)
        }
        Instruction::Measure { .. } | Instruction::Barrier { .. } => Ok(result),
    }
}

/// Remap a side's evolved permutation onto the circuit's declared output
/// permutation by folding SWAP operators on that side.
pub(crate) fn change_permutation<'p>(
    package: &'p Package,
    mut result: DdHandle<'p>,
    from: &mut Permutation,
    to: &Permutation,
    side: Side,
    nqubits: u32,
) -> CheckResult<DdHandle<'p>> {
    for (qubit, goal) in to.iter() {
        let current = from.require_line_of(qubit)?;
        if current == goal {
            continue;
        }
        let partner = from.qubit_on_line(goal).ok_or_else(|| {
            IrError::InvalidPermutation(format!("no qubit occupies line {goal}"))
        })?;

        let swap = package.make_swap(nqubits, current.0, goal.0)?;
        result = match side {
            Side::Left => package.multiply(&swap, &result)?,
            Side::Right => package.multiply(&result, &swap)?,
        };
        package.garbage_collect(false);

        from.set(qubit, goal);
        from.set(partner, current);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use veriq_dd::WEIGHT_ONE;

    #[test]
    fn test_left_fold_applies_gate() {
        let pkg = Package::new();
        let ident = pkg.make_identity(1).unwrap();
        let mut perm = Permutation::identity(1);
        let inst = Instruction::gate(StandardGate::X, QubitId(0));
        let folded =
            fold_instruction(&pkg, ident, &inst, &mut perm, Side::Left, 1).unwrap();
        let x = pkg
            .make_gate(
                1,
                StandardGate::X.matrix().data,
                &[],
                0,
            )
            .unwrap();
        assert!(folded.structurally_equals(&x));
    }

    #[test]
    fn test_right_fold_uses_inverse() {
        let pkg = Package::new();
        // S folded left, then S folded right: S · I · S⁻¹ = I
        let ident = pkg.make_identity(1).unwrap();
        let mut perm_l = Permutation::identity(1);
        let mut perm_r = Permutation::identity(1);
        let inst = Instruction::gate(StandardGate::S, QubitId(0));
        let folded = fold_instruction(&pkg, ident, &inst, &mut perm_l, Side::Left, 1).unwrap();
        let folded = fold_instruction(&pkg, folded, &inst, &mut perm_r, Side::Right, 1).unwrap();
        let ident = pkg.make_identity(1).unwrap();
        assert!(folded.structurally_equals(&ident));
    }

    #[test]
    fn test_swap_relabels_instead_of_folding() {
        let pkg = Package::new();
        let ident = pkg.make_identity(2).unwrap();
        let root = ident.root();
        let mut perm = Permutation::identity(2);
        let inst = Instruction::swap(QubitId(0), QubitId(1));
        let folded = fold_instruction(&pkg, ident, &inst, &mut perm, Side::Left, 2).unwrap();
        assert_eq!(folded.root(), root);
        assert_eq!(perm.line_of(QubitId(0)), Some(QubitId(1)));
    }

    #[test]
    fn test_gate_routed_through_permutation() {
        let pkg = Package::new();
        let mut perm = Permutation::identity(2);
        perm.swap_lines_of(QubitId(0), QubitId(1)).unwrap();
        // X on qubit 0 now lands on line 1
        let op = gate_dd(
            &pkg,
            StandardGate::X,
            &[],
            QubitId(0),
            &perm,
            2,
            false,
        )
        .unwrap();
        let x1 = pkg
            .make_gate(2, StandardGate::X.matrix().data, &[], 1)
            .unwrap();
        assert!(op.structurally_equals(&x1));
    }

    #[test]
    fn test_change_permutation_restores_layout() {
        let pkg = Package::new();
        // start from a swapped working permutation over the identity operator
        let ident = pkg.make_identity(2).unwrap();
        let mut working = Permutation::identity(2);
        working.swap_lines_of(QubitId(0), QubitId(1)).unwrap();
        let target = Permutation::identity(2);
        let remapped =
            change_permutation(&pkg, ident, &mut working, &target, Side::Left, 2).unwrap();
        assert_eq!(working, target);
        // the fold inserted a real SWAP operator
        let swap = pkg.make_swap(2, 0, 1).unwrap();
        assert!(remapped.structurally_equals(&swap));
        assert_eq!(remapped.root().weight, WEIGHT_ONE);
    }
}
