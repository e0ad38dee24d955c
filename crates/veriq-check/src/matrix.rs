//! Initial and goal comparison matrices.

use tracing::debug;

use veriq_dd::{DdHandle, Package, Side};
use veriq_ir::{Circuit, QubitId};

use crate::error::CheckResult;

/// Build the starting operator of the `G · R · G'⁻¹` scheme.
///
/// Starts from the identity over all lines. A line that is ancillary in
/// *both* circuits collapses when the two initial layouts disagree about it:
/// either only one circuit actually places a qubit on the line ("found"
/// differs), or the qubits placed there differ in whether they are ever
/// acted upon ("idle" differs). Such a line is meaningfully present in only
/// one circuit and must not block equivalence.
pub fn create_initial_matrix<'p>(
    package: &'p Package,
    lhs: &Circuit,
    rhs: &Circuit,
) -> CheckResult<DdHandle<'p>> {
    let n = lhs.num_qubits().max(rhs.num_qubits());
    let identity = package.make_identity(n)?;

    let mut collapsible = vec![false; n as usize];
    for line in (0..n).map(QubitId) {
        if !(lhs.is_ancillary(line) && rhs.is_ancillary(line)) {
            continue;
        }
        let (found_l, idle_l) = probe_line(lhs, line);
        let (found_r, idle_r) = probe_line(rhs, line);
        if (found_l != found_r) || (idle_l != idle_r) {
            collapsible[line.index()] = true;
        }
    }

    if collapsible.contains(&true) {
        debug!(?collapsible, "collapsing asymmetric ancilla lines");
    }
    Ok(package.reduce_ancillae(identity, &collapsible, Side::Right)?)
}

/// Build the goal operator the reduced result is compared against.
///
/// Identity, reduced ancilla-then-garbage for the right circuit, then
/// ancilla-then-garbage for the left. The order and side tags mirror the
/// tagging used during gate application.
pub fn create_goal_matrix<'p>(
    package: &'p Package,
    lhs: &Circuit,
    rhs: &Circuit,
) -> CheckResult<DdHandle<'p>> {
    let n = lhs.num_qubits().max(rhs.num_qubits());
    let goal = package.make_identity(n)?;
    let goal = package.reduce_ancillae(goal, rhs.ancillary(), Side::Right)?;
    let goal = package.reduce_garbage(goal, rhs.garbage(), Side::Right)?;
    let goal = package.reduce_ancillae(goal, lhs.ancillary(), Side::Left)?;
    let goal = package.reduce_garbage(goal, lhs.garbage(), Side::Left)?;
    Ok(goal)
}

/// Probe a line in a circuit's initial layout: is it occupied, and if so, is
/// the occupying qubit idle?
fn probe_line(circuit: &Circuit, line: QubitId) -> (bool, bool) {
    match circuit.initial_layout().qubit_on_line(line) {
        Some(qubit) => (true, circuit.is_idle_qubit(qubit)),
        None => (false, false),
    }
}
