//! Weighted-trace fidelity estimation.

use num_complex::Complex64;
use rustc_hash::FxHashMap;

use veriq_dd::{DdHandle, Package};

/// Approximate similarity score of the final comparison operator.
///
/// Computes `|Tr(R)|² / 4ⁿ` for the operator `R`: a value in `[0, 1]` that
/// is 1 exactly when `R` is the identity up to phase. The trace visits only
/// the diagonal successor edges of each level and memoizes per node, so
/// shared subgraphs are evaluated once; the memo table lives only for the
/// duration of the call. This is an auxiliary signal — the authoritative
/// verdict is the exact structural comparison against the goal matrix.
pub fn weighted_trace_fidelity(package: &Package, result: &DdHandle<'_>, nqubits: u32) -> f64 {
    let root = result.root();
    let trace = if root.is_terminal() {
        Complex64::new(1.0, 0.0)
    } else {
        let mut memo: FxHashMap<u32, Complex64> = FxHashMap::default();
        diagonal_sum(package, root.node, &mut memo)
    };
    let weighted = package.weight_value(root.weight) * trace;
    weighted.norm_sqr() / 4.0_f64.powi(nqubits as i32)
}

/// Post-order sum over the two diagonal successor edges of a node.
fn diagonal_sum(package: &Package, index: u32, memo: &mut FxHashMap<u32, Complex64>) -> Complex64 {
    if let Some(&value) = memo.get(&index) {
        return value;
    }
    let node = package.node(index);
    let mut total = Complex64::ZERO;
    for i in [0usize, 3] {
        let edge = node.edges[i];
        let child = if edge.is_terminal() {
            Complex64::new(1.0, 0.0)
        } else {
            diagonal_sum(package, edge.node, memo)
        };
        total += package.weight_value(edge.weight) * child;
    }
    memo.insert(index, total);
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn x_matrix() -> [Complex64; 4] {
        [
            Complex64::ZERO,
            Complex64::new(1.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::ZERO,
        ]
    }

    #[test]
    fn test_identity_has_unit_fidelity() {
        let pkg = Package::new();
        let ident = pkg.make_identity(3).unwrap();
        assert_abs_diff_eq!(
            weighted_trace_fidelity(&pkg, &ident, 3),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_traceless_operator_has_zero_fidelity() {
        let pkg = Package::new();
        let x = pkg.make_gate(2, x_matrix(), &[], 0).unwrap();
        assert_abs_diff_eq!(weighted_trace_fidelity(&pkg, &x, 2), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_phase_rotation_fidelity_between_zero_and_one() {
        let pkg = Package::new();
        let theta = 0.4_f64;
        let rz = [
            Complex64::from_polar(1.0, -theta / 2.0),
            Complex64::ZERO,
            Complex64::ZERO,
            Complex64::from_polar(1.0, theta / 2.0),
        ];
        let gate = pkg.make_gate(1, rz, &[], 0).unwrap();
        // |tr Rz(θ)|²/4 = cos²(θ/2)
        let expected = (theta / 2.0).cos().powi(2);
        assert_abs_diff_eq!(
            weighted_trace_fidelity(&pkg, &gate, 1),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_terminal_diagram_yields_unit_fidelity() {
        let pkg = Package::new();
        let scalar = pkg.make_identity(0).unwrap();
        assert_abs_diff_eq!(
            weighted_trace_fidelity(&pkg, &scalar, 0),
            1.0,
            epsilon = 1e-12
        );
    }
}
