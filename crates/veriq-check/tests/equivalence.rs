//! Integration tests for the alternating equivalence checker.
//!
//! These exercise the checker end to end: reflexivity under every strategy,
//! perturbation sensitivity, verdict agreement across strategies, asymmetric
//! ancilla handling, fidelity sanity and reference-count hygiene.

use std::f64::consts::PI;

use approx::assert_abs_diff_eq;
use proptest::prelude::*;

use veriq_check::{Configuration, EquivalenceChecker, Strategy};
use veriq_dd::Package;
use veriq_ir::{Circuit, QubitId};

const ALL_STRATEGIES: [Strategy; 3] =
    [Strategy::Naive, Strategy::Proportional, Strategy::Lookahead];

/// Helper: run one check with a fresh package.
fn check_with(lhs: &Circuit, rhs: &Circuit, strategy: Strategy) -> bool {
    let pkg = Package::new();
    let config = Configuration::new().with_strategy(strategy);
    EquivalenceChecker::new(&pkg, lhs.clone(), rhs.clone(), config)
        .check()
        .unwrap()
        .equivalence
}

/// Helper: a small but non-trivial benchmark circuit.
fn layered_circuit() -> Circuit {
    let mut circuit = Circuit::with_size("layered", 3);
    circuit.h(QubitId(0)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.rz(PI / 3.0, QubitId(1)).unwrap();
    circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
    circuit.swap(QubitId(0), QubitId(2)).unwrap();
    circuit.t(QubitId(2)).unwrap();
    circuit.cx(QubitId(1), QubitId(2)).unwrap();
    circuit
}

// ============================================================================
// Reflexivity
// ============================================================================

#[test]
fn test_reflexivity_under_every_strategy() {
    let circuit = layered_circuit();
    for strategy in ALL_STRATEGIES {
        assert!(
            check_with(&circuit, &circuit, strategy),
            "reflexivity failed under {strategy}"
        );
    }
}

#[test]
fn test_empty_circuits_are_equivalent() {
    let lhs = Circuit::with_size("a", 2);
    let rhs = Circuit::with_size("b", 2);
    for strategy in ALL_STRATEGIES {
        assert!(check_with(&lhs, &rhs, strategy));
    }
}

// ============================================================================
// Rewritten-but-equal circuits
// ============================================================================

#[test]
fn test_swap_gate_matches_cx_triple() {
    let mut lhs = Circuit::with_size("swapped", 2);
    lhs.swap(QubitId(0), QubitId(1)).unwrap();
    let mut rhs = Circuit::with_size("cx_triple", 2);
    rhs.cx(QubitId(0), QubitId(1)).unwrap();
    rhs.cx(QubitId(1), QubitId(0)).unwrap();
    rhs.cx(QubitId(0), QubitId(1)).unwrap();
    for strategy in ALL_STRATEGIES {
        assert!(check_with(&lhs, &rhs, strategy));
    }
}

#[test]
fn test_merged_rotations_match() {
    let mut lhs = Circuit::with_size("split", 1);
    lhs.rz(0.4, QubitId(0)).unwrap();
    lhs.rz(0.35, QubitId(0)).unwrap();
    let mut rhs = Circuit::with_size("merged", 1);
    rhs.rz(0.75, QubitId(0)).unwrap();
    for strategy in ALL_STRATEGIES {
        assert!(check_with(&lhs, &rhs, strategy));
    }
}

#[test]
fn test_global_phase_difference_is_detected() {
    // S vs P(π/2) are identical, but Z vs Rz(π) differ by a global i
    let mut lhs = Circuit::with_size("z", 1);
    lhs.z(QubitId(0)).unwrap();
    let mut phase_equal = Circuit::with_size("p", 1);
    phase_equal.p(PI, QubitId(0)).unwrap();
    assert!(check_with(&lhs, &phase_equal, Strategy::Proportional));

    let mut rotated = Circuit::with_size("rz", 1);
    rotated.rz(PI, QubitId(0)).unwrap();
    assert!(!check_with(&lhs, &rotated, Strategy::Proportional));
}

// ============================================================================
// Negative cases
// ============================================================================

#[test]
fn test_perturbed_parameter_breaks_equivalence() {
    let mut lhs = Circuit::with_size("a", 2);
    lhs.h(QubitId(0)).unwrap();
    lhs.crz(0.5, QubitId(0), QubitId(1)).unwrap();
    let mut rhs = Circuit::with_size("b", 2);
    rhs.h(QubitId(0)).unwrap();
    rhs.crz(0.5 + 1e-3, QubitId(0), QubitId(1)).unwrap();
    for strategy in ALL_STRATEGIES {
        assert!(!check_with(&lhs, &rhs, strategy));
    }
}

#[test]
fn test_missing_gate_breaks_equivalence() {
    let lhs = layered_circuit();
    let mut rhs = layered_circuit();
    rhs.instructions_mut().pop();
    for strategy in ALL_STRATEGIES {
        assert!(!check_with(&lhs, &rhs, strategy));
    }
}

// ============================================================================
// Strategy agreement
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_strategies_agree_on_reflexive_pairs(
        ops in proptest::collection::vec((0u8..6, 0u32..2, 0u32..2), 0..12)
    ) {
        let mut circuit = Circuit::with_size("random", 2);
        for (kind, a, b) in ops {
            let (a, b) = (QubitId(a), QubitId(b));
            match kind {
                0 => { circuit.h(a).unwrap(); }
                1 => { circuit.t(a).unwrap(); }
                2 => { circuit.x(a).unwrap(); }
                3 if a != b => { circuit.cx(a, b).unwrap(); }
                4 if a != b => { circuit.swap(a, b).unwrap(); }
                5 => { circuit.rx(0.37, a).unwrap(); }
                _ => { circuit.s(a).unwrap(); }
            }
        }
        for strategy in ALL_STRATEGIES {
            prop_assert!(check_with(&circuit, &circuit, strategy));
        }
    }
}

#[test]
fn test_strategies_agree_on_negative_pair() {
    let lhs = layered_circuit();
    let mut rhs = layered_circuit();
    rhs.x(QubitId(1)).unwrap();
    let verdicts: Vec<bool> = ALL_STRATEGIES
        .iter()
        .map(|&s| check_with(&lhs, &rhs, s))
        .collect();
    assert_eq!(verdicts, vec![false, false, false]);
}

// ============================================================================
// Ancilla and garbage handling
// ============================================================================

#[test]
fn test_extra_idle_ancilla_keeps_equivalence() {
    // lhs carries a declared, never-touched ancilla line that rhs lacks
    let mut lhs = Circuit::with_size("with_ancilla", 2);
    lhs.h(QubitId(0)).unwrap();
    lhs.set_ancillary(QubitId(1)).unwrap();
    let mut rhs = Circuit::with_size("plain", 1);
    rhs.h(QubitId(0)).unwrap();
    for strategy in ALL_STRATEGIES {
        assert!(check_with(&lhs, &rhs, strategy));
    }
}

#[test]
fn test_undeclared_extra_line_breaks_equivalence() {
    // without the ancillary declaration the extra line is compared literally
    let mut lhs = Circuit::with_size("wide", 2);
    lhs.h(QubitId(0)).unwrap();
    lhs.x(QubitId(1)).unwrap();
    let mut rhs = Circuit::with_size("narrow", 1);
    rhs.h(QubitId(0)).unwrap();
    assert!(!check_with(&lhs, &rhs, Strategy::Proportional));
}

#[test]
fn test_garbage_output_ignores_difference() {
    let mut lhs = Circuit::with_size("a", 1);
    lhs.x(QubitId(0)).unwrap();
    lhs.set_garbage(QubitId(0)).unwrap();
    let mut rhs = Circuit::with_size("b", 1);
    rhs.set_garbage(QubitId(0)).unwrap();
    assert!(check_with(&lhs, &rhs, Strategy::Proportional));
}

// ============================================================================
// Fidelity
// ============================================================================

#[test]
fn test_fidelity_of_equal_circuits_is_one() {
    let circuit = layered_circuit();
    let pkg = Package::new();
    let config = Configuration::new().with_fidelity();
    let result = EquivalenceChecker::new(&pkg, circuit.clone(), circuit, config)
        .check()
        .unwrap();
    assert!(result.equivalence);
    assert_abs_diff_eq!(result.fidelity.unwrap(), 1.0, epsilon = 1e-9);
}

#[test]
fn test_fidelity_of_orthogonal_operators_is_zero() {
    let mut lhs = Circuit::with_size("x", 1);
    lhs.x(QubitId(0)).unwrap();
    let rhs = Circuit::with_size("id", 1);
    let pkg = Package::new();
    let config = Configuration::new().with_fidelity();
    let result = EquivalenceChecker::new(&pkg, lhs, rhs, config)
        .check()
        .unwrap();
    assert!(!result.equivalence);
    assert_abs_diff_eq!(result.fidelity.unwrap(), 0.0, epsilon = 1e-9);
}

#[test]
fn test_fidelity_absent_unless_requested() {
    let circuit = layered_circuit();
    let pkg = Package::new();
    let result =
        EquivalenceChecker::new(&pkg, circuit.clone(), circuit, Configuration::new())
            .check()
            .unwrap();
    assert!(result.fidelity.is_none());
}

// ============================================================================
// Proportional scheduling
// ============================================================================

#[test]
fn test_proportional_ratio_example() {
    // 10 gates against 2: ratio 5, remainder drained after the short side ends
    let mut lhs = Circuit::with_size("long", 1);
    for _ in 0..10 {
        lhs.x(QubitId(0)).unwrap();
    }
    let mut rhs = Circuit::with_size("short", 1);
    rhs.x(QubitId(0)).unwrap();
    rhs.x(QubitId(0)).unwrap();
    assert!(check_with(&lhs, &rhs, Strategy::Proportional));
}

// ============================================================================
// Resource discipline
// ============================================================================

#[test]
fn test_result_handle_keeps_operator_alive() {
    let circuit = layered_circuit();
    let pkg = Package::new();
    let result =
        EquivalenceChecker::new(&pkg, circuit.clone(), circuit, Configuration::new())
            .check()
            .unwrap();
    // the reduced operator is still retained through the result
    assert!(pkg.num_active_nodes() > 0);
    assert!(result.max_active_nodes >= pkg.num_active_nodes());

    // releasing the result returns the arena to its baseline
    drop(result);
    pkg.garbage_collect(true);
    assert_eq!(pkg.num_active_nodes(), 0);
}

#[test]
fn test_summary_round_trips_through_json() {
    let circuit = layered_circuit();
    let pkg = Package::new();
    let config = Configuration::new().with_fidelity();
    let result = EquivalenceChecker::new(&pkg, circuit.clone(), circuit, config)
        .check()
        .unwrap();
    let summary = result.summary();
    let json = summary.to_json().unwrap();
    let parsed: veriq_check::ResultSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, summary);
}

// ============================================================================
// Pre-check passes through the full pipeline
// ============================================================================

#[test]
fn test_prechecks_preserve_verdicts() {
    let mut lhs = Circuit::with_size("a", 2);
    lhs.h(QubitId(0)).unwrap();
    lhs.t(QubitId(0)).unwrap();
    lhs.tdg(QubitId(0)).unwrap();
    lhs.cx(QubitId(0), QubitId(1)).unwrap();
    lhs.cx(QubitId(1), QubitId(0)).unwrap();
    lhs.cx(QubitId(0), QubitId(1)).unwrap();
    let mut rhs = Circuit::with_size("b", 2);
    rhs.h(QubitId(0)).unwrap();
    rhs.swap(QubitId(0), QubitId(1)).unwrap();

    let config = Configuration::new()
        .with_swap_reconstruction()
        .with_single_qubit_gate_fusion();
    let pkg = Package::new();
    let result = EquivalenceChecker::new(&pkg, lhs, rhs, config)
        .check()
        .unwrap();
    assert!(result.equivalence);
}
