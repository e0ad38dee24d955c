//! Quantum gate types.
//!
//! [`StandardGate`] is the closed set of single-qubit base gates. Controlled
//! variants are not separate gate types: controls are operands of the
//! enclosing instruction, so `CX` is `X` with one control and `CCX` is `X`
//! with two.

use serde::{Deserialize, Serialize};

use crate::matrix::Unitary2x2;

/// Standard single-qubit gates with known semantics and concrete angles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(f64, f64, f64),
    /// Global phase: e^(iγ) times the identity.
    GPhase(f64),
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(_, _, _) => "u",
            StandardGate::GPhase(_) => "gphase",
        }
    }

    /// Get the rotation angles of this gate.
    pub fn params(&self) -> Vec<f64> {
        match *self {
            StandardGate::Rx(t)
            | StandardGate::Ry(t)
            | StandardGate::Rz(t)
            | StandardGate::P(t)
            | StandardGate::GPhase(t) => vec![t],
            StandardGate::U(t, p, l) => vec![t, p, l],
            _ => vec![],
        }
    }

    /// Check if this gate's matrix is diagonal (only affects phases).
    pub fn is_diagonal(&self) -> bool {
        matches!(
            self,
            StandardGate::I
                | StandardGate::Z
                | StandardGate::S
                | StandardGate::Sdg
                | StandardGate::T
                | StandardGate::Tdg
                | StandardGate::Rz(_)
                | StandardGate::P(_)
                | StandardGate::GPhase(_)
        )
    }

    /// Get the 2x2 matrix of this gate.
    pub fn matrix(&self) -> Unitary2x2 {
        match *self {
            StandardGate::I => Unitary2x2::identity(),
            StandardGate::X => Unitary2x2::x(),
            StandardGate::Y => Unitary2x2::y(),
            StandardGate::Z => Unitary2x2::z(),
            StandardGate::H => Unitary2x2::h(),
            StandardGate::S => Unitary2x2::s(),
            StandardGate::Sdg => Unitary2x2::sdg(),
            StandardGate::T => Unitary2x2::t(),
            StandardGate::Tdg => Unitary2x2::tdg(),
            StandardGate::SX => Unitary2x2::sx(),
            StandardGate::SXdg => Unitary2x2::sxdg(),
            StandardGate::Rx(theta) => Unitary2x2::rx(theta),
            StandardGate::Ry(theta) => Unitary2x2::ry(theta),
            StandardGate::Rz(theta) => Unitary2x2::rz(theta),
            StandardGate::P(lambda) => Unitary2x2::p(lambda),
            StandardGate::U(theta, phi, lambda) => Unitary2x2::u(theta, phi, lambda),
            StandardGate::GPhase(gamma) => Unitary2x2::gphase(gamma),
        }
    }

    /// Get the algebraic inverse (adjoint) of this gate.
    ///
    /// Hermitian gates are self-inverse; rotations negate their angle;
    /// `U(θ, φ, λ)` inverts to `U(-θ, -λ, -φ)`.
    pub fn inverse(&self) -> StandardGate {
        match *self {
            StandardGate::I => StandardGate::I,
            StandardGate::X => StandardGate::X,
            StandardGate::Y => StandardGate::Y,
            StandardGate::Z => StandardGate::Z,
            StandardGate::H => StandardGate::H,
            StandardGate::S => StandardGate::Sdg,
            StandardGate::Sdg => StandardGate::S,
            StandardGate::T => StandardGate::Tdg,
            StandardGate::Tdg => StandardGate::T,
            StandardGate::SX => StandardGate::SXdg,
            StandardGate::SXdg => StandardGate::SX,
            StandardGate::Rx(theta) => StandardGate::Rx(-theta),
            StandardGate::Ry(theta) => StandardGate::Ry(-theta),
            StandardGate::Rz(theta) => StandardGate::Rz(-theta),
            StandardGate::P(lambda) => StandardGate::P(-lambda),
            StandardGate::U(theta, phi, lambda) => StandardGate::U(-theta, -lambda, -phi),
            StandardGate::GPhase(gamma) => StandardGate::GPhase(-gamma),
        }
    }
}
