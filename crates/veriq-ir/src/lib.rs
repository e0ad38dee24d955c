//! VeriQ Circuit Intermediate Representation
//!
//! This crate provides the gate-stream representation consumed by the VeriQ
//! equivalence checker. A [`Circuit`] is an ordered instruction list plus the
//! comparison metadata the checker needs: per-line ancillary/garbage flags
//! and the initial/output qubit-to-line permutations.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`], [`ClbitId`] for addressing lines and classical
//!   bits
//! - **Gates**: [`StandardGate`], single-qubit base gates with concrete
//!   angles; controls are instruction operands
//! - **Matrices**: [`Unitary2x2`], concrete 2x2 gate semantics
//! - **Instructions**: [`Instruction`], gates/swaps/measurements/barriers
//!   with their operands
//! - **Permutations**: [`Permutation`], bijective qubit-to-line mappings
//! - **Circuit**: [`Circuit`], the ordered stream plus metadata
//!
//! # Example: Building a Bell-pair circuit
//!
//! ```rust
//! use veriq_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_ops(), 2);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod matrix;
pub mod permutation;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::Instruction;
pub use matrix::Unitary2x2;
pub use permutation::Permutation;
pub use qubit::{ClbitId, QubitId};
