//! VeriQ Equivalence Checking
//!
//! Proves that two quantum circuits implement the same unitary (modulo
//! ancillary and garbage qubits) by building one canonical decision diagram
//! for the combined operator `G · I · G'⁻¹` and comparing it structurally
//! against a goal matrix.
//!
//! # Architecture
//!
//! ```text
//! Circuit pair (veriq-ir)
//!       │
//!       ▼
//! ┌──────────────────────┐
//! │ EquivalenceChecker   │ ◄── Configuration (strategy, fidelity, passes)
//! └──────────────────────┘
//!       │
//!       ├── PrecheckRunner: swap reconstruction, gate fusion, …
//!       ├── create_initial_matrix / create_goal_matrix
//!       ├── Naive / Proportional / Lookahead scheduling
//!       ├── permutation normalization + garbage/ancilla reduction
//!       └── verdict (+ optional weighted-trace fidelity)
//!       │
//!       ▼
//! EquivalenceCheckingResult
//! ```
//!
//! # Example
//!
//! ```rust
//! use veriq_check::{Configuration, EquivalenceChecker, Strategy};
//! use veriq_dd::Package;
//! use veriq_ir::{Circuit, QubitId};
//!
//! let mut lhs = Circuit::with_size("bell", 2);
//! lhs.h(QubitId(0)).unwrap();
//! lhs.cx(QubitId(0), QubitId(1)).unwrap();
//! let rhs = lhs.clone();
//!
//! let package = Package::new();
//! let config = Configuration::new().with_strategy(Strategy::Lookahead);
//! let result = EquivalenceChecker::new(&package, lhs, rhs, config)
//!     .check()
//!     .unwrap();
//! assert!(result.equivalence);
//! ```

mod apply;

pub mod checker;
pub mod config;
pub mod error;
pub mod fidelity;
pub mod matrix;
pub mod passes;
pub mod result;
pub mod strategy;

pub use checker::EquivalenceChecker;
pub use config::{Configuration, Strategy};
pub use error::{CheckError, CheckResult};
pub use fidelity::weighted_trace_fidelity;
pub use matrix::{create_goal_matrix, create_initial_matrix};
pub use passes::{
    FuseSingleQubitGates, PrecheckPass, PrecheckRunner, ReconstructSwaps,
    RemoveDiagonalGatesBeforeMeasure,
};
pub use result::{EquivalenceCheckingResult, ResultSummary};
pub use strategy::{
    LookaheadScheduler, NaiveScheduler, ProportionalScheduler, ScheduleContext,
    SchedulingStrategy,
};
