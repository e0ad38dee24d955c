//! VeriQ Decision-Diagram Algebra Engine
//!
//! Canonical decision diagrams for complex-weighted linear operators. A
//! [`Package`] is an arena owning every node; hash consing plus
//! tolerance-based weight interning make structurally identical operators
//! resolve to identical indices, so operator equality is index comparison.
//!
//! Roots are held through [`DdHandle`] values: creation retains, `Drop`
//! releases, cloning re-retains. There is no manual reference-count pairing
//! anywhere outside the arena.
//!
//! # Example
//!
//! ```rust
//! use veriq_dd::Package;
//! use num_complex::Complex64;
//!
//! let pkg = Package::new();
//! let s = 1.0 / 2.0_f64.sqrt();
//! let h = [
//!     Complex64::new(s, 0.0),
//!     Complex64::new(s, 0.0),
//!     Complex64::new(s, 0.0),
//!     Complex64::new(-s, 0.0),
//! ];
//! let gate = pkg.make_gate(1, h, &[], 0).unwrap();
//! let squared = pkg.multiply(&gate, &gate).unwrap();
//! let ident = pkg.make_identity(1).unwrap();
//! assert!(squared.structurally_equals(&ident));
//! ```

pub mod complex;
pub mod error;
pub mod handle;
pub mod node;
pub mod package;
pub mod side;

pub use complex::{ComplexTable, DEFAULT_TOLERANCE, WEIGHT_ONE, WEIGHT_ZERO};
pub use error::{DdError, DdResult};
pub use handle::DdHandle;
pub use node::{Edge, Node, TERMINAL};
pub use package::Package;
pub use side::Side;
