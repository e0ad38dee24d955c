//! Side tags for reduction operations.

use std::fmt;

/// Which circuit of the comparison a reduction refers to.
///
/// In the `G · R · G'⁻¹` composition the left circuit's qubits live on the
/// matrix rows and the right circuit's on the columns, so every reduction
/// call must say which side it is shaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The left circuit (operators fold as `g · R`; matrix rows).
    Left,
    /// The right circuit (operators fold as `R · g⁻¹`; matrix columns).
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}
