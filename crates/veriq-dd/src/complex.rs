//! Tolerance-based interning of complex edge weights.

use num_complex::Complex64;
use rustc_hash::FxHashMap;

/// Interned index of the complex value 0.
pub const WEIGHT_ZERO: u32 = 0;
/// Interned index of the complex value 1.
pub const WEIGHT_ONE: u32 = 1;

/// Default numerical tolerance for weight comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-13;

/// Interning table for complex edge weights.
///
/// Two weights within the tolerance of each other share one canonical index,
/// so weight equality — and with it node-level hash consing — is plain index
/// comparison. Lookup buckets values on a tolerance-sized grid and probes the
/// neighboring cells, so near-boundary values still canonicalize.
#[derive(Debug)]
pub struct ComplexTable {
    values: Vec<Complex64>,
    cells: FxHashMap<(i64, i64), u32>,
    tolerance: f64,
}

impl ComplexTable {
    /// Create a table with the given tolerance, pre-seeding 0 and 1.
    pub fn new(tolerance: f64) -> Self {
        assert!(
            tolerance.is_finite() && tolerance > 0.0,
            "tolerance must be a positive finite number"
        );
        let mut table = Self {
            values: vec![],
            cells: FxHashMap::default(),
            tolerance,
        };
        let zero = table.intern(Complex64::ZERO);
        let one = table.intern(Complex64::new(1.0, 0.0));
        debug_assert_eq!(zero, WEIGHT_ZERO);
        debug_assert_eq!(one, WEIGHT_ONE);
        table
    }

    /// Get the tolerance this table canonicalizes under.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Number of distinct interned values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the table holds no values (never true after `new`).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the canonical value behind an index.
    #[inline]
    pub fn value(&self, index: u32) -> Complex64 {
        self.values[index as usize]
    }

    /// Intern a value, returning the canonical index of its equivalence cell.
    pub fn lookup(&mut self, value: Complex64) -> u32 {
        let (kr, ki) = self.cell_of(value);
        for dr in -1..=1 {
            for di in -1..=1 {
                if let Some(&idx) = self.cells.get(&(kr + dr, ki + di)) {
                    let canonical = self.values[idx as usize];
                    if (canonical.re - value.re).abs() <= self.tolerance
                        && (canonical.im - value.im).abs() <= self.tolerance
                    {
                        return idx;
                    }
                }
            }
        }
        self.intern(value)
    }

    fn intern(&mut self, value: Complex64) -> u32 {
        let idx = u32::try_from(self.values.len()).expect("complex table overflow");
        self.values.push(value);
        self.cells.entry(self.cell_of_raw(value)).or_insert(idx);
        idx
    }

    fn cell_of(&self, value: Complex64) -> (i64, i64) {
        self.cell_of_raw(value)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_of_raw(&self, value: Complex64) -> (i64, i64) {
        (
            (value.re / self.tolerance).floor() as i64,
            (value.im / self.tolerance).floor() as i64,
        )
    }
}

impl Default for ComplexTable {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_constants() {
        let table = ComplexTable::default();
        assert_eq!(table.value(WEIGHT_ZERO), Complex64::ZERO);
        assert_eq!(table.value(WEIGHT_ONE), Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_near_values_share_index() {
        let mut table = ComplexTable::default();
        let a = table.lookup(Complex64::new(0.5, 0.25));
        let b = table.lookup(Complex64::new(0.5 + 1e-15, 0.25 - 1e-15));
        assert_eq!(a, b);
    }

    #[test]
    fn test_rounding_drift_canonicalizes_to_one() {
        let mut table = ComplexTable::default();
        // (1/sqrt(2))^2 * 2 accumulates a last-bit error
        let s = 1.0 / 2.0_f64.sqrt();
        let drifted = Complex64::new(s * s * 2.0, 0.0);
        assert_eq!(table.lookup(drifted), WEIGHT_ONE);
    }

    #[test]
    fn test_near_zero_canonicalizes_to_zero() {
        let mut table = ComplexTable::default();
        assert_eq!(table.lookup(Complex64::new(1e-16, -1e-16)), WEIGHT_ZERO);
    }

    #[test]
    fn test_distinct_values_stay_distinct() {
        let mut table = ComplexTable::default();
        let a = table.lookup(Complex64::new(0.1, 0.0));
        let b = table.lookup(Complex64::new(0.2, 0.0));
        assert_ne!(a, b);
        assert_eq!(table.lookup(Complex64::new(0.1, 0.0)), a);
    }
}
