//! Gate-interleaving strategies.
//!
//! The three strategies form a closed set behind one interface: each consumes
//! both gate streams through a [`ScheduleContext`], folding gates into the
//! shared running operator. Within a stream the gate order is inviolable;
//! only the interleaving across the two streams is strategy-defined.

mod lookahead;
mod naive;
mod proportional;

pub use lookahead::LookaheadScheduler;
pub use naive::NaiveScheduler;
pub use proportional::ProportionalScheduler;

use veriq_dd::{DdHandle, Package, Side};
use veriq_ir::{Circuit, Instruction, Permutation};

use crate::apply::{fold_instruction, gate_dd};
use crate::error::CheckResult;

/// One scheduling strategy of the alternating scheme.
pub trait SchedulingStrategy {
    /// Get the name of this strategy.
    fn name(&self) -> &'static str;

    /// Interleave both gate streams into the context's running operator
    /// until either side is exhausted or reaches a measurement.
    fn schedule(&self, ctx: &mut ScheduleContext<'_, '_>) -> CheckResult<()>;
}

/// Shared state a strategy advances: both cursors, both permutations, and
/// the running operator.
pub struct ScheduleContext<'c, 'p> {
    package: &'p Package,
    lhs: &'c Circuit,
    rhs: &'c Circuit,
    perm_left: Permutation,
    perm_right: Permutation,
    cursor_left: usize,
    cursor_right: usize,
    result: Option<DdHandle<'p>>,
    nqubits: u32,
}

impl<'c, 'p> ScheduleContext<'c, 'p> {
    /// Create a context positioned at the start of both streams.
    pub fn new(
        package: &'p Package,
        lhs: &'c Circuit,
        rhs: &'c Circuit,
        initial: DdHandle<'p>,
        nqubits: u32,
    ) -> Self {
        Self {
            package,
            lhs,
            rhs,
            perm_left: lhs.initial_layout().clone(),
            perm_right: rhs.initial_layout().clone(),
            cursor_left: 0,
            cursor_right: 0,
            result: Some(initial),
            nqubits,
        }
    }

    /// Get the arena the running operator lives in.
    pub fn package(&self) -> &'p Package {
        self.package
    }

    /// Gate count of the left stream.
    pub fn left_ops(&self) -> usize {
        self.lhs.num_ops()
    }

    /// Gate count of the right stream.
    pub fn right_ops(&self) -> usize {
        self.rhs.num_ops()
    }

    /// Check whether the left cursor has passed the last instruction.
    pub fn left_exhausted(&self) -> bool {
        self.cursor_left >= self.lhs.num_ops()
    }

    /// Check whether the right cursor has passed the last instruction.
    pub fn right_exhausted(&self) -> bool {
        self.cursor_right >= self.rhs.num_ops()
    }

    /// Check whether the next left instruction is a measurement.
    pub fn left_at_measure(&self) -> bool {
        self.lhs
            .instructions()
            .get(self.cursor_left)
            .is_some_and(Instruction::is_measure)
    }

    /// Check whether the next right instruction is a measurement.
    pub fn right_at_measure(&self) -> bool {
        self.rhs
            .instructions()
            .get(self.cursor_right)
            .is_some_and(Instruction::is_measure)
    }

    /// Fold the next left instruction and advance the left cursor.
    pub fn advance_left(&mut self) -> CheckResult<()> {
        let inst = &self.lhs.instructions()[self.cursor_left];
        self.cursor_left += 1;
        let result = self.take_result();
        let folded = fold_instruction(
            self.package,
            result,
            inst,
            &mut self.perm_left,
            Side::Left,
            self.nqubits,
        )?;
        self.put_result(folded);
        Ok(())
    }

    /// Fold the next right instruction and advance the right cursor.
    pub fn advance_right(&mut self) -> CheckResult<()> {
        let inst = &self.rhs.instructions()[self.cursor_right];
        self.cursor_right += 1;
        let result = self.take_result();
        let folded = fold_instruction(
            self.package,
            result,
            inst,
            &mut self.perm_right,
            Side::Right,
            self.nqubits,
        )?;
        self.put_result(folded);
        Ok(())
    }

    /// Fold every remaining left instruction in order.
    pub fn drain_left(&mut self) -> CheckResult<()> {
        while !self.left_exhausted() {
            self.advance_left()?;
        }
        Ok(())
    }

    /// Fold every remaining right instruction in order.
    pub fn drain_right(&mut self) -> CheckResult<()> {
        while !self.right_exhausted() {
            self.advance_right()?;
        }
        Ok(())
    }

    /// Build the next left gate as a pending operand without folding it.
    ///
    /// SWAPs and barriers are consumed on the way (they build no operand);
    /// `None` means the stream hit a measurement or its end.
    pub(crate) fn take_left_operand(&mut self) -> CheckResult<Option<DdHandle<'p>>> {
        while let Some(inst) = self.lhs.instructions().get(self.cursor_left) {
            match inst {
                Instruction::Measure { .. } => return Ok(None),
                Instruction::Swap { a, b } => {
                    self.perm_left.swap_lines_of(*a, *b)?;
                    self.cursor_left += 1;
                }
                Instruction::Barrier { .. } => {
                    self.cursor_left += 1;
                }
                Instruction::Gate {
                    gate,
                    controls,
                    target,
                } => {
                    let op = gate_dd(
                        self.package,
                        *gate,
                        controls,
                        *target,
                        &self.perm_left,
                        self.nqubits,
                        false,
                    )?;
                    self.cursor_left += 1;
                    return Ok(Some(op));
                }
            }
        }
        Ok(None)
    }

    /// Build the next right gate as a pending *inverse* operand.
    ///
    /// Right-hand operands compose on the far side of the running product,
    /// so the gate is applied in inverted form.
    pub(crate) fn take_right_operand(&mut self) -> CheckResult<Option<DdHandle<'p>>> {
        while let Some(inst) = self.rhs.instructions().get(self.cursor_right) {
            match inst {
                Instruction::Measure { .. } => return Ok(None),
                Instruction::Swap { a, b } => {
                    self.perm_right.swap_lines_of(*a, *b)?;
                    self.cursor_right += 1;
                }
                Instruction::Barrier { .. } => {
                    self.cursor_right += 1;
                }
                Instruction::Gate {
                    gate,
                    controls,
                    target,
                } => {
                    let op = gate_dd(
                        self.package,
                        *gate,
                        controls,
                        *target,
                        &self.perm_right,
                        self.nqubits,
                        true,
                    )?;
                    self.cursor_right += 1;
                    return Ok(Some(op));
                }
            }
        }
        Ok(None)
    }

    /// Take ownership of the running operator.
    pub(crate) fn take_result(&mut self) -> DdHandle<'p> {
        self.result.take().expect("scheduling result is always present")
    }

    /// Hand the running operator back.
    pub(crate) fn put_result(&mut self, result: DdHandle<'p>) {
        self.result = Some(result);
    }

    /// Dissolve the context into the operator and both evolved permutations.
    pub(crate) fn into_parts(mut self) -> (DdHandle<'p>, Permutation, Permutation) {
        let result = self.take_result();
        (result, self.perm_left, self.perm_right)
    }
}
