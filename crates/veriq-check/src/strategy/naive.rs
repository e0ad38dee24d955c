//! Strict one-for-one alternation.

use crate::error::CheckResult;

use super::{ScheduleContext, SchedulingStrategy};

/// Alternate strictly: one gate from the left stream, one from the right,
/// until either side is exhausted or reaches a measurement.
pub struct NaiveScheduler;

impl SchedulingStrategy for NaiveScheduler {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn schedule(&self, ctx: &mut ScheduleContext<'_, '_>) -> CheckResult<()> {
        while !ctx.left_exhausted()
            && !ctx.right_exhausted()
            && !ctx.left_at_measure()
            && !ctx.right_at_measure()
        {
            ctx.advance_left()?;
            ctx.advance_right()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veriq_dd::Package;
    use veriq_ir::{Circuit, ClbitId, QubitId};

    #[test]
    fn test_alternation_consumes_both_streams() {
        let pkg = Package::new();
        let mut lhs = Circuit::with_size("a", 1);
        lhs.x(QubitId(0)).unwrap().x(QubitId(0)).unwrap();
        let mut rhs = Circuit::with_size("b", 1);
        rhs.x(QubitId(0)).unwrap().x(QubitId(0)).unwrap();

        let initial = pkg.make_identity(1).unwrap();
        let mut ctx = ScheduleContext::new(&pkg, &lhs, &rhs, initial, 1);
        NaiveScheduler.schedule(&mut ctx).unwrap();
        assert!(ctx.left_exhausted());
        assert!(ctx.right_exhausted());
    }

    #[test]
    fn test_stops_at_measurement() {
        let pkg = Package::new();
        let mut lhs = Circuit::with_size("a", 1);
        lhs.x(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap();
        let mut rhs = Circuit::with_size("b", 1);
        rhs.x(QubitId(0)).unwrap().x(QubitId(0)).unwrap();

        let initial = pkg.make_identity(1).unwrap();
        let mut ctx = ScheduleContext::new(&pkg, &lhs, &rhs, initial, 1);
        NaiveScheduler.schedule(&mut ctx).unwrap();
        // one pair folded, then the left measurement halts the loop
        assert!(ctx.left_at_measure());
        assert!(!ctx.right_exhausted());
    }
}
