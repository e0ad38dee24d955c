//! Size-guided lookahead alternation.

use crate::error::CheckResult;

use super::{ScheduleContext, SchedulingStrategy};

/// Keep at most one pending operand per side, tentatively fold both, and
/// commit whichever yields the smaller intermediate diagram.
///
/// The left operand is the next gate's forward diagram, the right operand
/// the next gate's inverse. Only the committed side's cursor state moves on;
/// the loser stays cached for the next round. The loop ends at either
/// stream's end or measurement; a still-cached operand is flushed into the
/// result before returning. When neither side holds a pending operand and
/// both upcoming gates are measurements, the loop terminates with nothing to
/// flush.
pub struct LookaheadScheduler;

impl SchedulingStrategy for LookaheadScheduler {
    fn name(&self) -> &'static str {
        "lookahead"
    }

    fn schedule(&self, ctx: &mut ScheduleContext<'_, '_>) -> CheckResult<()> {
        let package = ctx.package();
        let mut cached_left = None;
        let mut cached_right = None;

        loop {
            if ctx.left_exhausted() || ctx.right_exhausted() {
                break;
            }
            if cached_left.is_none() {
                match ctx.take_left_operand()? {
                    Some(op) => cached_left = Some(op),
                    None => break,
                }
            }
            if cached_right.is_none() {
                match ctx.take_right_operand()? {
                    Some(op) => cached_right = Some(op),
                    None => break,
                }
            }

            let left = cached_left.take().expect("pending left operand");
            let right = cached_right.take().expect("pending right operand");
            let saved = ctx.take_result();
            let look_left = package.multiply(&left, &saved)?;
            let look_right = package.multiply(&saved, &right)?;

            if look_left.size() <= look_right.size() {
                ctx.put_result(look_left);
                cached_right = Some(right);
            } else {
                ctx.put_result(look_right);
                cached_left = Some(left);
            }
            drop(saved);
            package.garbage_collect(false);
        }

        if let Some(left) = cached_left {
            let saved = ctx.take_result();
            let flushed = package.multiply(&left, &saved)?;
            ctx.put_result(flushed);
            drop(saved);
            package.garbage_collect(false);
        }
        if let Some(right) = cached_right {
            let saved = ctx.take_result();
            let flushed = package.multiply(&saved, &right)?;
            ctx.put_result(flushed);
            drop(saved);
            package.garbage_collect(false);
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
    fn test_flushes_pending_operand_on_exit() {
        let pkg = Package::new();
        let mut lhs = Circuit::with_size("a", 1);
        lhs.h(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
        let mut rhs = Circuit::with_size("b", 1);
        rhs.x(QubitId(0)).unwrap();

        let initial = pkg.make_identity(1).unwrap();
        let mut ctx = ScheduleContext::new(&pkg, &lhs, &rhs, initial, 1);
        LookaheadScheduler.schedule(&mut ctx).unwrap();
        // whichever side lagged, nothing stays cached
        ctx.drain_left().unwrap();
        ctx.drain_right().unwrap();
        assert!(ctx.left_exhausted());
        assert!(ctx.right_exhausted());
    }

    #[test]
    fn test_double_measurement_terminates_without_folding() {
        let pkg = Package::new();
        let mut lhs = Circuit::with_size("a", 1);
        lhs.measure(QubitId(0), ClbitId(0)).unwrap();
        let mut rhs = Circuit::with_size("b", 1);
        rhs.measure(QubitId(0), ClbitId(0)).unwrap();

        let initial = pkg.make_identity(1).unwrap();
        let root = initial.root();
        let mut ctx = ScheduleContext::new(&pkg, &lhs, &rhs, initial, 1);
        LookaheadScheduler.schedule(&mut ctx).unwrap();
        // terminal no-op branch: the result is untouched
        assert_eq!(ctx.take_result().root(), root);
    }
}
