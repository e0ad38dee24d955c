//! Gate-count-proportional alternation.

use crate::error::CheckResult;

use super::{ScheduleContext, SchedulingStrategy};

/// Alternate according to the gate-count ratio of the two streams.
///
/// The longer stream contributes `round(max / min)` gates per single gate of
/// the shorter one, keeping both sides' relative progress matched so the
/// intermediate diagram grows evenly instead of one side lagging behind.
pub struct ProportionalScheduler;

/// Rounded gate-count ratio between the larger and the smaller stream.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn gate_ratio(left_ops: usize, right_ops: usize) -> usize {
    let max = left_ops.max(right_ops);
    let min = left_ops.min(right_ops);
    if min == 0 {
        return 1;
    }
    (max as f64 / min as f64).round() as usize
}

impl SchedulingStrategy for ProportionalScheduler {
    fn name(&self) -> &'static str {
        "proportional"
    }

    fn schedule(&self, ctx: &mut ScheduleContext<'_, '_>) -> CheckResult<()> {
        let ratio = gate_ratio(ctx.left_ops(), ctx.right_ops());
        let (ratio_left, ratio_right) = if ctx.left_ops() > ctx.right_ops() {
            (ratio, 1)
        } else {
            (1, ratio)
        };

        while !ctx.left_exhausted()
            && !ctx.right_exhausted()
            && !ctx.left_at_measure()
            && !ctx.right_at_measure()
        {
            for _ in 0..ratio_left {
                if ctx.left_exhausted() || ctx.left_at_measure() {
                    break;
                }
                ctx.advance_left()?;
            }
            for _ in 0..ratio_right {
                if ctx.right_exhausted() || ctx.right_at_measure() {
                    break;
                }
                ctx.advance_right()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veriq_dd::Package;
    use veriq_ir::{Circuit, QubitId};

    #[test]
    fn test_ratio_rounds_to_nearest() {
        assert_eq!(gate_ratio(10, 2), 5);
        assert_eq!(gate_ratio(2, 10), 5);
        assert_eq!(gate_ratio(7, 2), 4);
        assert_eq!(gate_ratio(5, 5), 1);
        assert_eq!(gate_ratio(3, 0), 1);
    }

    #[test]
    fn test_unbalanced_streams_fully_consumed() {
        let pkg = Package::new();
        let mut lhs = Circuit::with_size("a", 1);
        for _ in 0..10 {
            lhs.x(QubitId(0)).unwrap();
        }
        let mut rhs = Circuit::with_size("b", 1);
        rhs.x(QubitId(0)).unwrap().x(QubitId(0)).unwrap();

        let initial = pkg.make_identity(1).unwrap();
        let mut ctx = ScheduleContext::new(&pkg, &lhs, &rhs, initial, 1);
        ProportionalScheduler.schedule(&mut ctx).unwrap();
        // 5 left gates per right gate: both streams end together
        assert!(ctx.left_exhausted());
        assert!(ctx.right_exhausted());
    }
}
