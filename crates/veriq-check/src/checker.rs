//! The equivalence-checking orchestrator.

use std::time::Instant;

use tracing::{debug, info, instrument};

use veriq_dd::{Package, Side};
use veriq_ir::Circuit;

use crate::apply::change_permutation;
use crate::config::{Configuration, Strategy};
use crate::error::{CheckError, CheckResult};
use crate::fidelity::weighted_trace_fidelity;
use crate::matrix::{create_goal_matrix, create_initial_matrix};
use crate::passes::PrecheckRunner;
use crate::result::EquivalenceCheckingResult;
use crate::strategy::{
    LookaheadScheduler, NaiveScheduler, ProportionalScheduler, ScheduleContext,
    SchedulingStrategy,
};

/// Alternating-scheme equivalence checker.
///
/// Proves that two circuits implement the same operator (modulo ancillary
/// and garbage qubits) by folding both gate streams into one running
/// decision diagram — left gates forward, right gates inverted — and
/// comparing the fully reduced operator against the goal matrix. If the
/// circuits are equivalent, the interleaved product stays close to the
/// identity throughout, keeping the intermediate diagrams small.
pub struct EquivalenceChecker<'p> {
    package: &'p Package,
    lhs: Circuit,
    rhs: Circuit,
    config: Configuration,
    nqubits: u32,
}

impl<'p> EquivalenceChecker<'p> {
    /// Set up a checker over two circuits.
    ///
    /// The circuits are unified to a common line count: the narrower one is
    /// padded, its new lines flagged ancillary and garbage and absent from
    /// its layouts.
    pub fn new(
        package: &'p Package,
        mut lhs: Circuit,
        mut rhs: Circuit,
        config: Configuration,
    ) -> Self {
        let nqubits = lhs.num_qubits().max(rhs.num_qubits());
        lhs.pad_to(nqubits);
        rhs.pad_to(nqubits);
        Self {
            package,
            lhs,
            rhs,
            config,
            nqubits,
        }
    }

    /// Run the full check and produce the verdict.
    ///
    /// Sequence: pre-check passes → initial matrix → strategy-driven
    /// scheduling → draining the unfinished side → permutation
    /// normalization → garbage/ancilla reduction → optional fidelity →
    /// structural comparison against the goal matrix.
    #[instrument(skip(self), fields(lhs = self.lhs.name(), rhs = self.rhs.name()))]
    pub fn check(mut self) -> CheckResult<EquivalenceCheckingResult<'p>> {
        let start = Instant::now();
        let runner = PrecheckRunner::from_config(&self.config);
        runner.run(&mut self.lhs, &mut self.rhs)?;
        let preprocessing_time = start.elapsed();

        let verification_start = Instant::now();

        let strategy: &dyn SchedulingStrategy = match self.config.strategy {
            Strategy::Naive => &NaiveScheduler,
            Strategy::Proportional => &ProportionalScheduler,
            Strategy::Lookahead => &LookaheadScheduler,
            Strategy::CompilationFlow => {
                return Err(CheckError::UnsupportedStrategy {
                    strategy: self.config.strategy,
                });
            }
        };

        let initial = create_initial_matrix(self.package, &self.lhs, &self.rhs)?;
        let mut ctx =
            ScheduleContext::new(self.package, &self.lhs, &self.rhs, initial, self.nqubits);

        debug!(
            strategy = strategy.name(),
            left_ops = self.lhs.num_ops(),
            right_ops = self.rhs.num_ops(),
            "scheduling gate folds"
        );
        strategy.schedule(&mut ctx)?;

        // whichever side the strategy left unfinished is folded in order
        ctx.drain_left()?;
        ctx.drain_right()?;

        let (result, mut perm_left, mut perm_right) = ctx.into_parts();
        let result = change_permutation(
            self.package,
            result,
            &mut perm_left,
            self.lhs.output_permutation(),
            Side::Left,
            self.nqubits,
        )?;
        let result = change_permutation(
            self.package,
            result,
            &mut perm_right,
            self.rhs.output_permutation(),
            Side::Right,
            self.nqubits,
        )?;

        let result = self
            .package
            .reduce_garbage(result, self.lhs.garbage(), Side::Left)?;
        let result = self
            .package
            .reduce_garbage(result, self.rhs.garbage(), Side::Right)?;
        let result = self
            .package
            .reduce_ancillae(result, self.lhs.ancillary(), Side::Left)?;
        let result = self
            .package
            .reduce_ancillae(result, self.rhs.ancillary(), Side::Right)?;

        let fidelity = self
            .config
            .compute_fidelity
            .then(|| weighted_trace_fidelity(self.package, &result, self.nqubits));

        let goal = create_goal_matrix(self.package, &self.lhs, &self.rhs)?;
        let equivalence = result.structurally_equals(&goal);
        let max_active_nodes = self.package.peak_active_nodes();
        let verification_time = verification_start.elapsed();

        info!(
            equivalence,
            max_active_nodes,
            ?verification_time,
            "equivalence check finished"
        );

        Ok(EquivalenceCheckingResult {
            equivalence,
            strategy: self.config.strategy,
            preprocessing_time,
            verification_time,
            max_active_nodes,
            result,
            fidelity,
        })
    }
}
