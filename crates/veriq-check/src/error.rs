//! Error types for the equivalence checker.

use thiserror::Error;

use crate::config::Strategy;

/// Errors that can occur during an equivalence-checking run.
///
/// No error carries or implies a verdict: a failed run has no equivalence
/// outcome at all, so an enclosing driver must report it as unknown rather
/// than forcing true or false.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CheckError {
    /// The requested strategy belongs to a different checker.
    #[error("Strategy '{strategy}' is not supported by the alternating DD checker")]
    UnsupportedStrategy {
        /// The rejected strategy.
        strategy: Strategy,
    },

    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] veriq_ir::IrError),

    /// Failure propagated unmodified from the decision-diagram engine.
    #[error("Decision-diagram engine error: {0}")]
    Engine(#[from] veriq_dd::DdError),
}

/// Result type for checker operations.
pub type CheckResult<T> = Result<T, CheckError>;
