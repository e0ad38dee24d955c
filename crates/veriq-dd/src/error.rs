//! Error types for the decision-diagram engine.

use thiserror::Error;

/// Errors raised by the decision-diagram engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DdError {
    /// The arena's node ceiling was crossed while allocating.
    #[error("Decision-diagram node limit of {limit} nodes exceeded")]
    NodeLimitExceeded {
        /// The configured ceiling.
        limit: usize,
    },
}

/// Result type for engine operations.
pub type DdResult<T> = Result<T, DdError>;
