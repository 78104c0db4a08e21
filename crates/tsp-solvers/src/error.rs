use thiserror::Error;
use tsp_core::instance::distance::Distance;
use tsp_parser::ParserError;

/// Error taxonomy shared by the oracle, the lower-bound battery and the threshold-search
/// drivers.
///
/// `InputFormat` wraps [tsp_parser::ParserError] rather than living in `tsp-core`, since
/// `tsp-parser` already depends on `tsp-core` and the reverse dependency would form a cycle.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error(transparent)]
    InputFormat(#[from] ParserError),

    /// No feasible tour exists at the given threshold. Folded into a regular "no tour" result
    /// before it reaches a driver caller; never propagated as an `Err` to the CLI.
    #[error("no feasible tour at cost {at:?}")]
    Infeasible { at: Distance },

    #[error("subsolver failed to return a feasible tour: {0}")]
    SubsolverFailure(String),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("allocation failed: {0}")]
    OutOfMemory(String),
}
