//! The lower-bound battery: 2MB, BBSSP/BSCSSP, BAP/CBAP, DCBPB and CBST, each feeding a
//! [crate::driver] with a value that provably does not exceed the true optimum.

pub mod bap;
pub mod bbssp;
pub mod bscssp;
pub mod cbap;
pub mod cbst;
pub mod dcbpb;
pub mod heap;
pub mod two_max;

pub use bap::{bap, bap_in_band};
pub use bbssp::bbssp;
pub use bscssp::{bscssp, is_strongly_connected_in_band};
pub use cbap::cbap;
pub use cbst::cbst;
pub use dcbpb::dcbpb;
pub use two_max::two_max;

use tsp_core::instance::distance::Distance;

/// Result of a lower-bound routine. Per the battery convention, an infeasible probe reports
/// `max_cost + 1` instead of a sentinel variant, so a driver can detect it by comparison alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundResult {
    pub obj: Distance,
}
