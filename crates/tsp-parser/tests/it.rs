//! Integration test harness: each module under `tests/it/` exercises the parser against a
//! synthetic TSPLIB file written to a temporary directory, rather than checked-in instance
//! fixtures.

mod atsp_explicit;
mod tour_round_trip;
mod tsp_euc_2d;
