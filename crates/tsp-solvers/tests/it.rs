//! Integration test harness: each module under `tests/it/` drives the public driver API
//! end-to-end on small, hand-built instances rather than checked-in TSPLIB fixtures.

mod asym_round_trip;
mod baltsp_dt;
mod btsp_ebst;
