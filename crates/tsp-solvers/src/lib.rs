/*!
This crate provides the heuristic/exact search machinery for the bottleneck-objective TSP
variants (BTSP, CBTSP, BalTSP): a feasibility oracle driven by a family of cost transforms, a
battery of lower bounds, threshold-search drivers built on top of both, and two interchangeable
length-minimising subsolvers. Explanations and references for the individual algorithms can be
found in their respective modules.
 */

pub mod asym_reduction;
pub mod bounds;
pub mod cost;
pub mod driver;
pub mod error;
pub mod held_karp;
pub mod lin_kernighan;
pub mod oracle;
pub mod transform;

pub use cost::{CostMatrix, ProblemInfo, Tour};
pub use error::SolverError;
pub use held_karp::HeldKarp;
pub use lin_kernighan::{LinKernighan, LkParams};
pub use oracle::{FeasResult, FeasibilityOracle, SolvePlan, SolveStep, SubsolverConfig, TspSubsolver};
pub use transform::{CostTransform, RandomOffsetTable};
