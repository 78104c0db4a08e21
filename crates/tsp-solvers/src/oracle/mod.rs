//! The [FeasibilityOracle]: executes a [SolvePlan] against a threshold/band and reports a
//! verified tour if any step's transform deems one feasible.

use rand::Rng;
use tsp_core::instance::distance::Distance;

use crate::{
    cost::{CostMatrix, ProblemInfo, Tour},
    error::SolverError,
    transform::CostTransform,
};

/// A length-minimising TSP subsolver, treated as a black box by the oracle.
pub trait TspSubsolver {
    fn run(&mut self, cost: &CostMatrix, initial: Option<&Tour>) -> Option<Tour>;
}

#[derive(Debug, Clone, Copy)]
pub enum SubsolverConfig {
    Exact,
    Lk,
}

/// One step of a [SolvePlan]: build a derived matrix via `transform`, solve it with `subsolver`,
/// and evaluate feasibility, retrying up to `attempts` times with a freshly reseeded transform.
pub struct SolveStep {
    pub transform: CostTransform,
    pub subsolver: SubsolverConfig,
    pub attempts: usize,
    /// If true, a tour that fails `feasible` is still kept as a new upper bound when its base
    /// bottleneck objective beats the best one seen so far in this plan.
    pub upper_bound_update: bool,
}

/// An ordered list of [SolveStep]s, immutable for the duration of a driver run except for each
/// step's transform being reseeded between attempts.
pub struct SolvePlan {
    pub steps: Vec<SolveStep>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeasResult {
    NoTour,
    Tour {
        tour: Tour,
        /// The bottleneck objective as measured against the base matrix.
        obj: Distance,
        /// The tour length as measured against the base matrix.
        length: Distance,
        opt_flag: bool,
    },
}

pub struct FeasibilityOracle<'a> {
    pub base: &'a CostMatrix,
    pub info: &'a ProblemInfo,
}

impl<'a> FeasibilityOracle<'a> {
    pub fn new(base: &'a CostMatrix, info: &'a ProblemInfo) -> Self {
        Self { base, info }
    }

    pub fn feasible(
        &self,
        plan: &mut SolvePlan,
        exact: &mut dyn TspSubsolver,
        lk: &mut dyn TspSubsolver,
        rng: &mut impl Rng,
    ) -> Result<FeasResult, SolverError> {
        let mut best: Option<(Tour, Distance, Distance)> = None;

        for step in &mut plan.steps {
            let mut step_found_tour = false;

            for attempt in 0..step.attempts {
                log::trace!("oracle: reseeding transform for attempt {attempt}");
                step.transform.reseed(rng);
                let derived = step.transform.apply(self.base, self.info);

                let subsolver: &mut dyn TspSubsolver = match step.subsolver {
                    SubsolverConfig::Exact => exact,
                    SubsolverConfig::Lk => lk,
                };

                let Some(tour) = subsolver.run(&derived, None) else {
                    log::warn!("oracle: subsolver returned no tour on attempt {attempt}");
                    continue;
                };

                if !tour.is_permutation_of(self.base.size()) {
                    return Err(SolverError::InvariantViolation(
                        "subsolver returned a non-Hamiltonian tour".to_string(),
                    ));
                }

                let derived_length = tour.length(&derived);

                if step.transform.feasible(self.base, self.info, &tour, derived_length) {
                    step_found_tour = true;
                    let obj = tour.max_cost(self.base);
                    let base_length = tour.length(self.base);
                    log::info!("oracle: found feasible tour with objective {obj:?}");
                    return Ok(FeasResult::Tour {
                        tour,
                        obj,
                        length: base_length,
                        opt_flag: false,
                    });
                }

                if step.upper_bound_update {
                    let obj = tour.max_cost(self.base);
                    let base_length = tour.length(self.base);
                    let is_better = best.as_ref().is_none_or(|(_, best_obj, _)| obj < *best_obj);
                    if is_better {
                        log::debug!("oracle: step discarded an out-of-band tour, obj {obj:?}");
                        best = Some((tour, obj, base_length));
                    }
                }
            }

            if !step_found_tour && step.attempts > 0 {
                log::warn!("oracle: a solve step exhausted its attempts without a feasible tour");
            }
        }

        match best {
            Some((tour, obj, length)) => Ok(FeasResult::Tour {
                tour,
                obj,
                length,
                opt_flag: false,
            }),
            None => Ok(FeasResult::NoTour),
        }
    }
}
