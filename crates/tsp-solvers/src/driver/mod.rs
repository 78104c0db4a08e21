//! Threshold-search drivers sitting atop the [crate::oracle::FeasibilityOracle]: EBST for
//! BTSP/CBTSP, DT/DT2 for BalTSP, IB/IB2 for the iterative-bottleneck BalTSP variant.

use rand::Rng;
use tsp_core::instance::distance::Distance;

use crate::{
    bounds::{bap_in_band, bbssp, is_strongly_connected_in_band},
    cost::{CostMatrix, ProblemInfo, Tour},
    error::SolverError,
    oracle::{FeasResult, FeasibilityOracle, SolvePlan, TspSubsolver},
};

/// The aggregate a driver run reports to the CLI layer.
#[derive(Debug, Clone)]
pub struct RunTally {
    pub tour: Tour,
    pub obj: Distance,
    pub tour_length: Distance,
    pub min_edge: Distance,
    pub max_edge: Distance,
    pub bin_search_steps: usize,
    pub optimal: bool,
}

impl RunTally {
    /// Builds a tally for a single solve outside any binary search, e.g. the CLI's
    /// `suppress-ebst` path that tries only the lower bound and stops.
    pub fn from_single_tour(tour: Tour, cost: &CostMatrix, optimal: bool) -> Self {
        Self::from_tour(tour, cost, 0, optimal)
    }

    fn from_tour(tour: Tour, cost: &CostMatrix, bin_search_steps: usize, optimal: bool) -> Self {
        Self {
            obj: tour.max_cost(cost),
            tour_length: tour.length(cost),
            min_edge: tour.min_cost(cost),
            max_edge: tour.max_cost(cost),
            tour,
            bin_search_steps,
            optimal,
        }
    }
}

/// Binary-search threshold driver for BTSP/CBTSP: narrows `[low, high]` indices into `cost_list`
/// until the smallest feasible bottleneck objective is pinned down.
pub struct Ebst<'a> {
    oracle: FeasibilityOracle<'a>,
    info: &'a ProblemInfo,
}

impl<'a> Ebst<'a> {
    pub fn new(base: &'a CostMatrix, info: &'a ProblemInfo) -> Self {
        Self {
            oracle: FeasibilityOracle::new(base, info),
            info,
        }
    }

    /// `plan_at` builds a fresh [SolvePlan] targeting the threshold at `cost_list[idx]`.
    pub fn run(
        &self,
        lower_bound: Distance,
        upper_bound: Option<Distance>,
        mut plan_at: impl FnMut(Distance) -> SolvePlan,
        exact: &mut dyn TspSubsolver,
        lk: &mut dyn TspSubsolver,
        rng: &mut impl Rng,
    ) -> Result<RunTally, SolverError> {
        let cost_list = self.info.cost_list();
        let mut bin_search_steps = 0usize;

        let low0 = self
            .info
            .index_of(lower_bound)
            .unwrap_or(0);

        let mut plan = plan_at(lower_bound);
        if let FeasResult::Tour { tour, .. } = self.oracle.feasible(&mut plan, exact, lk, rng)? {
            return Ok(RunTally::from_tour(tour, self.oracle.base, bin_search_steps, true));
        }

        let mut low = low0;
        let mut high = upper_bound
            .and_then(|ub| self.info.index_of(ub))
            .unwrap_or(cost_list.len() - 1);

        let mut best: Option<Tour> = None;

        while low < high {
            let mid = (low + high) / 2;
            let mut plan = plan_at(cost_list[mid]);
            bin_search_steps += 1;

            match self.oracle.feasible(&mut plan, exact, lk, rng)? {
                FeasResult::Tour { tour, obj, .. } => {
                    let obj_idx = self.info.index_of(obj).unwrap_or(mid);
                    high = obj_idx.min(mid);
                    best = Some(tour);
                }
                FeasResult::NoTour => {
                    low = mid + 1;
                }
            }
        }

        match best {
            Some(tour) => {
                let optimal = tour.max_cost(self.oracle.base) == lower_bound;
                Ok(RunTally::from_tour(tour, self.oracle.base, bin_search_steps, optimal))
            }
            None => Err(SolverError::Infeasible { at: cost_list[high] }),
        }
    }
}

/// Double-threshold driver for BalTSP: searches a band `[cost_list[low], cost_list[high]]` for
/// the narrowest feasible band, running the LB feasibility cascade (BBSSP/BAP/BSCSSP) before each
/// oracle call to prune infeasible bands cheaply.
pub struct Dt<'a> {
    oracle: FeasibilityOracle<'a>,
    info: &'a ProblemInfo,
    asymmetric: bool,
}

impl<'a> Dt<'a> {
    pub fn new(base: &'a CostMatrix, info: &'a ProblemInfo) -> Self {
        Self {
            oracle: FeasibilityOracle::new(base, info),
            info,
            asymmetric: !base.symmetric(),
        }
    }

    pub fn run(
        &self,
        lower_bound: Distance,
        mut plan_for_band: impl FnMut(Distance, Distance) -> SolvePlan,
        exact: &mut dyn TspSubsolver,
        lk: &mut dyn TspSubsolver,
        rng: &mut impl Rng,
    ) -> Result<RunTally, SolverError> {
        let cost_list = self.info.cost_list();
        let mut low = 0usize;
        let mut high = 0usize;
        while high + 1 < cost_list.len() && cost_list[high] - cost_list[low] < lower_bound {
            high += 1;
        }

        let mut best_low = cost_list[low];
        let mut best_high = cost_list[cost_list.len() - 1];
        let mut best_gap = best_high - best_low;
        let mut best_tour: Option<Tour> = None;
        let mut bin_search_steps = 0usize;

        while high < cost_list.len() {
            bin_search_steps += 1;

            if self.lb_feasibility_cascade(cost_list[low], cost_list[high]) {
                let mut plan = plan_for_band(cost_list[low], cost_list[high]);
                match self.oracle.feasible(&mut plan, exact, lk, rng)? {
                    FeasResult::Tour { tour, .. } => {
                        let actual_low = tour.min_cost(self.oracle.base);
                        let actual_high = tour.max_cost(self.oracle.base);
                        let gap = actual_high - actual_low;
                        if best_tour.is_none() || gap < best_gap {
                            best_low = actual_low;
                            best_high = actual_high;
                            best_gap = gap;
                            best_tour = Some(tour);
                        }
                        low = self.info.index_of(actual_low).map(|i| i + 1).unwrap_or(low + 1);
                        continue;
                    }
                    FeasResult::NoTour => {}
                }
            }

            high += 1;
            while high < cost_list.len() && cost_list[high] - cost_list[low] > best_gap {
                low += 1;
            }
            if high >= cost_list.len() || low >= cost_list.len() {
                break;
            }
        }

        match best_tour {
            Some(tour) => Ok(RunTally {
                obj: best_high - best_low,
                tour_length: tour.length(self.oracle.base),
                min_edge: best_low,
                max_edge: best_high,
                tour,
                bin_search_steps,
                optimal: best_gap == lower_bound,
            }),
            None => Err(SolverError::Infeasible { at: lower_bound }),
        }
    }

    fn lb_feasibility_cascade(&self, low: Distance, high: Distance) -> bool {
        let base = self.oracle.base;
        if bbssp(base, self.info).obj > high {
            return false;
        }
        if !bap_in_band(base, low, high) {
            return false;
        }
        if self.asymmetric && !is_strongly_connected_in_band(base, low, high) {
            return false;
        }
        true
    }
}

/// Iterative-bottleneck driver: raises a floor `cost_list[low]` one step at a time; for each
/// floor it runs a full inner [Ebst] binary search (lower bound = the floor-filtered BBSSP bound,
/// upper bound = the instance's max cost) over [CostTransform::BalTspIb], rather than a single
/// oracle probe, so each floor gets the same binary-search treatment BTSP/CBTSP get from `Ebst`.
pub struct Ib<'a> {
    base: &'a CostMatrix,
    info: &'a ProblemInfo,
}

impl<'a> Ib<'a> {
    pub fn new(base: &'a CostMatrix, info: &'a ProblemInfo) -> Self {
        Self { base, info }
    }

    /// `plan_at` builds a [SolvePlan] from the current floor and the inner EBST's candidate
    /// ceiling, normally by constructing a [CostTransform::BalTspIb] with those two bounds.
    pub fn run(
        &self,
        max_low: usize,
        mut plan_at: impl FnMut(Distance, Distance) -> SolvePlan,
        exact: &mut dyn TspSubsolver,
        lk: &mut dyn TspSubsolver,
        rng: &mut impl Rng,
    ) -> Result<RunTally, SolverError> {
        let cost_list = self.info.cost_list();
        let max_cost = self.info.max_cost();
        let sentinel = Distance(self.base.size() as i32 * (max_cost.0 + 1));

        let mut best: Option<(Distance, Distance, Tour)> = None;
        let mut bin_search_steps = 0usize;

        for low in 0..=max_low.min(cost_list.len() - 1) {
            let floor = cost_list[low];
            let filtered = floor_filtered_matrix(self.base, floor, sentinel);
            let filtered_info = ProblemInfo::build(&filtered);
            let bound = bbssp(&filtered, &filtered_info).obj;

            if let Some((_, best_gap, _)) = &best {
                if bound - floor >= *best_gap {
                    continue;
                }
            }

            let inner = Ebst::new(self.base, self.info);
            match inner.run(bound, Some(max_cost), |high| plan_at(floor, high), exact, lk, rng) {
                Ok(tally) => {
                    bin_search_steps += tally.bin_search_steps + 1;
                    let gap = tally.obj - floor;
                    let better = best.as_ref().is_none_or(|(_, best_gap, _)| gap < *best_gap);
                    if better {
                        best = Some((floor, gap, tally.tour));
                    }
                }
                Err(SolverError::Infeasible { .. }) => {
                    bin_search_steps += 1;
                }
                Err(err) => return Err(err),
            }
        }

        match best {
            Some((floor, gap, tour)) => Ok(RunTally {
                obj: gap,
                tour_length: tour.length(self.base),
                min_edge: floor,
                max_edge: tour.max_cost(self.base),
                tour,
                bin_search_steps,
                optimal: false,
            }),
            None => Err(SolverError::Infeasible {
                at: cost_list[max_low.min(cost_list.len() - 1)],
            }),
        }
    }
}

/// Replaces every edge below `floor` with `sentinel`, used only to seed the inner EBST's lower
/// bound via BBSSP on the floor-restricted graph; the actual oracle calls run
/// [CostTransform::BalTspIb] against the unfiltered base matrix instead.
fn floor_filtered_matrix(base: &CostMatrix, floor: Distance, sentinel: Distance) -> CostMatrix {
    let size = base.size();
    let mut data = Vec::with_capacity(size * size);
    for i in 0..size {
        for j in 0..size {
            if i == j {
                data.push(Distance(0));
                continue;
            }
            let c = base.cost(tsp_core::instance::node::Node(i), tsp_core::instance::node::Node(j));
            data.push(if c.0 < 0 || c >= floor { c } else { sentinel });
        }
    }
    CostMatrix::from_dense_row_major(data, size, base.symmetric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::{
        held_karp::HeldKarp,
        oracle::{SolveStep, SubsolverConfig},
        transform::CostTransform,
    };

    fn diamond() -> CostMatrix {
        let data = vec![
            Distance(0), Distance(1), Distance(3), Distance(2),
            Distance(1), Distance(0), Distance(4), Distance(5),
            Distance(3), Distance(4), Distance(0), Distance(6),
            Distance(2), Distance(5), Distance(6), Distance(0),
        ];
        CostMatrix::from_dense_row_major(data, 4, true)
    }

    #[test]
    fn ebst_finds_the_seed_s1_optimum() {
        let base = diamond();
        let info = ProblemInfo::build(&base);
        let driver = Ebst::new(&base, &info);
        let mut exact = HeldKarp::default();
        let mut lk = HeldKarp::default();
        let mut rng = StdRng::seed_from_u64(3);

        let tally = driver
            .run(
                Distance(1),
                None,
                |delta| SolvePlan {
                    steps: vec![SolveStep {
                        transform: CostTransform::BtspBasic { delta },
                        subsolver: SubsolverConfig::Exact,
                        attempts: 1,
                        upper_bound_update: false,
                    }],
                },
                &mut exact,
                &mut lk,
                &mut rng,
            )
            .expect("a feasible tour exists on this tiny instance");

        assert_eq!(tally.obj, Distance(5));
    }
}
