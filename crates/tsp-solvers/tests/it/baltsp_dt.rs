use rand::SeedableRng;
use rand::rngs::StdRng;
use tsp_core::instance::distance::Distance;
use tsp_solvers::{
    CostMatrix, HeldKarp, ProblemInfo,
    driver::Dt,
    oracle::{SolvePlan, SolveStep, SubsolverConfig},
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
fn dt_finds_a_band_with_a_small_spread() {
    let cost = diamond();
    let info = ProblemInfo::build(&cost);
    let driver = Dt::new(&cost, &info);

    let mut exact = HeldKarp;
    let mut lk = HeldKarp;
    let mut rng = StdRng::seed_from_u64(11);

    let tally = driver
        .run(
            Distance(1),
            |low, high| SolvePlan {
                steps: vec![SolveStep {
                    transform: CostTransform::BalTspBasic { low, high },
                    subsolver: SubsolverConfig::Exact,
                    attempts: 1,
                    upper_bound_update: false,
                }],
            },
            &mut exact,
            &mut lk,
            &mut rng,
        )
        .expect("seed scenario S1 has a feasible tour under some band");

    assert!(tally.tour.is_permutation_of(4));
    assert!(tally.max_edge >= tally.min_edge);
    assert_eq!(tally.obj, tally.max_edge - tally.min_edge);
}
