use rand::SeedableRng;
use rand::rngs::StdRng;
use tsp_core::instance::distance::Distance;
use tsp_solvers::{
    CostMatrix, HeldKarp, ProblemInfo,
    driver::Ebst,
    oracle::{SolvePlan, SolveStep, SubsolverConfig},
    transform::CostTransform,
};

fn diamond() -> CostMatrix {
    // S1 seed scenario: [[-,1,3,2],[1,-,4,5],[3,4,-,6],[2,5,6,-]]
    let data = vec![
        Distance(0), Distance(1), Distance(3), Distance(2),
        Distance(1), Distance(0), Distance(4), Distance(5),
        Distance(3), Distance(4), Distance(0), Distance(6),
        Distance(2), Distance(5), Distance(6), Distance(0),
    ];
    CostMatrix::from_dense_row_major(data, 4, true)
}

#[test]
fn ebst_with_the_exact_subsolver_finds_the_minimal_bottleneck() {
    let cost = diamond();
    let info = ProblemInfo::build(&cost);
    let driver = Ebst::new(&cost, &info);

    let mut exact = HeldKarp;
    let mut lk = HeldKarp;
    let mut rng = StdRng::seed_from_u64(7);

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
        .expect("seed scenario S1 has a feasible tour");

    assert_eq!(tally.obj, Distance(5));
    assert!(tally.tour.is_permutation_of(4));
}
