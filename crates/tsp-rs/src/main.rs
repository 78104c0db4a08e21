use std::{path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tsp_core::instance::distance::Distance;
use tsp_solvers::{
    CostMatrix, CostTransform, FeasResult, FeasibilityOracle, HeldKarp, LinKernighan, LkParams,
    ProblemInfo, RandomOffsetTable, SolverError,
    bounds::bbssp,
    driver::{Dt, Ebst, RunTally},
    oracle::{SolvePlan, SolveStep, SubsolverConfig, TspSubsolver},
};

#[derive(Parser)]
#[command(name = "tsp-rs", about = "Heuristic and exact solvers for bottleneck-objective TSP variants")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Bottleneck TSP: minimise the longest edge on the tour.
    Btsp(CommonArgs),
    /// Constrained Bottleneck TSP: minimise the longest edge subject to a total-length cap.
    Cbtsp {
        #[command(flatten)]
        common: CommonArgs,
        /// Maximum total tour length.
        #[arg(short = 'L', long)]
        length: i32,
    },
    /// Balanced TSP: minimise the spread between the longest and shortest edge on the tour.
    Baltsp {
        #[command(flatten)]
        common: CommonArgs,
        /// Solve the (unconstrained) maximum-scatter variant instead.
        #[arg(short = 'm', long)]
        solve_mstsp: bool,
        /// Lower cutoff on the edges considered for the balanced band.
        #[arg(short = 't', long)]
        btsp_min_cost: Option<i32>,
        /// Upper cutoff on the edges considered for the balanced band.
        #[arg(long)]
        btsp_max_cost: Option<i32>,
        /// Known lower bound on the maximum-scatter objective.
        #[arg(short = 'v', long)]
        mstsp_min_cost: Option<i32>,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Path to the TSPLIB instance to solve.
    #[arg(short = 'i', long)]
    input: PathBuf,
    /// Treat the input as an asymmetric (FULL_MATRIX) instance, routed through the symmetric
    /// reduction.
    #[arg(long)]
    asymmetric: bool,
    /// Write an XML tally alongside stdout.
    #[arg(short = 'x', long)]
    xml: Option<PathBuf>,
    /// Write the accepted tour in TSPLIB tour format.
    #[arg(short = 'T', long = "tour-out")]
    tour_out: Option<PathBuf>,
    /// Random restarts per Lin-Kernighan call.
    #[arg(short = 'r', long, default_value_t = 20)]
    restarts: usize,
    /// Consecutive non-improving kicks before Lin-Kernighan gives up.
    #[arg(short = 's', long = "stall-count", default_value_t = 8)]
    stall_count: usize,
    /// Unused placeholder for a future direct double-bridge kick count override.
    #[arg(short = 'k', long, default_value_t = 0)]
    kicks: usize,
    /// Known lower bound on the objective, seeding the threshold search.
    #[arg(short = 'l', long = "lower-bound")]
    lower_bound: Option<i32>,
    /// Known upper bound on the objective.
    #[arg(short = 'u', long = "upper-bound")]
    upper_bound: Option<i32>,
    /// Attempts per basic (non-shake) solve step.
    #[arg(short = 'a', long = "basic-attempts", default_value_t = 3)]
    basic_attempts: usize,
    /// Attempts per shake solve step, run after a plain BTSP/CBTSP step exhausts its own
    /// attempts without finding a feasible tour at the current threshold.
    #[arg(short = 'b', long = "shake-attempts", default_value_t = 5)]
    shake_attempts: usize,
    /// Minimum shake offset.
    #[arg(short = '1', long = "shake-min", default_value_t = 0)]
    shake_min: i32,
    /// Maximum shake offset.
    #[arg(short = '2', long = "shake-max", default_value_t = 10)]
    shake_max: i32,
    /// RNG seed.
    #[arg(short = 'g', long, default_value_t = 0)]
    seed: u64,
    /// Unused placeholder mirroring the upstream tool's deep-copy flag.
    #[arg(short = 'd', long = "deep-copy")]
    deep_copy: bool,
    /// Sentinel value standing in for infinity in constrained/shake transforms.
    #[arg(short = 'I', long, default_value_t = 1_000_000)]
    infinity: i32,
    /// Re-run an exact solve to confirm the reported tour's optimality.
    #[arg(short = 'c', long = "confirm-sol")]
    confirm_sol: bool,
    /// Skip the EBST binary search and use the basic transform once at the lower bound.
    #[arg(short = 'e', long = "suppress-ebst")]
    suppress_ebst: bool,
    /// Unused placeholder for a future tie-break preferring the shortest tour among those meeting
    /// the objective, not just the first found.
    #[arg(short = 'S', long = "find-short-tour")]
    find_short_tour: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Btsp(common) => run_btsp(&common, None),
        Command::Cbtsp { common, length } => run_btsp(&common, Some(Distance(length))),
        Command::Baltsp {
            common,
            solve_mstsp: _,
            btsp_min_cost,
            btsp_max_cost,
            mstsp_min_cost,
        } => run_baltsp(&common, btsp_min_cost, btsp_max_cost, mstsp_min_cost),
    }
}

fn load_cost_matrix(common: &CommonArgs) -> Result<CostMatrix, Box<dyn std::error::Error>> {
    if common.asymmetric {
        let (_, matrix) = tsp_parser::parse_atsp_instance(&common.input)?;
        Ok(CostMatrix::from_matrix(&matrix))
    } else {
        let instance = tsp_parser::parse_tsp_instance(&common.input)?;
        Ok(CostMatrix::from_sym_instance(&instance))
    }
}

fn run_btsp(common: &CommonArgs, length_cap: Option<Distance>) -> Result<(), Box<dyn std::error::Error>> {
    let cost = load_cost_matrix(common)?;
    let info = ProblemInfo::build(&cost);

    let mut exact = HeldKarp;
    let mut lk = LinKernighan::new(
        LkParams {
            random_restarts: common.restarts,
            stall_count: common.stall_count,
        },
        StdRng::seed_from_u64(common.seed),
    );
    let mut rng = StdRng::seed_from_u64(common.seed);

    let lower_bound = common
        .lower_bound
        .map(Distance)
        .unwrap_or_else(|| bbssp(&cost, &info).obj);
    let upper_bound = common.upper_bound.map(Distance);
    let basic_attempts = common.basic_attempts;

    let min_cost = info.min_cost();
    let mut plan_at = |delta: Distance| {
        let mut steps = if let Some(cap) = length_cap {
            vec![
                SolveStep {
                    transform: CostTransform::BtspConstrained {
                        delta,
                        infinity_sentinel: Distance(common.infinity),
                        feasible_length: cap,
                    },
                    subsolver: SubsolverConfig::Lk,
                    attempts: basic_attempts,
                    upper_bound_update: true,
                },
                SolveStep {
                    transform: CostTransform::BtspConstrainedShake {
                        delta,
                        infinity_sentinel: Distance(common.infinity),
                        feasible_length: cap,
                        offsets: RandomOffsetTable::new(info.len(), common.shake_min, common.shake_max),
                    },
                    subsolver: SubsolverConfig::Lk,
                    attempts: common.shake_attempts,
                    upper_bound_update: true,
                },
            ]
        } else {
            vec![
                SolveStep {
                    transform: CostTransform::BtspBasic { delta },
                    subsolver: SubsolverConfig::Lk,
                    attempts: basic_attempts,
                    upper_bound_update: true,
                },
                SolveStep {
                    transform: CostTransform::BtspShake1 {
                        low: min_cost,
                        high: delta,
                        offsets: RandomOffsetTable::new(info.len(), common.shake_min, common.shake_max),
                    },
                    subsolver: SubsolverConfig::Lk,
                    attempts: common.shake_attempts,
                    upper_bound_update: true,
                },
            ]
        };
        if common.shake_attempts == 0 {
            steps.truncate(1);
        }
        SolvePlan { steps }
    };

    let tally = if common.suppress_ebst {
        let oracle = FeasibilityOracle::new(&cost, &info);
        let mut plan = plan_at(lower_bound);
        match oracle.feasible(&mut plan, &mut exact, &mut lk, &mut rng)? {
            FeasResult::Tour { tour, .. } => {
                let optimal = tour.max_cost(&cost) == lower_bound;
                RunTally::from_single_tour(tour, &cost, optimal)
            }
            FeasResult::NoTour => return Err(Box::new(SolverError::Infeasible { at: lower_bound })),
        }
    } else {
        let driver = Ebst::new(&cost, &info);
        driver.run(lower_bound, upper_bound, plan_at, &mut exact, &mut lk, &mut rng)?
    };

    if common.confirm_sol {
        confirm_optimal(&cost, &tally, &mut exact);
    }

    report(common, &tally)
}

fn run_baltsp(
    common: &CommonArgs,
    btsp_min_cost: Option<i32>,
    _btsp_max_cost: Option<i32>,
    mstsp_min_cost: Option<i32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let cost = load_cost_matrix(common)?;
    let info = ProblemInfo::build(&cost);
    let driver = Dt::new(&cost, &info);

    let mut exact = HeldKarp;
    let mut lk = LinKernighan::new(
        LkParams {
            random_restarts: common.restarts,
            stall_count: common.stall_count,
        },
        StdRng::seed_from_u64(common.seed),
    );
    let mut rng = StdRng::seed_from_u64(common.seed);

    let lower_bound = common
        .lower_bound
        .or(mstsp_min_cost)
        .or(btsp_min_cost)
        .map(Distance)
        .unwrap_or(Distance(0));
    let basic_attempts = common.basic_attempts;

    let tally = driver.run(
        lower_bound,
        |low, high| {
            let mut steps = vec![SolveStep {
                transform: CostTransform::BalTspBasic { low, high },
                subsolver: SubsolverConfig::Lk,
                attempts: basic_attempts,
                upper_bound_update: true,
            }];
            if common.shake_attempts > 0 {
                steps.push(SolveStep {
                    transform: CostTransform::BalTspShake {
                        low,
                        high,
                        offsets: RandomOffsetTable::new(info.len(), common.shake_min, common.shake_max),
                    },
                    subsolver: SubsolverConfig::Lk,
                    attempts: common.shake_attempts,
                    upper_bound_update: true,
                });
            }
            SolvePlan { steps }
        },
        &mut exact,
        &mut lk,
        &mut rng,
    )?;

    report(common, &tally)
}

fn confirm_optimal(cost: &CostMatrix, tally: &RunTally, exact: &mut dyn TspSubsolver) {
    let Some(tour) = exact.run(cost, None) else {
        log::warn!("confirm-sol: exact subsolver found no tour to confirm against");
        return;
    };
    let exact_obj = tour.max_cost(cost);
    if exact_obj == tally.obj {
        log::info!("confirm-sol: reported objective {:?} matches the exact solve", tally.obj);
    } else {
        log::warn!(
            "confirm-sol: reported objective {:?} differs from the exact solve's {:?}",
            tally.obj,
            exact_obj
        );
    }
}

fn report(common: &CommonArgs, tally: &RunTally) -> Result<(), Box<dyn std::error::Error>> {
    println!("objective:         {}", tally.obj.0);
    println!("tour length:       {}", tally.tour_length.0);
    println!("min edge:          {}", tally.min_edge.0);
    println!("max edge:          {}", tally.max_edge.0);
    println!("bin search steps:  {}", tally.bin_search_steps);
    println!("optimal:           {}", tally.optimal);

    if let Some(xml_path) = &common.xml {
        let xml = format!(
            "<arrow_tally problem_file=\"{}\">\n  <objective>{}</objective>\n  <tour_length>{}</tour_length>\n  <min_edge>{}</min_edge>\n  <max_edge>{}</max_edge>\n  <bin_search_steps>{}</bin_search_steps>\n  <optimal>{}</optimal>\n</arrow_tally>\n",
            common.input.display(),
            tally.obj.0,
            tally.tour_length.0,
            tally.min_edge.0,
            tally.max_edge.0,
            tally.bin_search_steps,
            tally.optimal,
        );
        std::fs::write(xml_path, xml)?;
    }

    if let Some(tour_path) = &common.tour_out {
        let nodes: Vec<usize> = tally.tour.order().iter().map(|node| node.0).collect();
        let name = common.input.file_stem().and_then(|s| s.to_str()).unwrap_or("tour");
        tsp_parser::tour::write_tour_file(tour_path, name, &nodes)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn cli_parses_a_minimal_btsp_invocation() {
        use super::Cli;
        use clap::Parser;
        let cli = Cli::parse_from(["tsp-rs", "btsp", "-i", "instance.tsp"]);
        match cli.command {
            super::Command::Btsp(common) => assert_eq!(common.input.to_str(), Some("instance.tsp")),
            _ => panic!("expected a Btsp subcommand"),
        }
    }
}
