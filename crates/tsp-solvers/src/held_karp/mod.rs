//! Held-Karp TSP solver implementation using branch-and-bound and Lagrangian relaxation.
//!
//! ## Call Structure of the Algorithm
//! The call structure of the algorithm and sub-methods is as follows. Indented functions indicate
//! that they are called by the function above them.
//!
//! - `held_karp`: Main entry point for the Held-Karp solver. Sets up parameters and initiates the
//!   branch-and-bound search.
//!     - `explore_node` Performs depth-first branch-and-bound search.
//!         - `explore_node` to recursively explore the search tree.
//!         - `edge_to_branch_on` to select edges for branching.
//!         - `held_karp_lower_bound` to compute lower bounds using 1-trees.
//!             - `min_one_tree` to compute minimum 1-trees as part of the lower bound calculation.
//!                 - `min_spanning_tree` to compute minimum spanning trees using Prim's algorithm.
//!
//! The basic idea of the Held-Karp algorithm is to compute lower bounds on the TSP tour cost using
//! 1-trees and Lagrangian relaxation.
//!
//! ## 1-trees
//!
//! 1-trees are minimum spanning trees that span nodes 2 to n, plus two minimum cost edges
//! connecting node 1 to the tree. This is always a lower bound on the cost of a TSP tour, since
//! any TSP tour is a 1-tree. Thus, the cheapest 1-tree provides a lower bound on the TSP tour cost.
//!
//! ## Lagrangian Relaxation
//!
//! Because the computed 1-tree might have many nodes with degree unequal to 2, we introduce
//! penalties for each node based on how far their degree is from 2. This is what we call Lagrangian
//! relaxation. By iteratively adjusting the penalties based on the degree of nodes in the 1-tree,
//! we can converge towards a tighter lower bound on the TSP tour cost. Once an actual tour is
//! found, we can use that as an upper bound to prune the search space in the branch-and-bound
//! exploration.
//!
//! ## Edge States
//!
//! Edges can be in one of three states: Available, Excluded, or Fixed. This allows the
//! branch-and-bound search to systematically explore different configurations of the TSP tour
//! by forcibly including or excluding edges.

use tsp_core::instance::{
    UnTour,
    distance::{Distance, ScaledDistance},
    edge::UnEdge,
    matrix::Matrix,
    node::Node,
};

use crate::held_karp::trees::min_one_tree;

pub mod trees;

/// Solves an instance to optimality via branch-and-bound on top of the Held-Karp 1-tree bound.
pub fn held_karp(distances: &Matrix<Distance>) -> Option<UnTour> {
    let dimension = distances.dimension();

    let mut edge_states = Matrix::new_from_dimension_with_value(dimension, EdgeState::Available);

    let scaled_distances = Matrix::new(
        distances
            .data()
            .iter()
            .map(|&d| ScaledDistance::from_distance(d))
            .collect(),
        dimension,
    );

    let mut node_penalties = initial_penalties(distances);
    let mut fixed_degrees = vec![0u32; dimension];
    let mut best_tour = None;
    let mut bb_counter = 0;
    let mut upper_bound = Distance::MAX;
    let mut number_computed_one_trees = 0usize;

    explore_node(
        distances,
        &scaled_distances,
        &mut edge_states,
        node_penalties.as_mut_slice(),
        fixed_degrees.as_mut_slice(),
        &mut upper_bound,
        &mut best_tour,
        &mut bb_counter,
        None,
        0,
        &mut number_computed_one_trees,
    );

    best_tour
}

const INITIAL_MAX_ITERATIONS: usize = 1_000;
const MAX_ITERATIONS: usize = 10;

const INITIAL_ALPHA: f64 = 2.0;

const INITIAL_BETA: f64 = 0.99;
const BETA: f64 = 0.9;

#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeState {
    Available = 1,
    Excluded = 0,
    Fixed = -1,
}

/// Depth-first branch-and-bound search to find the optimal TSP tour.
///
/// `bb_limit` bounds the number of branch-and-bound nodes explored; `None` means unbounded.
#[allow(clippy::too_many_arguments)]
fn explore_node(
    distances: &Matrix<Distance>,
    scaled_distances: &Matrix<ScaledDistance>,
    edge_states: &mut Matrix<EdgeState>,
    node_penalties: &mut [ScaledDistance],
    fixed_degrees: &mut [u32],
    upper_bound: &mut Distance,
    best_tour: &mut Option<UnTour>,
    bb_counter: &mut usize,
    bb_limit: Option<usize>,
    depth: usize,
    number_computed_one_trees: &mut usize,
) {
    *bb_counter += 1;

    if let Some(limit) = bb_limit {
        if *bb_counter >= limit {
            return;
        }
    }

    let (max_iterations, beta) = if depth == 0 {
        (INITIAL_MAX_ITERATIONS, INITIAL_BETA)
    } else {
        (MAX_ITERATIONS, BETA)
    };

    let one_tree = match held_karp_lower_bound(
        distances,
        scaled_distances,
        edge_states,
        node_penalties,
        *upper_bound,
        max_iterations,
        beta,
        number_computed_one_trees,
    ) {
        Some(LowerBoundOutput::Tour(tour)) => {
            log::info!("held_karp: found new tour with cost {:?}", tour.cost);
            *upper_bound = tour.cost;
            *best_tour = Some(tour);
            return;
        }
        Some(LowerBoundOutput::LowerBound(lower_bound, one_tree)) => {
            if lower_bound >= *upper_bound {
                log::trace!(
                    "held_karp: pruning node with lower bound {:?} >= upper bound {:?}",
                    lower_bound,
                    *upper_bound
                );
                return;
            }
            one_tree
        }
        None => {
            // Infeasible node, prune.
            return;
        }
    };

    let Some(branching_edge) =
        edge_to_branch_on(scaled_distances, edge_states, node_penalties, &one_tree)
    else {
        return;
    };

    // Explore the branch excluding the edge.
    {
        edge_states.set_data(branching_edge.from, branching_edge.to, EdgeState::Excluded);

        explore_node(
            distances,
            scaled_distances,
            edge_states,
            node_penalties,
            fixed_degrees,
            upper_bound,
            best_tour,
            bb_counter,
            bb_limit,
            depth + 1,
            number_computed_one_trees,
        );

        edge_states.set_data(branching_edge.from, branching_edge.to, EdgeState::Available);
    }

    // Explore the branch including the edge, unless doing so would violate an already-fixed
    // degree constraint.
    if (fixed_degrees[branching_edge.from.0] < 2) && (fixed_degrees[branching_edge.to.0] < 2) {
        edge_states.set_data(branching_edge.from, branching_edge.to, EdgeState::Fixed);
        fixed_degrees[branching_edge.from.0] += 1;
        fixed_degrees[branching_edge.to.0] += 1;

        explore_node(
            distances,
            scaled_distances,
            edge_states,
            node_penalties,
            fixed_degrees,
            upper_bound,
            best_tour,
            bb_counter,
            bb_limit,
            depth + 1,
            number_computed_one_trees,
        );

        edge_states.set_data(branching_edge.from, branching_edge.to, EdgeState::Available);
        fixed_degrees[branching_edge.from.0] -= 1;
        fixed_degrees[branching_edge.to.0] -= 1;
    }
}

enum LowerBoundOutput {
    LowerBound(Distance, Vec<UnEdge>),
    Tour(UnTour),
}

/// Compute the Held-Karp lower bound using 1-trees and Lagrangian relaxation.
#[allow(clippy::too_many_arguments)]
fn held_karp_lower_bound(
    distances: &Matrix<Distance>,
    scaled_distances: &Matrix<ScaledDistance>,
    edge_states: &Matrix<EdgeState>,
    node_penalties: &mut [ScaledDistance],
    upper_bound: Distance,
    max_iterations: usize,
    beta: f64,
    number_computed_one_trees: &mut usize,
) -> Option<LowerBoundOutput> {
    let scaled_bound = ScaledDistance::from_distance(upper_bound);

    let mut scaled_best_lower_bound = ScaledDistance::MIN;

    let mut iter_count = 0;
    let mut alpha = INITIAL_ALPHA;

    let node_penalty_sum: ScaledDistance = node_penalties.iter().sum();

    let one_tree = loop {
        let one_tree = min_one_tree(scaled_distances, edge_states, node_penalties)?;
        *number_computed_one_trees += 1;

        let one_tree_cost = {
            let mut base_cost = 2 * node_penalty_sum;

            for edge in &one_tree {
                base_cost += scaled_distances.get_data(edge.from, edge.to);
                base_cost -= node_penalties[edge.from.0];
                base_cost -= node_penalties[edge.to.0];
            }

            base_cost
        };

        if one_tree_cost > scaled_best_lower_bound {
            scaled_best_lower_bound = one_tree_cost;
        }

        if one_tree_cost >= scaled_bound {
            break one_tree;
        }

        // Deg[node] < 0: Node has degree > 2 -> decrease its penalty (make incident edges more
        // expensive, i.e. less likely to be selected).
        // Deg[node] > 0: Node has degree < 2 -> increase its penalty.
        // Deg[node] == 0: Node has degree == 2 -> no change.
        let mut deg = vec![2i32; distances.dimension()];

        for edge in &one_tree {
            deg[edge.from.0] -= 1;
            deg[edge.to.0] -= 1;
        }

        let square_sum = deg.iter().map(|&d| d * d).sum::<i32>();

        if square_sum == 0 {
            let cost: Distance = one_tree
                .iter()
                .map(|edge| distances.get_data(edge.from, edge.to))
                .sum();

            return Some(LowerBoundOutput::Tour(UnTour {
                edges: one_tree,
                cost,
            }));
        }

        iter_count += 1;

        if iter_count >= max_iterations {
            break one_tree;
        }

        let step_size =
            (alpha * ((scaled_bound.0 - one_tree_cost.0) as f64 / (square_sum as f64))) as i32;

        if step_size <= 3 {
            // Step size is very small (<= 3 in scaled units); further iterations are unlikely to
            // make meaningful progress.
            break one_tree;
        }

        alpha *= beta;

        for (node_penalty, &d) in node_penalties.iter_mut().zip(deg.iter()) {
            *node_penalty += ScaledDistance(step_size * d);
        }
    };

    let best_lower_bound = scaled_best_lower_bound.to_distance_rounded_up();

    Some(LowerBoundOutput::LowerBound(best_lower_bound, one_tree))
}

/// Select an edge from the 1-tree to branch on: the available edge with the smallest reduced cost.
fn edge_to_branch_on(
    scaled_distances: &Matrix<ScaledDistance>,
    edge_states: &Matrix<EdgeState>,
    node_penalties: &[ScaledDistance],
    one_tree: &[UnEdge],
) -> Option<UnEdge> {
    let mut minimum_edge = None;
    let mut minimum_edge_distance = ScaledDistance::MAX;

    for edge in one_tree {
        if edge_states.get_data(edge.from, edge.to) == EdgeState::Available {
            let reduced_distance = scaled_distances.get_data(edge.from, edge.to)
                - node_penalties[edge.from.0]
                - node_penalties[edge.to.0];
            if reduced_distance < minimum_edge_distance {
                minimum_edge_distance = reduced_distance;
                minimum_edge = Some(*edge);
            }
        }
    }

    minimum_edge
}

/// Initial Lagrangian penalty for each node: half its minimum incident distance.
///
/// This biases the first 1-tree away from degenerate stars through a single cheap node, giving
/// the subgradient loop a better starting point than uniform zero penalties.
fn initial_penalties(distances: &Matrix<Distance>) -> Vec<ScaledDistance> {
    let dimension = distances.dimension();

    (0..dimension)
        .map(|node| {
            let min_distance = (0..dimension)
                .filter(|&other| other != node)
                .map(|other| distances.get_data(Node(node), Node(other)))
                .min()
                .unwrap_or(Distance(0));

            ScaledDistance::from_distance(min_distance) / 2
        })
        .collect()
}

/// Adapts the free-standing [held_karp] solver to the [crate::oracle::TspSubsolver] trait, so it
/// can be plugged into a [crate::oracle::SolvePlan] as the exact `SubsolverConfig::Exact` branch.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeldKarp;

impl crate::oracle::TspSubsolver for HeldKarp {
    fn run(&mut self, cost: &crate::cost::CostMatrix, _initial: Option<&crate::cost::Tour>) -> Option<crate::cost::Tour> {
        let n = cost.size();
        if n == 0 {
            return None;
        }
        if n == 1 {
            return Some(crate::cost::Tour::new(vec![Node(0)]));
        }

        let matrix = Matrix::slow_new_from_distance_function(n, |i, j| {
            if i == j { Distance(0) } else { cost.cost(i, j) }
        });

        let un_tour = held_karp(&matrix)?;
        Some(tour_from_un_tour(&un_tour, n))
    }
}

/// Reconstructs an ordered [crate::cost::Tour] from the unordered edge set of an [UnTour].
fn tour_from_un_tour(un_tour: &UnTour, n: usize) -> crate::cost::Tour {
    let mut adjacency: Vec<Vec<Node>> = vec![Vec::new(); n];
    for edge in &un_tour.edges {
        adjacency[edge.from.0].push(edge.to);
        adjacency[edge.to.0].push(edge.from);
    }

    let mut order = Vec::with_capacity(n);
    let mut visited = vec![false; n];
    let mut current = Node(0);
    let mut prev: Option<Node> = None;

    for _ in 0..n {
        order.push(current);
        visited[current.0] = true;

        let next = adjacency[current.0]
            .iter()
            .find(|&&cand| Some(cand) != prev && !visited[cand.0])
            .or_else(|| adjacency[current.0].iter().find(|&&cand| !visited[cand.0]))
            .copied();

        if let Some(next) = next {
            prev = Some(current);
            current = next;
        }
    }

    crate::cost::Tour::new(order)
}
