//! A Lin-Kernighan-style heuristic length-minimising subsolver.
//!
//! Greedy nearest-neighbour construction, then repeated 2-opt/Or-opt local search to a local
//! optimum, escaped via double-bridge "kicks" for up to `random_restarts` rounds or until
//! `stall_count` consecutive kicks fail to improve.

use rand::Rng;
use rand::rngs::StdRng;
use tsp_core::instance::{distance::Distance, node::Node};

use crate::{
    cost::{CostMatrix, Tour},
    oracle::TspSubsolver,
};

#[derive(Debug, Clone, Copy)]
pub struct LkParams {
    pub random_restarts: usize,
    pub stall_count: usize,
}

impl Default for LkParams {
    fn default() -> Self {
        Self {
            random_restarts: 20,
            stall_count: 8,
        }
    }
}

pub struct LinKernighan {
    params: LkParams,
    rng: StdRng,
}

impl LinKernighan {
    pub fn new(params: LkParams, rng: StdRng) -> Self {
        Self { params, rng }
    }
}

impl TspSubsolver for LinKernighan {
    fn run(&mut self, cost: &CostMatrix, initial: Option<&Tour>) -> Option<Tour> {
        if cost.size() == 0 {
            return None;
        }
        if cost.size() == 1 {
            return Some(Tour::new(vec![Node(0)]));
        }

        let mut order = match initial {
            Some(tour) => tour.order().to_vec(),
            None => nearest_neighbor_tour(cost),
        };
        local_search(cost, &mut order);

        let mut best = order.clone();
        let mut best_length = Tour::new(best.clone()).length(cost);

        let mut stalled = 0;
        for _ in 0..self.params.random_restarts {
            if stalled >= self.params.stall_count {
                break;
            }

            let mut candidate = best.clone();
            double_bridge_kick(&mut candidate, &mut self.rng);
            local_search(cost, &mut candidate);

            let candidate_length = Tour::new(candidate.clone()).length(cost);
            if candidate_length < best_length {
                best = candidate;
                best_length = candidate_length;
                stalled = 0;
            } else {
                stalled += 1;
            }
        }

        Some(Tour::new(best))
    }
}

fn nearest_neighbor_tour(cost: &CostMatrix) -> Vec<Node> {
    let n = cost.size();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    let mut current = Node(0);
    visited[0] = true;
    order.push(current);

    for _ in 1..n {
        let mut nearest = None;
        let mut nearest_cost = Distance::MAX;
        for next in cost.nodes() {
            if visited[next.0] {
                continue;
            }
            let c = cost.cost(current, next);
            if c < nearest_cost {
                nearest_cost = c;
                nearest = Some(next);
            }
        }
        let next = nearest.expect("an unvisited node must exist");
        visited[next.0] = true;
        order.push(next);
        current = next;
    }

    order
}

/// Repeated 2-opt and Or-opt passes until neither improves the tour.
fn local_search(cost: &CostMatrix, order: &mut Vec<Node>) {
    let n = order.len();
    if n < 4 {
        return;
    }

    loop {
        let improved_2opt = two_opt_pass(cost, order);
        let improved_or_opt = or_opt_pass(cost, order);
        if !improved_2opt && !improved_or_opt {
            break;
        }
    }
}

fn tour_edge_cost(cost: &CostMatrix, order: &[Node], i: usize) -> Distance {
    let n = order.len();
    cost.cost(order[i], order[(i + 1) % n])
}

/// One full sweep of 2-opt, reversing the segment between the two cut points whenever it shortens
/// the tour. Returns whether any improving move was applied.
fn two_opt_pass(cost: &CostMatrix, order: &mut [Node]) -> bool {
    let n = order.len();
    let mut improved = false;

    for i in 0..n - 1 {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let removed = tour_edge_cost(cost, order, i) + tour_edge_cost(cost, order, j);
            let added = cost.cost(order[i], order[j]) + cost.cost(order[(i + 1) % n], order[(j + 1) % n]);
            if added < removed {
                order[i + 1..=j].reverse();
                improved = true;
            }
        }
    }

    improved
}

/// One full sweep of Or-opt: relocate chains of length 1-3 to a better position in the tour.
fn or_opt_pass(cost: &CostMatrix, order: &mut Vec<Node>) -> bool {
    let n = order.len();
    let mut improved = false;

    for chain_len in 1..=3usize.min(n.saturating_sub(2)) {
        let mut start = 0;
        while start + chain_len <= n {
            let before = (start + n - 1) % n;
            let after = (start + chain_len) % n;
            if before == (start + chain_len - 1) % n {
                start += 1;
                continue;
            }

            let removed = cost.cost(order[before], order[start])
                + cost.cost(order[start + chain_len - 1], order[after]);
            let bridge = cost.cost(order[before], order[after]);

            let mut best_gain = Distance(0);
            let mut best_insert_after = None;

            for k in 0..n {
                if k >= start.saturating_sub(1) && k <= start + chain_len {
                    continue;
                }
                let k_next = (k + 1) % n;
                if (start..start + chain_len).contains(&k) || (start..start + chain_len).contains(&k_next) {
                    continue;
                }

                let old_edge = cost.cost(order[k], order[k_next]);
                let new_cost = cost.cost(order[k], order[start])
                    + cost.cost(order[start + chain_len - 1], order[k_next]);
                let gain = (removed + old_edge) - (bridge + new_cost);
                if gain > best_gain {
                    best_gain = gain;
                    best_insert_after = Some(k);
                }
            }

            if let Some(k) = best_insert_after {
                let chain: Vec<Node> = order[start..start + chain_len].to_vec();
                order.drain(start..start + chain_len);
                let insert_at = if k > start { k - chain_len + 1 } else { k + 1 };
                for (offset, node) in chain.into_iter().enumerate() {
                    order.insert(insert_at + offset, node);
                }
                improved = true;
            } else {
                start += 1;
            }
        }
    }

    improved
}

/// Double-bridge 4-opt move: cuts the tour into four segments A B C D and reconnects as A C B D.
/// Cannot be undone by any sequence of 2-opt moves, which is what lets it escape 2-opt local
/// optima.
fn double_bridge_kick(order: &mut Vec<Node>, rng: &mut impl Rng) {
    let n = order.len();
    if n < 8 {
        return;
    }

    let mut cuts = [0usize; 3];
    cuts[0] = 1 + rng.random_range(0..n / 4);
    cuts[1] = cuts[0] + 1 + rng.random_range(0..n / 4);
    cuts[2] = cuts[1] + 1 + rng.random_range(0..n / 4);

    let a = &order[0..cuts[0]];
    let b = &order[cuts[0]..cuts[1]];
    let c = &order[cuts[1]..cuts[2]];
    let d = &order[cuts[2]..n];

    let mut reassembled = Vec::with_capacity(n);
    reassembled.extend_from_slice(a);
    reassembled.extend_from_slice(c);
    reassembled.extend_from_slice(b);
    reassembled.extend_from_slice(d);

    *order = reassembled;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

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
    fn finds_a_valid_hamiltonian_tour() {
        let cost = diamond();
        let mut solver = LinKernighan::new(LkParams::default(), StdRng::seed_from_u64(1));
        let tour = solver.run(&cost, None).expect("LK should find a tour on a tiny instance");
        assert!(tour.is_permutation_of(4));
    }

    #[test]
    fn local_search_does_not_worsen_nearest_neighbor_tour() {
        let cost = diamond();
        let mut order = nearest_neighbor_tour(&cost);
        let before = Tour::new(order.clone()).length(&cost);
        local_search(&cost, &mut order);
        let after = Tour::new(order).length(&cost);
        assert!(after <= before);
    }
}
