use tsp_core::instance::{distance::Distance, node::Node};

use crate::{
    bounds::BoundResult,
    cost::{CostMatrix, ProblemInfo},
};

/// Bottleneck biconnected spanning subgraph: binary search over `cost_list` for the smallest
/// threshold at which the subgraph using only edges `<= threshold` is biconnected.
pub fn bbssp(cost: &CostMatrix, info: &ProblemInfo) -> BoundResult {
    let cost_list = info.cost_list();
    let n = cost.size();

    if n <= 2 {
        return BoundResult { obj: info.min_cost() };
    }

    let mut low = 0usize;
    let mut high = cost_list.len() - 1;

    while low < high {
        let mid = (low + high) / 2;
        if is_biconnected_at_threshold(cost, cost_list[mid]) {
            high = mid;
        } else {
            low = mid + 1;
        }
    }

    BoundResult { obj: cost_list[low] }
}

/// Biconnectivity test (connected, no articulation point) using only edges `<= threshold`.
/// Implemented as an iterative DFS computing discovery times and low-links, per the design note
/// that recursive DFS must be made iterative to avoid stack overflow on large instances.
fn is_biconnected_at_threshold(cost: &CostMatrix, threshold: Distance) -> bool {
    let n = cost.size();
    let mut visited = vec![false; n];
    let mut disc = vec![0usize; n];
    let mut low = vec![0usize; n];
    let mut timer = 0usize;
    let mut articulation = false;
    let mut root_children = 0usize;

    // Stack entries: (node, parent, next neighbor index to try).
    let mut stack: Vec<(Node, Option<Node>, usize)> = vec![(Node(0), None, 0)];
    visited[0] = true;
    disc[0] = timer;
    low[0] = timer;
    timer += 1;

    while let Some(&mut (node, parent, ref mut next_index)) = stack.last_mut() {
        let mut pushed = false;

        while *next_index < n {
            let next = Node(*next_index);
            *next_index += 1;
            if next == node || cost.cost(node, next) > threshold {
                continue;
            }

            if !visited[next.0] {
                visited[next.0] = true;
                disc[next.0] = timer;
                low[next.0] = timer;
                timer += 1;
                if parent.is_none() {
                    root_children += 1;
                }
                stack.push((next, Some(node), 0));
                pushed = true;
                break;
            } else if Some(next) != parent {
                low[node.0] = low[node.0].min(disc[next.0]);
            }
        }

        if pushed {
            continue;
        }

        stack.pop();
        if let Some(u) = parent {
            low[u.0] = low[u.0].min(low[node.0]);
            if u != Node(0) && low[node.0] >= disc[u.0] {
                articulation = true;
            }
        }
    }

    if root_children > 1 {
        articulation = true;
    }

    visited.iter().all(|&v| v) && !articulation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_s1_bbssp_is_a_valid_lower_bound() {
        let data = vec![
            Distance(0), Distance(1), Distance(3), Distance(2),
            Distance(1), Distance(0), Distance(4), Distance(5),
            Distance(3), Distance(4), Distance(0), Distance(6),
            Distance(2), Distance(5), Distance(6), Distance(0),
        ];
        let cost = CostMatrix::from_dense_row_major(data, 4, true);
        let info = ProblemInfo::build(&cost);
        assert!(bbssp(&cost, &info).obj <= Distance(5));
    }

    #[test]
    fn complete_graph_is_biconnected_at_max_cost() {
        let data = vec![
            Distance(0), Distance(1), Distance(1),
            Distance(1), Distance(0), Distance(1),
            Distance(1), Distance(1), Distance(0),
        ];
        let cost = CostMatrix::from_dense_row_major(data, 3, true);
        assert!(is_biconnected_at_threshold(&cost, Distance(1)));
        assert!(!is_biconnected_at_threshold(&cost, Distance(0)));
    }
}
