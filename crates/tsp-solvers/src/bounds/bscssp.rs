use tsp_core::instance::{distance::Distance, node::Node};

use crate::{
    bounds::BoundResult,
    cost::{CostMatrix, ProblemInfo},
};

/// Bottleneck strongly connected spanning subgraph: binary search over `cost_list` for the
/// smallest threshold at which the directed subgraph using only edges `<= threshold` is strongly
/// connected.
pub fn bscssp(cost: &CostMatrix, info: &ProblemInfo) -> BoundResult {
    let cost_list = info.cost_list();
    let n = cost.size();

    if n <= 1 {
        return BoundResult { obj: Distance(0) };
    }

    let mut low = 0usize;
    let mut high = cost_list.len() - 1;

    while low < high {
        let mid = (low + high) / 2;
        if is_strongly_connected_in_band(cost, Distance(i32::MIN), cost_list[mid]) {
            high = mid;
        } else {
            low = mid + 1;
        }
    }

    BoundResult { obj: cost_list[low] }
}

/// Used by the DT driver's banded cascade to test strong connectivity using only edges in
/// `[low, cap]`, without running the full binary search.
pub fn is_strongly_connected_in_band(cost: &CostMatrix, low: Distance, cap: Distance) -> bool {
    reachable_from(cost, Node(0), low, cap, false).iter().all(|&v| v)
        && reachable_from(cost, Node(0), low, cap, true).iter().all(|&v| v)
        && cost.size() > 0
}

/// Forward (`reverse = false`) or reverse-graph (`reverse = true`) reachability from `start`,
/// using only edges in `[low, high]` (fixed edges always usable). Strong connectivity from a
/// single source is equivalent to full strong connectivity: if node 0 reaches every node and is
/// reached from every node, the graph has one strongly connected component.
fn reachable_from(cost: &CostMatrix, start: Node, low: Distance, high: Distance, reverse: bool) -> Vec<bool> {
    let n = cost.size();
    let mut visited = vec![false; n];
    let mut stack = vec![start];
    visited[start.0] = true;

    while let Some(node) = stack.pop() {
        for next in cost.nodes() {
            if visited[next.0] {
                continue;
            }
            let (from, to) = if reverse { (next, node) } else { (node, next) };
            let edge_cost = cost.cost(from, to);
            let usable = cost.is_fixed_edge(from, to) || (edge_cost >= low && edge_cost <= high);
            if usable {
                visited[next.0] = true;
                stack.push(next);
            }
        }
    }

    visited
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_s1_bscssp_is_a_valid_lower_bound() {
        let data = vec![
            Distance(0), Distance(1), Distance(3), Distance(2),
            Distance(1), Distance(0), Distance(4), Distance(5),
            Distance(3), Distance(4), Distance(0), Distance(6),
            Distance(2), Distance(5), Distance(6), Distance(0),
        ];
        let cost = CostMatrix::from_dense_row_major(data, 4, true);
        let info = ProblemInfo::build(&cost);
        assert!(bscssp(&cost, &info).obj <= Distance(5));
    }

    #[test]
    fn directed_cycle_is_strongly_connected() {
        let infinite = Distance(1_000_000);
        let data = vec![
            Distance(0), Distance(1), infinite,
            infinite, Distance(0), Distance(1),
            Distance(1), infinite, Distance(0),
        ];
        let cost = CostMatrix::from_dense_row_major(data, 3, false);
        assert!(is_strongly_connected_in_band(&cost, Distance(i32::MIN), Distance(1)));
        assert!(!is_strongly_connected_in_band(&cost, Distance(i32::MIN), Distance(0)));
    }
}
