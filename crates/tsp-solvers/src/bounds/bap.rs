use tsp_core::instance::{distance::Distance, node::Node};

use crate::{
    bounds::BoundResult,
    cost::{CostMatrix, ProblemInfo},
};

/// Bottleneck assignment problem: binary search over `cost_list` for the smallest threshold at
/// which the bipartite graph of edges `<= threshold` admits a perfect matching (every node has an
/// outgoing and incoming assignment under the standard left=node/right=node bipartite split).
pub fn bap(cost: &CostMatrix, info: &ProblemInfo) -> BoundResult {
    let cost_list = info.cost_list();

    let mut low = 0usize;
    let mut high = cost_list.len() - 1;

    while low < high {
        let mid = (low + high) / 2;
        if has_perfect_matching_in_band(cost, Distance(i32::MIN), cost_list[mid]) {
            high = mid;
        } else {
            low = mid + 1;
        }
    }

    BoundResult { obj: cost_list[low] }
}

/// Used by the DT/IB drivers' banded cascade: does a perfect matching exist using only edges
/// in `[low, cap]`, without running the full binary search.
pub fn bap_in_band(cost: &CostMatrix, low: Distance, cap: Distance) -> bool {
    has_perfect_matching_in_band(cost, low, cap)
}

fn has_perfect_matching_in_band(cost: &CostMatrix, low: Distance, high: Distance) -> bool {
    let n = cost.size();
    let mut match_right: Vec<Option<Node>> = vec![None; n];

    for left in cost.nodes() {
        let mut visited = vec![false; n];
        if !try_augment(cost, low, high, left, &mut visited, &mut match_right) {
            return false;
        }
    }

    true
}

/// Kuhn's augmenting-path algorithm, one left vertex at a time.
fn try_augment(
    cost: &CostMatrix,
    low: Distance,
    high: Distance,
    left: Node,
    visited: &mut [bool],
    match_right: &mut [Option<Node>],
) -> bool {
    for right in cost.nodes() {
        let c = cost.cost(left, right);
        if right == left || c > high || (c < low && !cost.is_fixed_edge(left, right)) {
            continue;
        }
        if visited[right.0] {
            continue;
        }
        visited[right.0] = true;

        let free = match match_right[right.0] {
            None => true,
            Some(prev_left) => try_augment(cost, low, high, prev_left, visited, match_right),
        };

        if free {
            match_right[right.0] = Some(left);
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_s1_bap_is_a_valid_lower_bound() {
        let data = vec![
            Distance(0), Distance(1), Distance(3), Distance(2),
            Distance(1), Distance(0), Distance(4), Distance(5),
            Distance(3), Distance(4), Distance(0), Distance(6),
            Distance(2), Distance(5), Distance(6), Distance(0),
        ];
        let cost = CostMatrix::from_dense_row_major(data, 4, true);
        let info = ProblemInfo::build(&cost);
        assert!(bap(&cost, &info).obj <= Distance(5));
    }

    #[test]
    fn band_query_matches_full_search() {
        let data = vec![
            Distance(0), Distance(1), Distance(3), Distance(2),
            Distance(1), Distance(0), Distance(4), Distance(5),
            Distance(3), Distance(4), Distance(0), Distance(6),
            Distance(2), Distance(5), Distance(6), Distance(0),
        ];
        let cost = CostMatrix::from_dense_row_major(data, 4, true);
        let info = ProblemInfo::build(&cost);
        let found = bap(&cost, &info);
        assert!(bap_in_band(&cost, Distance(i32::MIN), found.obj));
        assert!(!bap_in_band(&cost, Distance(i32::MIN), Distance(found.obj.0 - 1)));
    }
}
