use tsp_core::instance::{distance::Distance, node::Node};

use crate::{bounds::BoundResult, cost::CostMatrix};

/// Degree-constrained bottleneck path bound: for each excluded vertex `v`, compute bottleneck
/// shortest paths (max-aggregation, Floyd-Warshall) over the remaining vertices, and take `delta`,
/// the single largest entry in that whole bottleneck-path matrix (the induced subgraph's
/// bottleneck diameter). For every pair `(j, k)` reachable through `v`'s two tour edges the bound
/// candidate is `max(delta, cost(v, j), cost(k, v))` — the cheapest way a tour could detour
/// through `v` between `j` and `k`, using the same worst-case path cost `delta` for every pair
/// rather than each pair's own bottleneck distance. The bound is the minimum of this quantity over
/// all `v` and all pairs.
pub fn dcbpb(cost: &CostMatrix) -> BoundResult {
    let n = cost.size();
    if n < 3 {
        return BoundResult { obj: Distance(0) };
    }

    let mut best = Distance::MAX;

    for v in cost.nodes() {
        let rest: Vec<Node> = cost.nodes().filter(|&u| u != v).collect();
        let bottleneck = bottleneck_paths(cost, &rest);
        let m = rest.len();
        let delta = bottleneck.iter().flatten().copied().max().unwrap_or(Distance(0));

        for j in 0..m {
            for k in 0..m {
                if j == k {
                    continue;
                }
                let via_v = delta.max(cost.cost(v, rest[j])).max(cost.cost(rest[k], v));
                if via_v < best {
                    best = via_v;
                }
                if !cost.symmetric() {
                    let via_v_rev = delta.max(cost.cost(v, rest[k])).max(cost.cost(rest[j], v));
                    if via_v_rev < best {
                        best = via_v_rev;
                    }
                }
            }
        }
    }

    BoundResult { obj: best }
}

/// All-pairs bottleneck (minimax) path costs over the induced subgraph on `nodes`, via the
/// Floyd-Warshall max-aggregation variant: `dist[i][k] = min(dist[i][k], max(dist[i][m], dist[m][k]))`.
fn bottleneck_paths(cost: &CostMatrix, nodes: &[Node]) -> Vec<Vec<Distance>> {
    let m = nodes.len();
    let mut dist = vec![vec![Distance::MAX; m]; m];

    for i in 0..m {
        dist[i][i] = Distance(0);
        for j in 0..m {
            if i != j {
                dist[i][j] = cost.cost(nodes[i], nodes[j]);
            }
        }
    }

    for mid in 0..m {
        for i in 0..m {
            for j in 0..m {
                let via = dist[i][mid].max(dist[mid][j]);
                if via < dist[i][j] {
                    dist[i][j] = via;
                }
            }
        }
    }

    dist
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_s6_dcbpb_matches_expected_bound() {
        let data = vec![
            Distance(0), Distance(1), Distance(2), Distance(3),
            Distance(1), Distance(0), Distance(4), Distance(5),
            Distance(2), Distance(4), Distance(0), Distance(6),
            Distance(3), Distance(5), Distance(6), Distance(0),
        ];
        let cost = CostMatrix::from_dense_row_major(data, 4, true);
        assert_eq!(dcbpb(&cost).obj, Distance(4));
    }
}
