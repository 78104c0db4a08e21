use std::collections::HashSet;

use tsp_core::instance::{distance::Distance, node::Node};

use crate::{
    bounds::{BoundResult, heap::IndexedMinHeap},
    cost::CostMatrix,
};

/// Constrained bottleneck spanning tree: Prim's algorithm reporting the tree's bottleneck (max)
/// edge, optionally forbidding a set of edges so alternate minimum spanning trees can be
/// enumerated by re-running with the current tree's bottleneck edges excluded.
pub fn cbst(cost: &CostMatrix, forbidden: &HashSet<(Node, Node)>) -> BoundResult {
    let n = cost.size();
    if n <= 1 {
        return BoundResult { obj: Distance(0) };
    }

    let is_forbidden = |a: Node, b: Node| forbidden.contains(&(a, b)) || forbidden.contains(&(b, a));

    let mut heap = IndexedMinHeap::with_capacity(n);
    let mut in_tree = vec![false; n];
    let mut bottleneck = Distance(0);

    heap.insert(Node(0), Distance(0));
    for v in cost.nodes().skip(1) {
        if !is_forbidden(Node(0), v) {
            heap.insert(v, cost.cost(Node(0), v));
        } else {
            heap.insert(v, Distance::MAX);
        }
    }

    let mut edges_added = 0usize;
    while let Some((node, key)) = heap.extract_min() {
        in_tree[node.0] = true;
        if node != Node(0) {
            if key > bottleneck {
                bottleneck = key;
            }
            edges_added += 1;
        }

        for next in cost.nodes() {
            if in_tree[next.0] || !heap.contains(next) {
                continue;
            }
            if is_forbidden(node, next) {
                continue;
            }
            let candidate = cost.cost(node, next);
            heap.decrease_key(next, candidate);
        }
    }

    if edges_added < n - 1 {
        // No spanning tree avoids the forbidden set; report an infeasible sentinel.
        bottleneck = Distance::MAX;
    }

    BoundResult { obj: bottleneck }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_s6_cbst_matches_expected_bottleneck() {
        let data = vec![
            Distance(0), Distance(1), Distance(2), Distance(3),
            Distance(1), Distance(0), Distance(4), Distance(5),
            Distance(2), Distance(4), Distance(0), Distance(6),
            Distance(3), Distance(5), Distance(6), Distance(0),
        ];
        let cost = CostMatrix::from_dense_row_major(data, 4, true);
        let result = cbst(&cost, &HashSet::new());
        assert_eq!(result.obj, Distance(3));
    }

    #[test]
    fn forbidding_the_cheapest_edge_changes_the_bottleneck() {
        let data = vec![
            Distance(0), Distance(1), Distance(2), Distance(3),
            Distance(1), Distance(0), Distance(4), Distance(5),
            Distance(2), Distance(4), Distance(0), Distance(6),
            Distance(3), Distance(5), Distance(6), Distance(0),
        ];
        let cost = CostMatrix::from_dense_row_major(data, 4, true);
        let mut forbidden = HashSet::new();
        forbidden.insert((Node(0), Node(1)));
        let result = cbst(&cost, &forbidden);
        assert!(result.obj >= Distance(3));
    }
}
