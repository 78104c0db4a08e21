use tsp_core::instance::{distance::ScaledDistance, edge::UnEdge, matrix::Matrix, node::Node};

use crate::held_karp::EdgeState;

/// Compute a minimum 1-tree with the given node penalties and edge states.
///
/// Node 0 is treated as the special node: a minimum spanning tree is built over nodes
/// `1..dimension`, then the two cheapest available edges connecting node 0 back to the tree are
/// added.
pub fn min_one_tree(
    distances: &Matrix<ScaledDistance>,
    edge_states: &Matrix<EdgeState>,
    penalties: &[ScaledDistance],
) -> Option<Vec<UnEdge>> {
    let dimension = distances.dimension();
    let tree = min_spanning_tree(distances, edge_states, penalties)?;

    let special_node = Node(0);
    // We uphold the invariant dist_cheapest_edge_a <= dist_cheapest_edge_b throughout.
    let mut dist_cheapest_edge_a = ScaledDistance::MAX;
    let mut dist_cheapest_edge_b = ScaledDistance::MAX;
    let mut cheapest_neighbor_a = None;
    let mut cheapest_neighbor_b = None;

    for node_index in 1..dimension {
        let node = Node(node_index);
        match edge_states.get_data(special_node, node) {
            EdgeState::Excluded => continue,
            EdgeState::Available => {
                let distance = distances.get_data(special_node, node)
                    - penalties[special_node.0]
                    - penalties[node.0];
                if distance < dist_cheapest_edge_a {
                    dist_cheapest_edge_b = dist_cheapest_edge_a;
                    cheapest_neighbor_b = cheapest_neighbor_a;
                    dist_cheapest_edge_a = distance;
                    cheapest_neighbor_a = Some(node);
                } else if distance < dist_cheapest_edge_b {
                    dist_cheapest_edge_b = distance;
                    cheapest_neighbor_b = Some(node);
                }
            }
            EdgeState::Fixed => {
                if dist_cheapest_edge_b == ScaledDistance::MIN {
                    // By the invariant dist_cheapest_edge_a is also MIN, meaning two fixed edges
                    // are already accounted for and we just found a third: infeasible.
                    return None;
                }
                dist_cheapest_edge_b = dist_cheapest_edge_a;
                cheapest_neighbor_b = cheapest_neighbor_a;
                dist_cheapest_edge_a = ScaledDistance::MIN;
                cheapest_neighbor_a = Some(node);
            }
        }
    }

    let neighbor_b = cheapest_neighbor_b?;
    let neighbor_a = cheapest_neighbor_a.expect("cheapest neighbor a should exist by invariant");

    let mut one_tree = tree;
    one_tree.push(UnEdge::new(special_node, neighbor_a));
    one_tree.push(UnEdge::new(special_node, neighbor_b));
    Some(one_tree)
}

/// Compute a minimum spanning tree over nodes `1..distances.dimension()`, honoring edge states and
/// node penalties. Implements a variation of Prim's algorithm.
///
/// <https://en.wikipedia.org/wiki/Prim%27s_algorithm>
fn min_spanning_tree(
    distances: &Matrix<ScaledDistance>,
    edge_states: &Matrix<EdgeState>,
    penalties: &[ScaledDistance],
) -> Option<Vec<UnEdge>> {
    let dimension = distances.dimension();
    let number_of_nodes = dimension.saturating_sub(1);

    let mut remaining_nodes: Vec<Node> = (2..dimension).map(Node).collect();

    let mut best_pred_to_node = vec![Node(dimension); dimension];
    let mut best_cost_to_node = vec![ScaledDistance::MAX; dimension];

    let mut curr = Node(1);
    let mut tree = Vec::with_capacity(number_of_nodes.saturating_sub(1));

    for _ in 0..number_of_nodes.saturating_sub(1) {
        let mut cheapest_edge = ScaledDistance::MAX;
        let mut cheapest_node = None;

        let current_penalty = penalties[curr.0];

        for (index, next) in remaining_nodes.iter().enumerate() {
            match edge_states.get_data(curr, *next) {
                EdgeState::Excluded => continue,
                EdgeState::Available => {
                    let distance = distances.get_data(curr, *next);
                    let adjusted_distance = distance - current_penalty - penalties[next.0];
                    if adjusted_distance < best_cost_to_node[next.0] {
                        best_cost_to_node[next.0] = adjusted_distance;
                        best_pred_to_node[next.0] = curr;
                    }
                }
                EdgeState::Fixed => {
                    if best_cost_to_node[next.0] == ScaledDistance::MIN {
                        // `next` was already forced in via another fixed edge; a second one would
                        // close a cycle, so the current edge states are infeasible.
                        return None;
                    }
                    best_cost_to_node[next.0] = ScaledDistance::MIN;
                    best_pred_to_node[next.0] = curr;
                }
            }

            if best_cost_to_node[next.0] < cheapest_edge {
                cheapest_edge = best_cost_to_node[next.0];
                cheapest_node = Some((index, *next));
            }
        }

        if let Some((index, cheapest_node)) = cheapest_node {
            tree.push(UnEdge::new(
                best_pred_to_node[cheapest_node.0],
                cheapest_node,
            ));
            remaining_nodes.swap_remove(index);
            curr = cheapest_node;
        } else {
            // Remaining nodes are unreachable under the current edge states.
            return None;
        }
    }

    debug_assert_eq!(tree.len(), number_of_nodes.saturating_sub(1));

    Some(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn available_edge_states(dimension: usize) -> Matrix<EdgeState> {
        Matrix::new_from_dimension_with_value(dimension, EdgeState::Available)
    }

    #[test]
    fn test_min_spanning_tree_simple_chain() {
        let dimension = 6;
        let distances = Matrix::slow_new_from_distance_function(dimension, |from, to| {
            if from.0.abs_diff(to.0) == 1 {
                ScaledDistance::from_i32(0)
            } else {
                ScaledDistance::from_i32(1)
            }
        });
        let edge_states = available_edge_states(dimension);
        let penalties = vec![ScaledDistance(0); dimension];

        let mst = min_spanning_tree(&distances, &edge_states, &penalties).unwrap();
        assert_eq!(mst.len(), dimension - 2);
        for edge in &mst {
            assert_eq!(edge.from.0.abs_diff(edge.to.0), 1);
        }
    }

    #[test]
    fn test_min_spanning_tree_excluded_infeasible() {
        let dimension = 6;
        let distances = Matrix::new_from_dimension_with_value(dimension, ScaledDistance(0));
        let edge_states = Matrix::new_from_dimension_with_value(dimension, EdgeState::Excluded);
        let penalties = vec![ScaledDistance(0); dimension];

        assert_eq!(min_spanning_tree(&distances, &edge_states, &penalties), None);
    }

    #[test]
    fn test_min_one_tree_simple_cycle() {
        let dimension = 6;
        let distances = Matrix::slow_new_from_distance_function(dimension, |from, to| {
            let diff = from.0.abs_diff(to.0);
            if diff == 1 || diff == dimension - 1 {
                ScaledDistance::from_i32(0)
            } else {
                ScaledDistance::from_i32(1)
            }
        });
        let edge_states = available_edge_states(dimension);
        let penalties = vec![ScaledDistance(0); dimension];

        let one_tree = min_one_tree(&distances, &edge_states, &penalties).unwrap();
        assert_eq!(one_tree.len(), dimension);
    }

    #[test]
    fn test_min_spanning_tree_fixed_edges_respected() {
        let dimension = 5;
        let distances = Matrix::new_from_dimension_with_value(dimension, ScaledDistance(0));
        let mut edge_states = available_edge_states(dimension);
        for i in 1..dimension - 1 {
            edge_states.set_data(Node(i), Node(i + 1), EdgeState::Fixed);
            edge_states.set_data(Node(i + 1), Node(i), EdgeState::Fixed);
        }
        let penalties = vec![ScaledDistance(0); dimension];

        let mst = min_spanning_tree(&distances, &edge_states, &penalties).unwrap();
        for i in 1..dimension - 1 {
            assert!(
                mst.contains(&UnEdge::new(Node(i), Node(i + 1))),
                "fixed edge ({i}, {}) missing from MST",
                i + 1
            );
        }
    }
}
