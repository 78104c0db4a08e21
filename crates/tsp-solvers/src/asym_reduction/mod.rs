//! Reduces an asymmetric `CostMatrix` to a symmetric one twice its size, so the symmetric
//! [crate::oracle::FeasibilityOracle]/[crate::driver] machinery can be reused unchanged for
//! asymmetric instances.

use tsp_core::instance::{distance::Distance, node::Node};

use crate::cost::{CostMatrix, Tour};

/// Builds the `2n`-node symmetric reduction of an `n`-node asymmetric instance.
///
/// Real nodes keep their original indices `0..n`; ghost nodes `n..2n` are added such that
/// `C'(i+n, i)` is a mandatory fixed edge (negative cost), `C'(i+n, j) = C(j, i)` for `i != j`,
/// and same-half pairs are unreachable (`infinity`). Any Hamiltonian cycle of `C'` that uses all
/// `n` fixed edges corresponds to an asymmetric Hamiltonian cycle of `C`.
pub fn build_symmetric_instance(asym: &CostMatrix, infinity: Distance) -> CostMatrix {
    let n = asym.size();
    let size = 2 * n;
    let mut data = vec![Distance(0); size * size];

    let fixed_edge_cost = Distance(-infinity.0);

    for i in 0..size {
        for j in 0..size {
            if i == j {
                continue;
            }
            data[i * size + j] = reduced_cost(asym, n, infinity, fixed_edge_cost, i, j);
        }
    }

    CostMatrix::from_dense_row_major(data, size, true)
}

fn reduced_cost(
    asym: &CostMatrix,
    n: usize,
    infinity: Distance,
    fixed_edge_cost: Distance,
    i: usize,
    j: usize,
) -> Distance {
    let i_is_ghost = i >= n;
    let j_is_ghost = j >= n;

    if i_is_ghost == j_is_ghost {
        // Same half: no direct edge between two real nodes or two ghost nodes.
        return infinity;
    }

    let (ghost, real) = if i_is_ghost { (i, j) } else { (j, i) };
    let ghost_owner = ghost - n;

    if ghost_owner == real {
        fixed_edge_cost
    } else {
        asym.cost(Node(real), Node(ghost_owner))
    }
}

/// Recovers the asymmetric tour implied by a Hamiltonian cycle of the symmetric reduction.
/// Panics if `sym_tour` does not use all `n` mandatory fixed edges, which would mean it does not
/// correspond to any asymmetric tour.
pub fn recover(sym_tour: &Tour, n: usize) -> Tour {
    let order = sym_tour.order();
    assert_eq!(order.len(), 2 * n, "symmetric tour must visit all 2n nodes");

    let pos_of = |node: Node| order.iter().position(|&x| x == node).expect("node must be in the tour");

    let mut real_order = Vec::with_capacity(n);
    let mut used_fixed_edges = 0usize;

    let len = order.len();
    let mut current = Node(0);
    for _ in 0..n {
        real_order.push(current);

        let p = pos_of(current);
        let own_ghost = Node(current.0 + n);
        let neighbor_forward = order[(p + 1) % len];
        let neighbor_backward = order[(p + len - 1) % len];

        // One neighbor is this node's own ghost (the mandatory fixed edge); the other is some
        // other owner's ghost, whose owner is the next real node in the asymmetric tour.
        let next_owner_ghost = if neighbor_forward == own_ghost {
            used_fixed_edges += 1;
            neighbor_backward
        } else if neighbor_backward == own_ghost {
            used_fixed_edges += 1;
            neighbor_forward
        } else {
            panic!("real node {current:?} is not adjacent to its ghost in the symmetric tour");
        };

        current = Node(next_owner_ghost.0 - n);
    }

    assert_eq!(used_fixed_edges, n, "symmetric tour must use every mandatory fixed edge");
    Tour::new(real_order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> CostMatrix {
        // S4 seed scenario: 3-node asymmetric instance.
        let data = vec![
            Distance(0), Distance(2), Distance(9),
            Distance(2), Distance(0), Distance(3),
            Distance(9), Distance(3), Distance(0),
        ];
        CostMatrix::from_dense_row_major(data, 3, false)
    }

    #[test]
    fn symmetric_reduction_has_double_the_nodes() {
        let asym = triangle();
        let sym = build_symmetric_instance(&asym, Distance(1000));
        assert_eq!(sym.size(), 6);
        assert!(sym.symmetric());
        assert!(sym.is_fixed_edge(Node(3), Node(0)));
        assert!(sym.is_fixed_edge(Node(4), Node(1)));
        assert!(sym.is_fixed_edge(Node(5), Node(2)));
        assert_eq!(sym.cost(Node(0), Node(4)), asym.cost(Node(1), Node(0)));
    }

    #[test]
    fn recover_reads_back_a_consistent_asymmetric_tour() {
        let n = 3;
        // 0 -> 4(ghost of 1) -> 1 -> 5(ghost of 2) -> 2 -> 3(ghost of 0) -> 0
        let sym_tour = Tour::new(vec![Node(0), Node(4), Node(1), Node(5), Node(2), Node(3)]);
        let asym_tour = recover(&sym_tour, n);
        assert!(asym_tour.is_permutation_of(n));
        assert_eq!(asym_tour.order(), &[Node(0), Node(1), Node(2)]);
    }
}
