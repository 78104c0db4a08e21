use tsp_core::instance::distance::Distance;

use crate::{bounds::BoundResult, cost::CostMatrix};

/// 2-Max bound: a Hamiltonian cycle uses exactly two edges at each vertex, so the larger of the
/// two is at least that vertex's second-cheapest incident edge (symmetric), or the worse of its
/// cheapest outgoing and cheapest incoming edge (asymmetric). The bound is the maximum of that
/// per-vertex value over all vertices. O(n^2).
pub fn two_max(cost: &CostMatrix) -> BoundResult {
    let mut worst = Distance(0);

    for i in cost.nodes() {
        let mut smallest_out = Distance::MAX;
        let mut second_out = Distance::MAX;
        let mut smallest_in = Distance::MAX;

        for j in cost.nodes() {
            if i == j {
                continue;
            }

            let out_cost = cost.cost(i, j);
            if out_cost < smallest_out {
                second_out = smallest_out;
                smallest_out = out_cost;
            } else if out_cost < second_out {
                second_out = out_cost;
            }

            if !cost.symmetric() {
                let in_cost = cost.cost(j, i);
                if in_cost < smallest_in {
                    smallest_in = in_cost;
                }
            }
        }

        let bound_i = if cost.symmetric() {
            second_out
        } else {
            smallest_out.max(smallest_in)
        };

        if bound_i > worst {
            worst = bound_i;
        }
    }

    BoundResult { obj: worst }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_s1_two_max_is_a_valid_lower_bound() {
        let data = vec![
            Distance(0), Distance(1), Distance(3), Distance(2),
            Distance(1), Distance(0), Distance(4), Distance(5),
            Distance(3), Distance(4), Distance(0), Distance(6),
            Distance(2), Distance(5), Distance(6), Distance(0),
        ];
        let cost = CostMatrix::from_dense_row_major(data, 4, true);
        // Optimal BTSP objective for this instance is 5 (seed scenario S1).
        assert!(two_max(&cost).obj <= Distance(5));
    }
}
