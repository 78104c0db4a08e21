use tsp_core::instance::{distance::Distance, node::Node};

use super::CostMatrix;

/// A Hamiltonian cycle as a permutation: `order[k] -> order[(k + 1) % n]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    order: Vec<Node>,
}

impl Tour {
    pub fn new(order: Vec<Node>) -> Self {
        Self { order }
    }

    pub fn order(&self) -> &[Node] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn edges(&self) -> impl Iterator<Item = (Node, Node)> + '_ {
        let n = self.order.len();
        (0..n).map(move |k| (self.order[k], self.order[(k + 1) % n]))
    }

    pub fn length(&self, cost: &CostMatrix) -> Distance {
        self.edges().map(|(i, j)| cost.cost(i, j)).sum()
    }

    pub fn max_cost(&self, cost: &CostMatrix) -> Distance {
        self.edges()
            .map(|(i, j)| cost.cost(i, j))
            .max()
            .unwrap_or(Distance(0))
    }

    pub fn min_cost(&self, cost: &CostMatrix) -> Distance {
        self.edges()
            .map(|(i, j)| cost.cost(i, j))
            .min()
            .unwrap_or(Distance(0))
    }

    pub fn fixed_edge_count(&self, cost: &CostMatrix) -> usize {
        self.edges().filter(|&(i, j)| cost.is_fixed_edge(i, j)).count()
    }

    /// Whether this is a valid permutation of `{0..n}`.
    pub fn is_permutation_of(&self, n: usize) -> bool {
        if self.order.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for node in &self.order {
            if node.0 >= n || seen[node.0] {
                return false;
            }
            seen[node.0] = true;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> CostMatrix {
        // S1 seed scenario: [[-,1,3,2],[1,-,4,5],[3,4,-,6],[2,5,6,-]]
        let data = vec![
            Distance(0), Distance(1), Distance(3), Distance(2),
            Distance(1), Distance(0), Distance(4), Distance(5),
            Distance(3), Distance(4), Distance(0), Distance(6),
            Distance(2), Distance(5), Distance(6), Distance(0),
        ];
        CostMatrix::from_dense_row_major(data, 4, true)
    }

    #[test]
    fn seed_s1_btsp_optimum_tour() {
        let cost = diamond();
        // Among the three distinct 4-node Hamiltonian cycles, 0-2-1-3-0 is the one with the
        // smallest bottleneck edge (5), matching the S1 seed scenario's optimal objective.
        let tour = Tour::new(vec![Node(0), Node(2), Node(1), Node(3)]);

        assert!(tour.is_permutation_of(4));
        assert_eq!(tour.max_cost(&cost), Distance(5));
        assert_eq!(tour.length(&cost), Distance(3 + 4 + 5 + 2));
    }

    #[test]
    fn rejects_non_permutations() {
        let tour = Tour::new(vec![Node(0), Node(1), Node(1), Node(3)]);
        assert!(!tour.is_permutation_of(4));
    }
}
