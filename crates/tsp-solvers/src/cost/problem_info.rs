use tsp_core::instance::distance::Distance;

use super::CostMatrix;

/// The in-order, duplicate-free list of every distinct non-fixed cost appearing in a
/// [CostMatrix]. Built once per base instance and shared by every transform and lower-bound
/// routine that needs an `index_of` lookup.
#[derive(Debug, Clone)]
pub struct ProblemInfo {
    cost_list: Vec<Distance>,
}

impl ProblemInfo {
    pub fn build(cost: &CostMatrix) -> Self {
        let size = cost.size();
        let mut costs = Vec::with_capacity(size * size);

        for i in cost.nodes() {
            for j in cost.nodes() {
                if i == j {
                    continue;
                }
                let c = cost.cost(i, j);
                if !super::is_fixed(c) {
                    costs.push(c);
                }
            }
        }

        costs.sort();
        costs.dedup();

        Self { cost_list: costs }
    }

    pub fn cost_list(&self) -> &[Distance] {
        &self.cost_list
    }

    pub fn min_cost(&self) -> Distance {
        self.cost_list[0]
    }

    pub fn max_cost(&self) -> Distance {
        *self.cost_list.last().expect("cost_list is never empty for a non-trivial instance")
    }

    pub fn len(&self) -> usize {
        self.cost_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cost_list.is_empty()
    }

    /// O(log n) lookup of `cost`'s position in `cost_list`.
    pub fn index_of(&self, cost: Distance) -> Option<usize> {
        self.cost_list.binary_search(&cost).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_of_round_trips_for_every_cost() {
        let data = vec![
            Distance(0), Distance(1), Distance(3), Distance(2),
            Distance(1), Distance(0), Distance(4), Distance(5),
            Distance(3), Distance(4), Distance(0), Distance(6),
            Distance(2), Distance(5), Distance(6), Distance(0),
        ];
        let cost = CostMatrix::from_dense_row_major(data, 4, true);
        let info = ProblemInfo::build(&cost);

        assert_eq!(info.min_cost(), Distance(1));
        assert_eq!(info.max_cost(), Distance(6));

        for i in cost.nodes() {
            for j in cost.nodes() {
                if i == j {
                    continue;
                }
                let c = cost.cost(i, j);
                let idx = info.index_of(c).expect("every matrix entry is in cost_list");
                assert_eq!(info.cost_list()[idx], c);
            }
        }
    }
}
