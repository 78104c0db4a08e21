//! The base value types the bottleneck-objective search layer operates on: a read-only cost
//! matrix, the sorted list of distinct costs it contains, and the permutation-based [Tour] type.

use tsp_core::instance::{TSPSymInstance, distance::Distance, matrix::Matrix, node::Node};

mod problem_info;
mod tour;

pub use problem_info::ProblemInfo;
pub use tour::Tour;

/// Whether `cost` denotes a *fixed* edge: mandatory in any accepted tour, introduced only by
/// [crate::asym_reduction::build_symmetric_instance].
#[inline(always)]
pub fn is_fixed(cost: Distance) -> bool {
    cost.0 < 0
}

/// Read-only view over a complete weighted graph on `size` vertices.
///
/// `cost(i, i)` is never consulted. `symmetric == true` implies `cost(i, j) == cost(j, i)` for
/// all `i != j`, but the matrix is always stored densely row-major regardless, mirroring
/// `tsp-parser`'s `Matrix<Distance>`.
#[derive(Debug, Clone)]
pub struct CostMatrix {
    data: Vec<Distance>,
    size: usize,
    symmetric: bool,
}

impl CostMatrix {
    /// Panics if `data.len() != size * size`.
    pub fn from_dense_row_major(data: Vec<Distance>, size: usize, symmetric: bool) -> Self {
        assert_eq!(data.len(), size * size);
        Self {
            data,
            size,
            symmetric,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn symmetric(&self) -> bool {
        self.symmetric
    }

    #[inline(always)]
    pub fn cost(&self, from: Node, to: Node) -> Distance {
        self.data[from.0 * self.size + to.0]
    }

    #[inline(always)]
    pub fn is_fixed_edge(&self, from: Node, to: Node) -> bool {
        is_fixed(self.cost(from, to))
    }

    pub fn nodes(&self) -> impl Iterator<Item = Node> + Clone {
        (0..self.size).map(Node)
    }

    /// Total count of distinct fixed edges, i.e. the `n` of an `n`-node asymmetric instance
    /// routed through [crate::asym_reduction]. Zero for any instance without fixed edges.
    pub fn fixed_edge_count(&self) -> usize {
        let mut count = 0;
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if self.is_fixed_edge(Node(i), Node(j)) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Builds a dense symmetric [CostMatrix] from a parsed TSPLIB instance.
    pub fn from_sym_instance(instance: &TSPSymInstance) -> Self {
        let dimension = instance.metadata().dimension;
        let distances = instance.distance_matrix();
        let mut data = Vec::with_capacity(dimension * dimension);
        for i in 0..dimension {
            for j in 0..dimension {
                data.push(if i == j {
                    Distance(0)
                } else {
                    distances.get_data(Node(i), Node(j))
                });
            }
        }
        Self::from_dense_row_major(data, dimension, true)
    }

    /// Builds a dense (possibly asymmetric) [CostMatrix] from a parsed `EXPLICIT`/`FULL_MATRIX`
    /// TSPLIB instance.
    pub fn from_matrix(matrix: &Matrix<Distance>) -> Self {
        let dimension = matrix.dimension();
        Self::from_dense_row_major(matrix.data().to_vec(), dimension, false)
    }
}
