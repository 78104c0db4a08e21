use tsp_core::instance::{InstanceMetadata, distance::Distance};

mod matrix;
mod matrix_sym;

pub trait ParseFromTSPLib {
    fn from_node_coord_section<PointType: Sync + Send>(
        node_data: &Vec<PointType>,
        metadata: &InstanceMetadata,
        distance_function: impl Fn(&PointType, &PointType) -> Distance + Sync + Send + Copy,
    ) -> Self;

    /// Builds the container from a fully expanded (dense, row-major) explicit weight matrix,
    /// as parsed from an EDGE_WEIGHT_SECTION.
    fn from_explicit_matrix(weights: Vec<Distance>, dimension: usize) -> Self;
}

fn find_row_column_from_lower_triangle_index(index: usize) -> (usize, usize) {
    let row = (-0.5 + ((0.25 + 2.0 * index as f64).sqrt())).floor() as usize;
    let column = index - (row * (row + 1)) / 2;
    (row, column)
}
