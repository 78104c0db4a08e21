use tsp_core::instance::{InstanceMetadata, distance::Distance, matrix::MatrixSym};

use super::ParseFromTSPLib;
use crate::distance_container::find_row_column_from_lower_triangle_index;

const PARALLELISM_BOUND: usize = 100_000;

impl ParseFromTSPLib for MatrixSym<Distance> {
    fn from_node_coord_section<PointType: Sync + Send>(
        node_data: &Vec<PointType>,
        metadata: &InstanceMetadata,
        distance_function: impl Fn(&PointType, &PointType) -> Distance + Sync + Send + Copy,
    ) -> Self {
        compute_dists_from_node_coords(node_data, metadata.dimension, distance_function)
    }

    /// Extracts the lower triangle from a dense explicit matrix.
    ///
    /// The upper triangle is discarded; callers are expected to only reach for this container
    /// when the instance is actually symmetric (irrelevant of whether the upper and lower
    /// triangles happened to match in the source file).
    fn from_explicit_matrix(weights: Vec<Distance>, dimension: usize) -> Self {
        MatrixSym::new_from_distance_function(dimension, |from, to| {
            weights[from.0 * dimension + to.0]
        })
    }
}

fn compute_dists_from_node_coords<PointType: Send + Sync>(
    point_data: &[PointType],
    dimension: usize,
    distance_function: impl Fn(&PointType, &PointType) -> Distance + Sync + Send + Copy,
) -> MatrixSym<Distance> {
    let number_of_entries = (dimension * (dimension + 1)) / 2;
    let mut distance_data = vec![Distance(0); number_of_entries];

    if number_of_entries < PARALLELISM_BOUND {
        compute_dists_from_node_coords_chunk(
            &mut distance_data,
            point_data,
            0,
            number_of_entries,
            distance_function,
        );
    } else {
        let nthreads = std::thread::available_parallelism().unwrap();
        let entries_per_chunk = number_of_entries.div_ceil(nthreads.get());

        std::thread::scope(|scope| {
            let mut first_entry_index = 0;
            let mut rest_distances = distance_data.as_mut_slice();
            while first_entry_index < number_of_entries {
                let chunk_len = entries_per_chunk.min(number_of_entries - first_entry_index);
                let (chunk, rest_tmp) = rest_distances.split_at_mut(chunk_len);
                rest_distances = rest_tmp;

                scope.spawn(move || {
                    compute_dists_from_node_coords_chunk(
                        chunk,
                        point_data,
                        first_entry_index,
                        chunk_len,
                        distance_function,
                    )
                });

                first_entry_index += chunk_len;
            }
        });
    }

    MatrixSym::new(distance_data, dimension)
}

#[inline(always)]
fn compute_dists_from_node_coords_chunk<PointType>(
    chunk: &mut [Distance],
    point_data: &[PointType],
    first_entry_index: usize,
    number_of_entries_in_chunk: usize,
    distance_function: impl Fn(&PointType, &PointType) -> Distance + Copy,
) {
    for (offset, entry) in chunk.iter_mut().enumerate().take(number_of_entries_in_chunk) {
        let (row, column) = find_row_column_from_lower_triangle_index(first_entry_index + offset);
        *entry = if row == column {
            Distance(0)
        } else {
            distance_function(&point_data[row], &point_data[column])
        };
    }
}
