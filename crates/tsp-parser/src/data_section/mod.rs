/// Module for parsing distance data sections from TSP instance files.
///
/// According to TSPLIB95, distance data can be represented in various formats,
/// such as explicit distance matrices or coordinate-based representations.
///
/// Distance values are required to be non-negative integers. Computations are expected to be
/// carried out in double precision arithmetic, i.e. `f64` in Rust.
use memchr::memchr;
use memmap2::Mmap;
use tsp_core::{
    instance::{InstanceMetadata, distance::Distance},
    tsp_lib_spec::{EdgeWeightFormat, EdgeWeightType, TSPDataKeyword},
};

pub(crate) mod distance_function;

use crate::{
    FileContent,
    data_section::distance_function::{euclidean_distance_2d, geographical_distance},
    distance_container::ParseFromTSPLib,
};

/// A point in 2D space.
#[derive(Debug, Clone, Copy)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

/// A point in 3D space.
#[derive(Debug, Clone, Copy)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A point in geographical latitude and longitude radiance coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

pub fn parse_data_sections<DistanceContainer: ParseFromTSPLib>(
    file_content: &FileContent,
    index_in_map: &mut usize,
    data_keyword: TSPDataKeyword,
    metadata: &InstanceMetadata,
) -> DistanceContainer {
    match metadata.edge_weight_type {
        // The distance function is not chosen via a match statement here because the compiler
        // does not seem to inline the distance function properly in that case
        // (leading to a big performance hit)
        EdgeWeightType::EUC_2D => {
            let distance_function = euclidean_distance_2d;
            let node_data = parse_2d_node_coord_section(file_content, index_in_map, metadata);
            DistanceContainer::from_node_coord_section(&node_data, metadata, distance_function)
        }
        EdgeWeightType::MAX_2D => {
            let distance_function = distance_function::max_distance_2d;
            let node_data = parse_2d_node_coord_section(file_content, index_in_map, metadata);
            DistanceContainer::from_node_coord_section(&node_data, metadata, distance_function)
        }
        EdgeWeightType::MAN_2D => {
            let distance_function = distance_function::manhattan_distance_2d;
            let node_data = parse_2d_node_coord_section(file_content, index_in_map, metadata);
            DistanceContainer::from_node_coord_section(&node_data, metadata, distance_function)
        }
        EdgeWeightType::CEIL_2D => {
            let distance_function = distance_function::ceil_distance_2d;
            let node_data = parse_2d_node_coord_section(file_content, index_in_map, metadata);
            DistanceContainer::from_node_coord_section(&node_data, metadata, distance_function)
        }
        EdgeWeightType::ATT => {
            let distance_function = distance_function::att_distance_2d;
            let node_data = parse_2d_node_coord_section(file_content, index_in_map, metadata);
            DistanceContainer::from_node_coord_section(&node_data, metadata, distance_function)
        }
        EdgeWeightType::GEO => {
            let distance_function = geographical_distance;
            // TODO(perf): Possibly parallelize the conversion to geo coordinates
            let node_data = parse_2d_node_coord_section(file_content, index_in_map, metadata)
                .into_iter()
                .map(|point| distance_function::convert_to_geo_coordinates(&point))
                .collect::<Vec<GeoPoint>>();
            DistanceContainer::from_node_coord_section(&node_data, metadata, distance_function)
        }
        EdgeWeightType::EUC_3D => {
            let distance_function = distance_function::euclidean_distance_3d;
            let node_data = parse_3d_node_coord_section(file_content, index_in_map, metadata);
            DistanceContainer::from_node_coord_section(&node_data, metadata, distance_function)
        }
        EdgeWeightType::MAX_3D => {
            let distance_function = distance_function::max_distance_3d;
            let node_data = parse_3d_node_coord_section(file_content, index_in_map, metadata);
            DistanceContainer::from_node_coord_section(&node_data, metadata, distance_function)
        }
        EdgeWeightType::MAN_3D => {
            let distance_function = distance_function::manhattan_distance_3d;
            let node_data = parse_3d_node_coord_section(file_content, index_in_map, metadata);
            DistanceContainer::from_node_coord_section(&node_data, metadata, distance_function)
        }
        EdgeWeightType::EXPLICIT => {
            let format = metadata
                .edge_weight_format
                .expect("EXPLICIT edge weight type requires an EDGE_WEIGHT_FORMAT");
            let full_matrix =
                parse_explicit_weight_section(file_content, index_in_map, metadata.dimension, format);
            DistanceContainer::from_explicit_matrix(full_matrix, metadata.dimension)
        }
        _ => unimplemented!(
            "Node coordinate type {:?} is not yet implemented",
            metadata.node_coord_type
        ),
    }
}

fn parse_2d_node_coord_section(
    file_content: &FileContent,
    index_in_map: &mut usize,
    metadata: &InstanceMetadata,
) -> Vec<Point2D> {
    let mut point_data: Vec<Point2D> = Vec::with_capacity(metadata.dimension);

    // Read a line to test if the point data is floating point or integer
    let is_float_data = is_float_data(file_content, index_in_map);

    while let Some(index_newline) = memchr(b'\n', &file_content[*index_in_map..]) {
        let line = &file_content[*index_in_map..*index_in_map + index_newline];
        // SAFETY: The TSP instance file is expected to be valid UTF-8
        let line_str = unsafe { std::str::from_utf8_unchecked(line) };
        let line_str = line_str.trim();

        // Move the index to the start of the next line (+1 for the newline character)
        *index_in_map += index_newline + 1;

        // Check if end of file is reached
        if line_str == "EOF" || line_str.is_empty() {
            break;
        }

        let point = parse_line_to_2d_point(line_str, is_float_data);

        point_data.push(point);
    }

    point_data
}

fn parse_3d_node_coord_section(
    file_content: &FileContent,
    index_in_map: &mut usize,
    metadata: &InstanceMetadata,
) -> Vec<Point3D> {
    let mut point_data: Vec<Point3D> = Vec::with_capacity(metadata.dimension);

    // Read a line to test if the point data is floating point or integer
    let is_float_data = is_float_data(file_content, index_in_map);

    while let Some(index_newline) = memchr(b'\n', &file_content[*index_in_map..]) {
        let line = &file_content[*index_in_map..*index_in_map + index_newline];
        // SAFETY: The TSP instance file is expected to be valid UTF-8
        let line_str = unsafe { std::str::from_utf8_unchecked(line) };

        // Move the index to the start of the next line (+1 for the newline character)
        *index_in_map += index_newline + 1;

        // Check if end of file is reached
        if line_str == "EOF" {
            break;
        }

        let point = parse_line_to_3d_point(line_str, is_float_data);

        point_data.push(point);
    }

    point_data
}

#[inline(always)]
fn parse_line_to_2d_point(line_str: &str, is_float_data: bool) -> Point2D {
    // We assume the input to be split by ascii whitespace
    let mut parts = line_str.split_ascii_whitespace();
    let _node_index = parts.next();

    let x_str = parts.next().expect("Missing x coordinate");
    let y_str = parts.next().expect("Missing y coordinate");
    let (x, y) = if is_float_data {
        (
            x_str
                .parse::<f64>()
                .expect("x coordinate should always be a valid f64 floating point number"),
            y_str
                .parse::<f64>()
                .expect("y coordinate should always be a valid f64 floating point number"),
        )
    } else {
        (
            x_str
                .parse::<u64>()
                .expect("x coordinate should be a valid u64 integer by sampling first line")
                as f64,
            y_str
                .parse::<u64>()
                .expect("y coordinate should be a valid u64 integer by sampling first line")
                as f64,
        )
    };

    Point2D { x, y }
}

#[inline(always)]
fn parse_line_to_3d_point(line_str: &str, is_float_data: bool) -> Point3D {
    // We assume the input to be split by ascii whitespace
    let mut parts = line_str.split_ascii_whitespace();
    let _node_index = parts.next();

    let x_str = parts.next().expect("Missing x coordinate");
    let y_str = parts.next().expect("Missing y coordinate");
    let z_str = parts.next().expect("Missing z coordinate");
    let (x, y, z) = if is_float_data {
        (
            x_str
                .parse::<f64>()
                .expect("x coordinate should always be a valid f64 floating point number"),
            y_str
                .parse::<f64>()
                .expect("y coordinate should always be a valid f64 floating point number"),
            z_str
                .parse::<f64>()
                .expect("z coordinate should always be a valid f64 floating point number"),
        )
    } else {
        (
            x_str
                .parse::<u64>()
                .expect("x coordinate should be a valid u64 integer by sampling first line")
                as f64,
            y_str
                .parse::<u64>()
                .expect("y coordinate should be a valid u64 integer by sampling first line")
                as f64,
            z_str
                .parse::<u64>()
                .expect("z coordinate should be a valid u64 integer by sampling first line")
                as f64,
        )
    };

    Point3D { x, y, z }
}

/// Parses an EDGE_WEIGHT_SECTION into a dense, row-major weight matrix according to the given
/// `EDGE_WEIGHT_FORMAT`.
///
/// TSPLIB95 allows entries to be wrapped across multiple lines, so this reads whitespace
/// separated tokens rather than relying on one entry per line.
fn parse_explicit_weight_section(
    file_content: &FileContent,
    index_in_map: &mut usize,
    dimension: usize,
    format: EdgeWeightFormat,
) -> Vec<Distance> {
    match format {
        EdgeWeightFormat::FULL_MATRIX => {
            read_weight_tokens(file_content, index_in_map, dimension * dimension)
        }
        EdgeWeightFormat::UPPER_ROW => {
            let count = dimension * (dimension.saturating_sub(1)) / 2;
            let values = read_weight_tokens(file_content, index_in_map, count);
            expand_triangular_weights(&values, dimension, false, false)
        }
        EdgeWeightFormat::LOWER_ROW => {
            let count = dimension * (dimension.saturating_sub(1)) / 2;
            let values = read_weight_tokens(file_content, index_in_map, count);
            expand_triangular_weights(&values, dimension, true, false)
        }
        EdgeWeightFormat::UPPER_DIAG_ROW => {
            let count = dimension * (dimension + 1) / 2;
            let values = read_weight_tokens(file_content, index_in_map, count);
            expand_triangular_weights(&values, dimension, false, true)
        }
        EdgeWeightFormat::LOWER_DIAG_ROW => {
            let count = dimension * (dimension + 1) / 2;
            let values = read_weight_tokens(file_content, index_in_map, count);
            expand_triangular_weights(&values, dimension, true, true)
        }
        EdgeWeightFormat::UPPER_COL
        | EdgeWeightFormat::LOWER_COL
        | EdgeWeightFormat::UPPER_DIAG_COL
        | EdgeWeightFormat::LOWER_DIAG_COL => {
            unimplemented!("Column-major EDGE_WEIGHT_FORMAT values are not supported")
        }
        EdgeWeightFormat::FUNCTION => {
            unimplemented!("FUNCTION edge weight format has no EDGE_WEIGHT_SECTION to parse")
        }
    }
}

/// Reads whitespace-separated integer tokens from the data section until `count` tokens have
/// been collected or EOF is reached.
fn read_weight_tokens(
    file_content: &FileContent,
    index_in_map: &mut usize,
    count: usize,
) -> Vec<Distance> {
    let mut values = Vec::with_capacity(count);

    while values.len() < count {
        let index_newline = memchr(b'\n', &file_content[*index_in_map..])
            .expect("The data section should not be empty");
        let line = &file_content[*index_in_map..*index_in_map + index_newline];
        // SAFETY: The TSP instance file is expected to be valid UTF-8
        let line_str = unsafe { std::str::from_utf8_unchecked(line) };

        *index_in_map += index_newline + 1;

        let line_str = line_str.trim();
        if line_str == "EOF" {
            break;
        }

        for token in line_str.split_ascii_whitespace() {
            values.push(Distance(
                token
                    .parse()
                    .expect("explicit edge weight should be a valid integer"),
            ));
        }
    }

    values
}

/// Expands a sequential list of triangular-matrix entries (as read row-by-row) into a dense,
/// symmetric, row-major `dimension x dimension` matrix.
fn expand_triangular_weights(
    values: &[Distance],
    dimension: usize,
    lower: bool,
    diag: bool,
) -> Vec<Distance> {
    let mut matrix = vec![Distance(0); dimension * dimension];
    let mut index = 0;

    for row in 0..dimension {
        let columns: Box<dyn Iterator<Item = usize>> = if lower {
            let end = if diag { row + 1 } else { row };
            Box::new(0..end)
        } else {
            let start = if diag { row } else { row + 1 };
            Box::new(start..dimension)
        };

        for column in columns {
            let value = values[index];
            index += 1;
            matrix[row * dimension + column] = value;
            matrix[column * dimension + row] = value;
        }
    }

    matrix
}

#[inline(always)]
fn is_float_data(file_content: &FileContent, index_in_map: &usize) -> bool {
    let index_newline = memchr(b'\n', &file_content[*index_in_map..])
        .expect("The data section should not be empty");
    let line = &file_content[*index_in_map..*index_in_map + index_newline];

    // SAFETY: The TSP instance file is expected to be valid UTF-8
    let line_str = unsafe { std::str::from_utf8_unchecked(line) };

    // We assume the input to be split by ascii whitespace
    let mut parts = line_str.split_ascii_whitespace();
    let _node_index = parts.next();

    let x_str = parts.next().expect("Missing x coordinate");
    x_str.contains('.')
}
