use std::io::Write;

use tsp_core::instance::{distance::Distance, node::Node};

/// A 3-node asymmetric instance: `C(i,j) != C(j,i)` for at least one pair.
const FIXTURE: &str = "\
NAME: tiny_atsp
TYPE: ATSP
DIMENSION: 3
EDGE_WEIGHT_TYPE: EXPLICIT
EDGE_WEIGHT_FORMAT: FULL_MATRIX
EDGE_WEIGHT_SECTION
0 1 9
5 0 2
3 7 0
EOF
";

#[test]
fn parses_a_full_matrix_into_an_asymmetric_matrix() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny_atsp.atsp");
    std::fs::File::create(&path).unwrap().write_all(FIXTURE.as_bytes()).unwrap();

    let (metadata, matrix) = tsp_parser::parse_atsp_instance(&path).unwrap();

    assert_eq!(metadata.dimension, 3);
    assert_eq!(matrix.get_data(Node(0), Node(1)), Distance(1));
    assert_eq!(matrix.get_data(Node(1), Node(0)), Distance(5));
    assert_ne!(
        matrix.get_data(Node(0), Node(1)),
        matrix.get_data(Node(1), Node(0))
    );
    assert_eq!(matrix.get_data(Node(2), Node(1)), Distance(7));
}
