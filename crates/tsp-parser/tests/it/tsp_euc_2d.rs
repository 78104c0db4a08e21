use std::io::Write;

use tsp_core::instance::{distance::Distance, node::Node};

/// Four points forming a 3-4-5 rectangle, so every pairwise `EUC_2D` distance rounds to an
/// integer with no rounding ambiguity.
const FIXTURE: &str = "\
NAME: rectangle4
TYPE: TSP
DIMENSION: 4
EDGE_WEIGHT_TYPE: EUC_2D
NODE_COORD_SECTION
1 0 0
2 0 3
3 4 3
4 4 0
EOF
";

#[test]
fn parses_node_coord_section_into_a_symmetric_instance() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rectangle4.tsp");
    std::fs::File::create(&path).unwrap().write_all(FIXTURE.as_bytes()).unwrap();

    let instance = tsp_parser::parse_tsp_instance(&path).unwrap();

    assert_eq!(instance.metadata().name, "rectangle4");
    assert_eq!(instance.metadata().dimension, 4);

    let distances = instance.distance_matrix();
    assert_eq!(distances.get_data(Node(0), Node(1)), Distance(3));
    assert_eq!(distances.get_data(Node(1), Node(2)), Distance(4));
    assert_eq!(distances.get_data(Node(0), Node(2)), Distance(5));
    assert_eq!(distances.get_data(Node(2), Node(3)), Distance(3));
}

#[test]
fn rejects_a_file_with_no_data_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.tsp");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(b"NAME: truncated\nTYPE: TSP\nDIMENSION: 4\nEDGE_WEIGHT_TYPE: EUC_2D\n")
        .unwrap();

    assert!(tsp_parser::parse_tsp_instance(&path).is_err());
}
