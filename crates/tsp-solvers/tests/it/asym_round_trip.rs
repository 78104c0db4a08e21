use tsp_core::instance::distance::Distance;
use tsp_solvers::CostMatrix;
use tsp_solvers::asym_reduction::{build_symmetric_instance, recover};

/// A 4-node asymmetric instance with no symmetric shortcut: each directed pair has a distinct
/// cost in either direction.
fn asym_square() -> CostMatrix {
    let data = vec![
        Distance(0), Distance(2), Distance(9), Distance(4),
        Distance(3), Distance(0), Distance(1), Distance(7),
        Distance(8), Distance(2), Distance(0), Distance(5),
        Distance(6), Distance(3), Distance(4), Distance(0),
    ];
    CostMatrix::from_dense_row_major(data, 4, false)
}

#[test]
fn every_real_node_is_adjacent_to_its_own_ghost() {
    let asym = asym_square();
    let sym = build_symmetric_instance(&asym, Distance(1_000));

    assert_eq!(sym.size(), 8);
    assert!(sym.symmetric());
    for real in 0..4 {
        let ghost = real + 4;
        assert!(sym.is_fixed_edge(
            tsp_core::instance::node::Node(ghost),
            tsp_core::instance::node::Node(real)
        ));
    }
}

#[test]
#[should_panic(expected = "not adjacent to its ghost")]
fn recovering_a_tour_that_skips_a_fixed_edge_panics() {
    use tsp_core::instance::node::Node;
    use tsp_solvers::Tour;

    // A bogus 8-node tour where node 0 never sits next to its own ghost (node 4).
    let bogus = Tour::new(vec![
        Node(0), Node(1), Node(4), Node(5), Node(2), Node(6), Node(3), Node(7),
    ]);

    recover(&bogus, 4);
}
