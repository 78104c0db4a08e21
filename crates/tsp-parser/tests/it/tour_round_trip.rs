use tsp_parser::tour::{parse_tour_file, write_tour_file};

#[test]
fn round_trips_a_tour_through_tsplib_tour_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rectangle4.tour");
    let original = vec![0usize, 1, 2, 3];

    write_tour_file(&path, "rectangle4", &original).unwrap();
    let parsed = parse_tour_file(&path).unwrap();

    assert_eq!(parsed, original);
}

#[test]
fn missing_tour_section_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_section.tour");
    std::fs::write(&path, "NAME: empty\nTYPE: TOUR\nDIMENSION: 0\nEOF\n").unwrap();

    assert!(parse_tour_file(&path).is_err());
}
