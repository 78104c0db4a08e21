use std::io::Write;

use criterion::{BatchSize::SmallInput, Criterion, criterion_group, criterion_main};

/// Builds a `dimension`-city `EUC_2D` instance on a grid spiral, large enough to exercise the
/// hot parsing loop without needing a checked-in TSPLIB fixture file.
fn synthetic_instance(dimension: usize) -> String {
    let mut body = String::new();
    body.push_str("NAME: synthetic\n");
    body.push_str("TYPE: TSP\n");
    body.push_str(&format!("DIMENSION: {dimension}\n"));
    body.push_str("EDGE_WEIGHT_TYPE: EUC_2D\n");
    body.push_str("NODE_COORD_SECTION\n");
    for i in 0..dimension {
        let angle = i as f64 * 0.37;
        let radius = i as f64;
        let x = (radius * angle.cos()) as i64;
        let y = (radius * angle.sin()) as i64;
        body.push_str(&format!("{} {} {}\n", i + 1, x, y));
    }
    body.push_str("EOF\n");
    body
}

fn parse_into_symmetric_matrix(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("synthetic_500.tsp");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(synthetic_instance(500).as_bytes())
        .unwrap();

    c.bench_function("parse a 500-city EUC_2D instance", |b| {
        b.iter_batched(
            || path.clone(),
            |path| tsp_parser::parse_tsp_instance(path).unwrap(),
            SmallInput,
        )
    });
}

criterion_group!(parse_into_matrix, parse_into_symmetric_matrix);
criterion_main!(parse_into_matrix);
