use criterion::{Criterion, criterion_group, criterion_main};
use tsp_core::instance::{distance::Distance, matrix::Matrix, node::Node};
use tsp_solvers::held_karp::held_karp;

/// A small synthetic asymmetric-looking (but here symmetric) distance matrix: Held-Karp is
/// exponential, so the benchmark stays at a size the DP table can hold comfortably.
fn synthetic_matrix(dimension: usize) -> Matrix<Distance> {
    Matrix::slow_new_from_distance_function(dimension, |i: Node, j: Node| {
        if i == j {
            Distance(0)
        } else {
            let diff = (i.0 as i32 - j.0 as i32).abs();
            Distance(diff * diff + 1)
        }
    })
}

fn held_karp_on_12_cities(c: &mut Criterion) {
    let matrix = synthetic_matrix(12);
    c.bench_function("Held-Karp on a synthetic 12-city instance", |b| {
        b.iter(|| held_karp(&matrix).unwrap())
    });
}

criterion_group!(
    name = held_karp_bench;
    config = Criterion::default().sample_size(10);
    targets = held_karp_on_12_cities
);
criterion_main!(held_karp_bench);
