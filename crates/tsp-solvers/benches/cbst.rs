use std::collections::HashSet;

use criterion::{BatchSize::SmallInput, Criterion, criterion_group, criterion_main};
use tsp_core::instance::{distance::Distance, node::Node};
use tsp_solvers::{CostMatrix, bounds::cbst};

/// A synthetic grid-ish instance large enough to keep Prim's heap-driven loop busy.
fn synthetic_instance(dimension: usize) -> CostMatrix {
    let mut data = Vec::with_capacity(dimension * dimension);
    for i in 0..dimension {
        for j in 0..dimension {
            data.push(if i == j {
                Distance(0)
            } else {
                Distance(((i as i32 - j as i32).unsigned_abs() as i32) % 37 + 1)
            });
        }
    }
    CostMatrix::from_dense_row_major(data, dimension, true)
}

fn cbst_on_a_grid_instance(c: &mut Criterion) {
    let cost = synthetic_instance(200);
    c.bench_function("CBST bottleneck spanning tree on a 200-node instance", |b| {
        b.iter_batched(
            HashSet::<(Node, Node)>::new,
            |forbidden| cbst(&cost, &forbidden),
            SmallInput,
        )
    });
}

criterion_group!(cbst_bench, cbst_on_a_grid_instance);
criterion_main!(cbst_bench);
