//! Benchmarks for primal/dual inference and timeline rendering.
//!
//! Run with:
//! ```bash
//! cargo bench --bench inference
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use tdvisu_rs::infer::{infer_dual, infer_primal};
use tdvisu_rs::model::{Hyperedge, IncidenceGraph};
use tdvisu_rs::visualization::Visualization;

/// Random 3-CNF with `clauses` clauses over `vars` variables.
fn random_cnf(seed: u64, vars: i32, clauses: u32) -> IncidenceGraph {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let edges = (1..=clauses)
        .map(|id| {
            let members: Vec<i32> = (0..3)
                .map(|_| {
                    let var = rng.random_range(1..=vars);
                    if rng.random_bool(0.5) {
                        -var
                    } else {
                        var
                    }
                })
                .collect();
            Hyperedge::new(id, members)
        })
        .collect();
    IncidenceGraph::new(edges).unwrap()
}

// ============================================================================
// Benchmark: Primal and dual inference
// ============================================================================

fn bench_infer(c: &mut Criterion) {
    let mut group = c.benchmark_group("infer");

    for clauses in [1_000u32, 10_000, 100_000] {
        let vars = (clauses / 4) as i32;
        let incidence = random_cnf(42, vars, clauses);

        group.throughput(Throughput::Elements(clauses as u64));
        group.bench_with_input(BenchmarkId::new("primal", clauses), &incidence, |b, incidence| {
            b.iter(|| infer_primal(incidence).edge_count());
        });
        group.bench_with_input(BenchmarkId::new("dual", clauses), &incidence, |b, incidence| {
            b.iter(|| infer_dual(incidence).edge_count());
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Rendering a long timeline
// ============================================================================

/// A path decomposition of `n` bags, visited twice (up and down) with tables.
fn path_document(n: u32) -> String {
    let labeldict: Vec<String> = (1..=n)
        .map(|id| format!(r#"{{"id": {}, "items": [{}, {}], "labels": ["[{}, {}]"]}}"#, id, id, id + 1, id, id + 1))
        .collect();
    let edges: Vec<String> = (2..=n).map(|id| format!("[{}, {}]", id, id - 1)).collect();
    let clauses: Vec<String> = (1..=n)
        .map(|id| format!(r#"{{"id": {}, "list": [{}, -{}]}}"#, id, id, id + 1))
        .collect();
    let steps: Vec<String> = (1..=n)
        .rev()
        .chain(1..=n)
        .map(|id| format!(r#"[{}, [[["v{}", "n"], [0, 1], [1, 2]], "sol bag {}", null, true]]"#, id, id, id))
        .collect();
    format!(
        r#"{{"treeDecJson": {{"bagpre": "bag %s", "num_vars": {}, "edgearray": [{}], "labeldict": [{}]}},
            "incidenceGraph": {{"edges": [{}], "infer_primal": true, "infer_dual": true}},
            "summary": "sum",
            "tdTimeline": [{}]}}"#,
        n + 1,
        edges.join(", "),
        labeldict.join(", "),
        clauses.join(", "),
        steps.join(", ")
    )
}

fn bench_snapshots(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshots");

    for n in [10u32, 50, 100] {
        let json = path_document(n);
        let visualization = Visualization::from_json(&json).unwrap();

        group.throughput(Throughput::Elements(2 * n as u64));
        group.bench_with_input(BenchmarkId::new("path", n), &visualization, |b, visualization| {
            b.iter(|| visualization.snapshots().len());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_infer, bench_snapshots);
criterion_main!(benches);
