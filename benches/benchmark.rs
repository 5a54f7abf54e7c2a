use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pmc_td::exact::MTDecomposer;
use pmc_td::graph::{Bag, BaseGraph, BitGraph};
use pmc_td::solver::Solver;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn petersen() -> BitGraph {
    let mut graph = BitGraph::new(10);
    for i in 0..5 {
        graph.add_edge(i, (i + 1) % 5);
        graph.add_edge(i, i + 5);
        graph.add_edge(i + 5, (i + 2) % 5 + 5);
    }
    graph
}

fn grid(rows: usize, columns: usize) -> BitGraph {
    let mut graph = BitGraph::new(rows * columns);
    for r in 0..rows {
        for c in 0..columns {
            let v = r * columns + c;
            if c + 1 < columns {
                graph.add_edge(v, v + 1);
            }
            if r + 1 < rows {
                graph.add_edge(v, v + columns);
            }
        }
    }
    graph
}

fn random_graph(n: usize, p: f64, seed: u64) -> BitGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = BitGraph::new(n);
    for v in 1..n {
        let u = rng.gen_range(0..v);
        graph.add_edge(u, v);
    }
    for u in 0..n {
        for v in u + 1..n {
            if rng.gen_bool(p) {
                graph.add_edge(u, v);
            }
        }
    }
    graph
}

fn decompose(graph: &BitGraph) -> usize {
    let mut bag = Bag::new(graph.clone());
    let lower_bound = graph.min_degree();
    MTDecomposer::new(&mut bag, lower_bound, graph.order() - 1)
        .decompose()
        .unwrap()
}

fn exact(c: &mut Criterion) {
    let graph = petersen();
    c.bench_function("mt_decomposer_petersen", |b| {
        b.iter(|| decompose(black_box(&graph)))
    });

    let graph = grid(5, 5);
    c.bench_function("mt_decomposer_grid_5x5", |b| {
        b.iter(|| decompose(black_box(&graph)))
    });

    let graph = random_graph(25, 0.15, 1);
    c.bench_function("mt_decomposer_random_25", |b| {
        b.iter(|| decompose(black_box(&graph)))
    });
}

fn solver(c: &mut Criterion) {
    let graph = random_graph(30, 0.1, 2);
    c.bench_function("solver_random_30", |b| {
        b.iter(|| Solver::default().solve(black_box(&graph)).unwrap())
    });
}

criterion_group!(benches, exact, solver);
criterion_main!(benches);
