use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use deepvisual_graph::{AdjacencyGraph, LouvainOptions, louvain};
use std::hint::black_box;
use std::time::Duration;

/// `cliques` complete subgraphs of `size` nodes, chained into a ring by single edges.
fn ring_of_cliques(cliques: u32, size: u32) -> AdjacencyGraph {
    let mut edges: Vec<(u32, u32)> = Vec::new();
    for c in 0..cliques {
        let base = c * size + 1;
        for a in 0..size {
            for b in (a + 1)..size {
                edges.push((base + a, base + b));
            }
        }
        let next = ((c + 1) % cliques) * size + 1;
        edges.push((base, next + size - 1));
    }
    AdjacencyGraph::from_edges([], edges)
}

/// Deterministic sparse graph: every node links to a few pseudo-random later nodes.
fn sparse_graph(nodes: u32, fanout: u32) -> AdjacencyGraph {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut edges: Vec<(u32, u32)> = Vec::new();
    for v in 1..=nodes {
        for _ in 0..fanout {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let w = 1 + (state % u64::from(nodes)) as u32;
            edges.push((v, w));
        }
    }
    AdjacencyGraph::from_edges(1..=nodes, edges)
}

fn bench_louvain(c: &mut Criterion) {
    let mut group = c.benchmark_group("louvain");
    group.measurement_time(Duration::from_secs(3));

    let cases = [
        ("ring_16x6", ring_of_cliques(16, 6)),
        ("ring_64x4", ring_of_cliques(64, 4)),
        ("sparse_300", sparse_graph(300, 3)),
    ];
    let opts = LouvainOptions::default();
    for (name, graph) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), graph, |b, g| {
            b.iter(|| louvain(black_box(g), black_box(&opts)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_louvain);
criterion_main!(benches);
