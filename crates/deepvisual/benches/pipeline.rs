use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use deepvisual::render::link_doublet;
use deepvisual::{LinkDoubletOptions, Row, Table};
use std::hint::black_box;
use std::time::Duration;

/// `entities` self-loops, a direct chain between neighbors, and indirect links between every
/// pair of consecutive direct relations.
fn chained_table(entities: u32) -> Table {
    let mut table = Table::default();
    for i in 1..=entities {
        table.push(Row::new(format!("e{i}"), format!("e{i}")));
    }
    for i in 1..entities {
        table.push(Row::new(format!("#{i}"), format!("#{}", i + 1)));
    }
    let first_direct = entities + 1;
    for k in 0..entities.saturating_sub(2) {
        let a = first_direct + k;
        table.push(Row::new(format!("#{a}"), format!("#{}", a + 1)));
    }
    table
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("link_doublet");
    group.measurement_time(Duration::from_secs(3));

    let plain = LinkDoubletOptions::default();
    let clustered = LinkDoubletOptions {
        cluster: true,
        ..Default::default()
    };
    for entities in [16u32, 128] {
        let table = chained_table(entities);
        group.bench_with_input(BenchmarkId::new("plan", entities), &table, |b, t| {
            b.iter(|| link_doublet(black_box(t), black_box(&plain)))
        });
        group.bench_with_input(BenchmarkId::new("clustered", entities), &table, |b, t| {
            b.iter(|| link_doublet(black_box(t), black_box(&clustered)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
