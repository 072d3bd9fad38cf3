use criterion::{criterion_group, criterion_main, Criterion, black_box};
use common_money::minor_to_major;

fn bench_render(c: &mut Criterion) {
    let samples: Vec<i64> = vec![1, 10, 99, 100, 1050, 12345, 999_999, 100_000_001];
    c.bench_function("minor_to_major_render", |b| {
        b.iter(|| {
            for v in &samples { black_box(minor_to_major(*v).to_string()); }
        });
    });
}

fn bench_bulk(c: &mut Criterion) {
    let samples: Vec<i64> = (1..500).map(|i| i * 37).collect();
    c.bench_function("minor_to_major_bulk", |b| {
        b.iter(|| {
            for v in &samples { black_box(minor_to_major(*v)); }
        });
    });
}

criterion_group!(rendering, bench_render, bench_bulk);
criterion_main!(rendering);
