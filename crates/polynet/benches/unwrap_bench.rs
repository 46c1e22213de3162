//! Criterion benches for adjacency building and unwrapping.
//!
//! - Platonic solids (fixed inputs).
//! - Random prisms with n in {4, 16, 64, 256} sides.
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use polynet::geom2::BBox2;
use polynet::shapes::{
    self,
    rand::{random_prism, PrismCfg, ReplayToken, VertexCount},
};
use polynet::unwrap::{unwrap, UnwrapCfg};

fn bench_solids(c: &mut Criterion) {
    let mut group = c.benchmark_group("unwrap_solids");
    for (name, poly) in [
        ("cube", shapes::cube(1.0)),
        ("icosahedron", shapes::icosahedron()),
        ("dodecahedron", shapes::dodecahedron()),
    ] {
        group.bench_function(BenchmarkId::new("adjacency", name), |b| {
            b.iter(|| poly.adjacency())
        });
        group.bench_function(BenchmarkId::new("unwrap", name), |b| {
            b.iter(|| unwrap(&poly, &UnwrapCfg::default()).unwrap())
        });
    }
    group.finish();
}

fn bench_prisms(c: &mut Criterion) {
    let mut group = c.benchmark_group("unwrap_prism");
    for &n in &[4usize, 16, 64, 256] {
        let cfg = PrismCfg {
            vertex_count: VertexCount::Fixed(n),
            ..PrismCfg::default()
        };
        let poly = random_prism(cfg, ReplayToken { seed: 7, index: n as u64 });
        group.bench_with_input(BenchmarkId::new("unwrap", n), &poly, |b, poly| {
            b.iter(|| unwrap(poly, &UnwrapCfg::default()).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("unwrap_fit", n), &poly, |b, poly| {
            b.iter_batched(
                || unwrap(poly, &UnwrapCfg::default()).unwrap().0,
                |mut net| {
                    net.fit_to_rect(&BBox2::from_size(210.0, 297.0), 10.0);
                    net.apply_transform(None);
                    net
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_solids, bench_prisms);
criterion_main!(benches);
