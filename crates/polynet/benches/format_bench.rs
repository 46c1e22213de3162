//! Criterion benches for text rendering and parsing of each format.
//!
//! Input: a 128-sided random prism, plus its unwrapped net for the native net syntax.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use polynet::format::{parse_net, render_net, Format};
use polynet::shapes::rand::{random_prism, PrismCfg, ReplayToken, VertexCount};
use polynet::unwrap::{unwrap, UnwrapCfg};

fn bench_formats(c: &mut Criterion) {
    let cfg = PrismCfg {
        vertex_count: VertexCount::Fixed(128),
        ..PrismCfg::default()
    };
    let poly = random_prism(cfg, ReplayToken { seed: 3, index: 0 });
    let mut group = c.benchmark_group("format");
    for fmt in Format::ALL {
        let text = fmt.render(&poly).unwrap();
        group.bench_function(BenchmarkId::new("render", fmt.name()), |b| {
            b.iter(|| fmt.render(&poly).unwrap())
        });
        group.bench_function(BenchmarkId::new("parse", fmt.name()), |b| {
            b.iter(|| fmt.parse(&text).unwrap())
        });
    }
    let (net, _) = unwrap(&poly, &UnwrapCfg::default()).unwrap();
    let text = render_net(&net);
    group.bench_function("render_net", |b| b.iter(|| render_net(&net)));
    group.bench_function("parse_net", |b| b.iter(|| parse_net(&text).unwrap()));
    group.finish();
}

criterion_group!(benches, bench_formats);
criterion_main!(benches);
