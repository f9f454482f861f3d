use criterion::{black_box, criterion_group, criterion_main, Criterion};
use toml_lossless::Document;

fn parse_benchmark(c: &mut Criterion) {
    let manifest =
        std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/bench/sample.toml"))
            .expect("could not read bench fixture");

    c.bench_function("parse_toml_lossless", |b| {
        b.iter(|| {
            let doc = Document::parse(black_box(&manifest)).unwrap();
            black_box(doc);
        });
    });
}

criterion_group!(benches, parse_benchmark);
criterion_main!(benches);
