use criterion::{black_box, criterion_group, criterion_main, Criterion};
use toml_lossless::Document;

fn roundtrip_benchmark(c: &mut Criterion) {
    let manifest =
        std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/bench/sample.toml"))
            .expect("could not read bench fixture");

    c.bench_function("roundtrip_toml_lossless", |b| {
        b.iter(|| {
            let doc = Document::parse(black_box(&manifest)).unwrap();
            black_box(doc.to_string());
        });
    });

    c.bench_function("mutate_and_emit_toml_lossless", |b| {
        b.iter(|| {
            let mut doc = Document::parse(black_box(&manifest)).unwrap();
            doc.root_mut().set("bench_marker", 1i64).unwrap();
            black_box(doc.to_string());
        });
    });
}

criterion_group!(benches, roundtrip_benchmark);
criterion_main!(benches);
