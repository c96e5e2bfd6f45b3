//! Parse and serialize throughput for both tokenizer backends.

use attr_core::{to_json, AttrParser, JsonBackend, ParserOptions};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

fn generate_document(items: usize) -> String {
    let rows: Vec<String> = (0..items)
        .map(|i| {
            format!(
                r#"{{"id":{},"name":"Item {}","price":{:.2},"active":{},"tags":["a","b","c"],"meta":{{"big":{},"note":null}}}}"#,
                i,
                i,
                i as f64 * 1.5 + 10.0,
                i % 2 == 0,
                5_000_000_000i64 + i as i64
            )
        })
        .collect();
    format!(r#"{{"data":[{}],"total":{}}}"#, rows.join(","), items)
}

fn parser(backend: JsonBackend) -> AttrParser {
    AttrParser::with_options(ParserOptions {
        backend,
        ..ParserOptions::default()
    })
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for items in [10, 1000] {
        let doc = generate_document(items);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        for (name, backend) in [("native", JsonBackend::Native), ("serde", JsonBackend::Serde)] {
            let p = parser(backend);
            group.bench_with_input(BenchmarkId::new(name, items), &doc, |b, doc| {
                b.iter(|| p.parse_str(black_box(doc)).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");
    for items in [10, 1000] {
        let doc = generate_document(items);
        let tree = parser(JsonBackend::Native).parse_str(&doc).unwrap();
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(items), &tree, |b, tree| {
            b.iter(|| to_json(black_box(tree)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_serialize);
criterion_main!(benches);
