//! Benchmarks for the per-request header hot paths.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tunerelay::relay::{parse_content_range, parse_range_header, RangeSpec};

fn bench_range_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_parsing");

    group.bench_function("bounded", |b| {
        b.iter(|| parse_range_header(black_box(Some("bytes=1048576-2097151"))))
    });

    group.bench_function("open_ended", |b| {
        b.iter(|| parse_range_header(black_box(Some("bytes=0-"))))
    });

    group.bench_function("reject_multi_range", |b| {
        b.iter(|| parse_range_header(black_box(Some("bytes=0-10,20-30,40-50"))))
    });

    group.bench_function("reject_malformed", |b| {
        b.iter(|| parse_range_header(black_box(Some("bytes=abc-def"))))
    });

    group.finish();
}

fn bench_content_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("content_range");

    group.bench_function("parse", |b| {
        b.iter(|| parse_content_range(black_box("bytes 1048576-2097151/734003200")))
    });

    group.bench_function("render_header_value", |b| {
        let spec = RangeSpec {
            start: 1048576,
            end: Some(2097151),
        };
        b.iter(|| black_box(&spec).to_header_value())
    });

    group.finish();
}

criterion_group!(benches, bench_range_parsing, bench_content_range);
criterion_main!(benches);
