//! Lexer benchmarks.
//!
//! Run with: `cargo bench --package jfmt-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use jfmt_lex::tokenize;
use jfmt_util::Handler;

fn token_count(source: &str) -> usize {
    let handler = Handler::new();
    tokenize(source, &handler).len()
}

fn bench_lexer_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let source = "class Point { int x; int y; Point(int x, int y) { this.x = x; this.y = y; } }";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("field_declaration", |b| {
        b.iter(|| token_count(black_box("private final int count = 0;")))
    });

    group.bench_function("small_class", |b| {
        b.iter(|| token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_complex");

    let source = r#"
        package com.example.demo;

        import java.util.List;
        import java.util.Map;

        /** Stores named measurements. */
        public final class Metrics<T extends Comparable<T>> {
            private final Map<String, List<Double>> samples;
            private long mask = 0xFF_EC_DE_5EL;
            private double scale = 0x1.8p3;

            public Metrics(Map<String, List<Double>> samples) {
                this.samples = samples;
            }

            public double total() {
                double sum = 0.0; // running total
                for (List<Double> column : samples.values()) {
                    for (double v : column) {
                        sum += v;
                    }
                }
                return sum;
            }
        }
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("realistic_class", |b| {
        b.iter(|| token_count(black_box(source)))
    });

    let repeated = source.repeat(50);
    group.throughput(Throughput::Bytes(repeated.len() as u64));
    group.bench_function("realistic_class_x50", |b| {
        b.iter(|| token_count(black_box(&repeated)))
    });

    group.finish();
}

criterion_group!(benches, bench_lexer_simple, bench_lexer_complex);
criterion_main!(benches);
