//! Lexer throughput benchmarks.
//!
//! Run with: `cargo bench --package faxc-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use faxc_lex::Lexer;
use faxc_util::span::FileId;

fn token_count(source: &str) -> usize {
    let mut lex = Lexer::new(source, FileId(0));
    lex.drain();
    lex.emitted().len()
}

fn bench_lexer_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let source = "let x: i32 = 42; fn main() { let y = x + 1; return y; }";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("simple_let", |b| {
        b.iter(|| token_count(black_box("let x: i32 = 42;")))
    });

    group.bench_function("function_with_body", |b| b.iter(|| token_count(black_box(source))));

    group.finish();
}

fn bench_lexer_nested_loops(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_complex");

    let source = r#"
        fn sum(n: i32) -> i32 {
            let mut total: i32 = 0;
            let mut i: i32 = 0;
            while i < n {
                total = total + i;
                i = i + 1;
            }
            return total;
        }

        fn main() -> i32 {
            let a: [i32; 4] = [1, 2, 3, 4];
            let mut acc: i32 = 0;
            for i in 0..4 {
                acc = acc + a[i];
            }
            return acc;
        }
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("nested_loops", |b| b.iter(|| token_count(black_box(source))));

    group.finish();
}

criterion_group!(benches, bench_lexer_simple, bench_lexer_nested_loops);
criterion_main!(benches);
