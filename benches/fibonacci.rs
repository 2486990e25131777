//! Fibonacci Benchmarks
//!
//! Runtime of the three Fibonacci implementations as `n` grows: exponential for
//! recursion, linear for iteration and logarithmic for matrix powers.
//!
//! Run with: `cargo bench --bench fibonacci`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use difftree::exercises::{fibonacci_iter, fibonacci_power, fibonacci_recursive, MAX_INDEX};

fn benchmark_fibonacci(c: &mut Criterion) {
    let mut group = c.benchmark_group("Fibonacci");

    for n in [5u64, 10, 15, 20, 25] {
        group.bench_with_input(BenchmarkId::new("Recursive", n), &n, |b, &n| {
            b.iter(|| fibonacci_recursive(black_box(n)))
        });
    }

    for n in [5u64, 10, 20, 40, 80, MAX_INDEX] {
        group.bench_with_input(BenchmarkId::new("Iterative", n), &n, |b, &n| {
            b.iter(|| fibonacci_iter(black_box(n)))
        });
        group.bench_with_input(BenchmarkId::new("Power", n), &n, |b, &n| {
            b.iter(|| fibonacci_power(black_box(n)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_fibonacci);
criterion_main!(benches);
