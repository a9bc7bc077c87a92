//! Pure interval arithmetic. None of this runs per sample, but exploration
//! runs on the command path and should stay cheap.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use justly::tuning::{compose, explore, octave_reduce, to_frequency, ExploreBounds, Ratio};

pub fn bench_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("tuning/ratio");
    let seventh = Ratio::HARMONIC_SEVENTH;

    group.bench_function("compose", |b| {
        b.iter(|| compose(black_box(Ratio::FIFTH), black_box(seventh)))
    });

    let wide = Ratio::new(3u32.pow(12), 2u32.pow(7)).unwrap_or(Ratio::UNISON);
    group.bench_function("octave_reduce", |b| {
        b.iter(|| octave_reduce(black_box(wide)))
    });

    group.bench_function("to_frequency", |b| {
        b.iter(|| to_frequency(black_box(220.0), black_box(seventh)))
    });

    group.finish();
}

pub fn bench_explore(c: &mut Criterion) {
    let mut group = c.benchmark_group("tuning/explore");

    for depth in [2, 3, 5, 7] {
        let bounds = ExploreBounds::new(depth, depth);
        group.bench_with_input(BenchmarkId::new("fifth", depth), &bounds, |b, &bounds| {
            b.iter(|| explore(black_box(Ratio::FIFTH), bounds))
        });
    }

    group.finish();
}
