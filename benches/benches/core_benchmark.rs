//! Throughput of contract selection and bar decoding.
//!
//! Run with: `cargo bench --package fnoscope-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fnoscope_bench::{as_of, bar_blob, master_blob, universe};
use fnoscope_lib::{SelectionCache, decode_bars, select_contracts};
use std::hint::black_box;

fn selection_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_contracts");

    for underlyings in [50_usize, 200, 1_000] {
        let master = master_blob(underlyings, 8);
        let universe = universe(underlyings);
        let rows = master.lines().count() as u64;
        group.throughput(Throughput::Elements(rows));

        group.bench_with_input(
            BenchmarkId::new("scan", underlyings),
            &master,
            |b, master| {
                b.iter(|| select_contracts(black_box(master), &universe, as_of()));
            },
        );
    }

    let master = master_blob(200, 8);
    let mut cache = SelectionCache::new(universe(200));
    group.bench_function("cached", |b| {
        b.iter(|| cache.select(black_box(&master), as_of()).len());
    });

    group.finish();
}

fn decode_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_bars");

    // One trading session of one-minute bars, then a week.
    for count in [375_usize, 1_875] {
        for bad_every in [0_usize, 25] {
            let raw = bar_blob(count, bad_every);
            group.throughput(Throughput::Bytes(raw.len() as u64));

            let name = if bad_every == 0 { "clean" } else { "malformed" };
            group.bench_with_input(BenchmarkId::new(name, count), &raw, |b, raw| {
                b.iter(|| decode_bars(black_box(raw)));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, selection_benchmark, decode_benchmark);
criterion_main!(benches);
