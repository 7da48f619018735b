//! # Anchor Engine Benchmarks
//!
//! | Group | Measures |
//! |-------|----------|
//! | universe | Sieve and universe construction |
//! | search | Nearest-prime search for a single anchor |
//! | scan | Sequential and partitioned anchor scans |
//! | grid | Primorial grid sweep for the CFR comparison |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use pac_01_prime_universe::{primes_up_to, PrimeUniverse};
use pac_02_anchor_search::{
    AnchorEngine, AnchorRange, NearestPrimeSearcher, NoOpProgress, Primorial,
    STANDARD_SEARCH_CAP,
};
use pac_03_aggregation::{CfrTally, FrequencyTally, Pipeline, PipelineKind, PipelineSettings};

const BENCH_LIMIT: u64 = 300_000;

// ============================================================================
// Universe construction
// ============================================================================

fn bench_universe(c: &mut Criterion) {
    let mut group = c.benchmark_group("universe");

    for limit in [10_000u64, 100_000, 1_000_000] {
        group.throughput(Throughput::Elements(limit));
        group.bench_with_input(BenchmarkId::new("sieve", limit), &limit, |b, &limit| {
            b.iter(|| black_box(primes_up_to(limit).len()))
        });
    }

    let primes = primes_up_to(BENCH_LIMIT);
    group.bench_function("from_ascending_300k", |b| {
        b.iter(|| black_box(PrimeUniverse::from_ascending(primes.clone()).is_ok()))
    });

    group.finish();
}

// ============================================================================
// Nearest-prime search
// ============================================================================

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let universe = PrimeUniverse::up_to(BENCH_LIMIT).expect("universe");
    let searcher = NearestPrimeSearcher::new(STANDARD_SEARCH_CAP);

    // 24 is one step from 23; 532 needs nine steps to reach 523.
    for anchor in [24u64, 532, 200_000] {
        group.bench_with_input(BenchmarkId::new("nearest", anchor), &anchor, |b, &anchor| {
            b.iter(|| black_box(searcher.search(&universe, anchor)))
        });
    }

    group.finish();
}

// ============================================================================
// Anchor scans
// ============================================================================

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    group.measurement_time(Duration::from_secs(10));

    let universe = PrimeUniverse::up_to(BENCH_LIMIT).expect("universe");
    let engine = AnchorEngine::new(&universe, STANDARD_SEARCH_CAP).expect("cap");
    let settings = PipelineSettings::default();

    for pairs in [1_000usize, 10_000] {
        let range = AnchorRange::starting_at(10, pairs);
        group.throughput(Throughput::Elements(pairs as u64));

        group.bench_with_input(BenchmarkId::new("frequency", pairs), &range, |b, &range| {
            b.iter(|| {
                let (tally, _) = engine
                    .run(range, FrequencyTally::new(), &mut NoOpProgress, 1000)
                    .expect("scan");
                black_box(tally.failures())
            })
        });

        for partitions in [2usize, 4] {
            group.bench_with_input(
                BenchmarkId::new(format!("partitioned_{partitions}"), pairs),
                &range,
                |b, &range| {
                    b.iter(|| {
                        let (_, snapshot) = engine
                            .scan_partitioned(range, partitions, || {
                                Pipeline::new(PipelineKind::Frequency, &settings)
                            })
                            .expect("scan");
                        black_box(snapshot.composite_failures)
                    })
                },
            );
        }
    }

    group.finish();
}

// ============================================================================
// Primorial grid
// ============================================================================

fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid");
    let universe = PrimeUniverse::up_to(100_000).expect("universe");
    let engine = AnchorEngine::new(&universe, STANDARD_SEARCH_CAP).expect("cap");

    group.bench_function("cfr_grid_100k", |b| {
        b.iter(|| {
            let mut tally = CfrTally::default();
            let tested = engine.scan_grid(&Primorial::GRID, &mut tally).expect("grid");
            black_box(tested)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_universe, bench_search, bench_scan, bench_grid);
criterion_main!(benches);
