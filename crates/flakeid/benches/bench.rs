use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use flakeid::{
    BasicSnowflakeGenerator, LockSnowflakeGenerator, NodeIdentity, SnowflakeGenerator,
    SnowflakeId, SystemClock, TimeSource, generate_default_id,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

/// Advances one millisecond every 4096 reads so the hot path never stalls.
struct SteppingMockTime {
    reads: core::cell::Cell<u64>,
}

impl TimeSource for SteppingMockTime {
    fn current_millis(&self) -> u64 {
        let reads = self.reads.get();
        self.reads.set(reads + 1);
        reads / 4096
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

fn identity() -> NodeIdentity {
    NodeIdentity::new(1, 1).expect("valid identity")
}

/// Benchmarks a hot-path generator where IDs are always ready.
fn bench_generator<G, T>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    G: SnowflakeGenerator<T>,
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id().expect("clock is monotonic"));
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks a shared lock generator hammered from several threads.
fn bench_generator_threaded(c: &mut Criterion, group_name: &str, threads: usize) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS * threads), |b| {
        b.iter_custom(|iters| {
            let generator = LockSnowflakeGenerator::with_time(identity(), SystemClock);
            let barrier = Arc::new(Barrier::new(threads + 1));
            let mut elapsed = core::time::Duration::ZERO;

            for _ in 0..iters {
                let start = scope(|s| {
                    for _ in 0..threads {
                        let generator = generator.clone();
                        let barrier = Arc::clone(&barrier);
                        s.spawn(move || {
                            barrier.wait();
                            for _ in 0..TOTAL_IDS {
                                black_box(generator.next_id().expect("clock is monotonic"));
                            }
                        });
                    }
                    barrier.wait();
                    Instant::now()
                });
                // Scope joins the workers before returning
                elapsed += start.elapsed();
            }

            elapsed
        });
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let id = SnowflakeId::from_components(1_735_689_600_000, 10, 5, 42);
    let text = id.to_string();

    group.bench_function("parse", |b| {
        b.iter(|| black_box(text.as_str()).parse::<SnowflakeId>())
    });
    group.bench_function("to_string", |b| b.iter(|| black_box(id).to_string()));
    group.bench_function("fields", |b| {
        b.iter(|| {
            let id = black_box(id);
            (id.timestamp(), id.datacenter_id(), id.worker_id(), id.sequence())
        })
    });

    group.finish();
}

fn bench_default(c: &mut Criterion) {
    let mut group = c.benchmark_group("default");
    group.bench_function("generate_default_id", |b| {
        b.iter(|| black_box(generate_default_id().expect("clock is monotonic")))
    });
    group.finish();
}

fn benches(c: &mut Criterion) {
    bench_generator(c, "mock/basic", || {
        BasicSnowflakeGenerator::with_time(
            identity(),
            SteppingMockTime {
                reads: core::cell::Cell::new(0),
            },
        )
    });
    bench_generator(c, "mock/lock", || {
        LockSnowflakeGenerator::with_time(
            identity(),
            SteppingMockTime {
                reads: core::cell::Cell::new(0),
            },
        )
    });
    bench_generator(c, "system/basic", || {
        BasicSnowflakeGenerator::with_time(identity(), SystemClock)
    });
    bench_generator(c, "system/lock", || {
        LockSnowflakeGenerator::with_time(identity(), SystemClock)
    });
    for threads in [2, 4, 8] {
        bench_generator_threaded(c, &format!("system/lock/threads/{threads}"), threads);
    }
    bench_decode(c);
    bench_default(c);
}

criterion_group!(all, benches);
criterion_main!(all);
