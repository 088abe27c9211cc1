//! # SP-01 Hash Ring Benchmarks
//!
//! Lookup is a binary search over sorted positions, so `get` should stay
//! flat as owners are added. Ring rebuilds are off the hot path but are
//! measured to keep membership churn cheap.

use std::time::Duration;

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use sp_01_hash_ring::{HashRing, DEFAULT_REPLICAS};

fn owners(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("seq-{i}.internal:9000")).collect()
}

fn keys(count: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| format!("tenant-{}", rng.gen::<u32>()))
        .collect()
}

pub fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("sp-01/lookup");
    group.measurement_time(Duration::from_secs(5));

    let sample = keys(1_024);
    for count in [3, 16, 64, 256] {
        let ring = HashRing::with_default_hash(DEFAULT_REPLICAS).expect("valid replicas");
        ring.add(owners(count));

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("get", count), &ring, |b, ring| {
            let mut i = 0usize;
            b.iter(|| {
                i = (i + 1) % sample.len();
                black_box(ring.get(&sample[i]))
            })
        });
    }

    group.finish();
}

pub fn bench_membership(c: &mut Criterion) {
    let mut group = c.benchmark_group("sp-01/membership");

    for count in [16, 256] {
        let names = owners(count);
        group.bench_with_input(BenchmarkId::new("build", count), &names, |b, names| {
            b.iter(|| {
                let ring = HashRing::with_default_hash(DEFAULT_REPLICAS).expect("valid replicas");
                ring.add(names.iter().cloned());
                black_box(ring.vnode_count())
            })
        });

        group.bench_with_input(BenchmarkId::new("add_one", count), &names, |b, names| {
            let ring = HashRing::with_default_hash(DEFAULT_REPLICAS).expect("valid replicas");
            ring.add(names.iter().cloned());
            b.iter(|| {
                ring.add(["seq-new.internal:9000"]);
                black_box(ring.remove("seq-new.internal:9000"))
            })
        });
    }

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_lookup(c);
    bench_membership(c);
}
