//! # SP-02 Counter Store Benchmarks
//!
//! `load`/`store` must never wait on disk; flush cost grows with the map in
//! snapshot mode and with the changed set in incremental mode.

use std::time::Duration;

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use sp_02_counter_store::{FileCounterStore, FlushMode, StoreConfig};
use tempfile::TempDir;

fn open_store(mode: FlushMode) -> (TempDir, FileCounterStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = StoreConfig::new(dir.path().join("file_seq"))
        .with_mode(mode)
        .with_compact_threshold(None);
    let store = FileCounterStore::open(config).expect("open store");
    (dir, store)
}

fn fill(store: &FileCounterStore, keys: usize) {
    for i in 0..keys {
        store.store(&format!("ssid-{i}"), i as u64).expect("store");
    }
}

pub fn bench_hot_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("sp-02/hot_path");
    group.measurement_time(Duration::from_secs(5));
    group.throughput(Throughput::Elements(1));

    let (_dir, store) = open_store(FlushMode::Snapshot);
    fill(&store, 100_000);
    let mut rng = rand::thread_rng();

    group.bench_function("load", |b| {
        b.iter(|| {
            let key = format!("ssid-{}", rng.gen_range(0..100_000));
            black_box(store.load(&key))
        })
    });

    let mut value = 100_000u64;
    group.bench_function("store", |b| {
        b.iter(|| {
            value += 1;
            black_box(store.store("ssid-hot", value))
        })
    });

    group.finish();
}

pub fn bench_flush(c: &mut Criterion) {
    let mut group = c.benchmark_group("sp-02/flush");
    group.sample_size(20);

    for keys in [1_000, 100_000] {
        let (_dir, store) = open_store(FlushMode::Snapshot);
        fill(&store, keys);

        group.throughput(Throughput::Elements(keys as u64));
        group.bench_with_input(BenchmarkId::new("snapshot", keys), &store, |b, store| {
            let mut value = 0u64;
            b.iter(|| {
                value += 1;
                store.store("ssid-0", value).expect("store");
                black_box(store.flush())
            })
        });
    }

    // Same map size, only a handful of keys changed per cycle.
    let (_dir, store) = open_store(FlushMode::Incremental);
    fill(&store, 100_000);
    store.flush().expect("initial flush");
    group.throughput(Throughput::Elements(100));
    group.bench_function("incremental_100_of_100000", |b| {
        let mut value = 0u64;
        b.iter(|| {
            value += 1;
            for i in 0..100 {
                store.store(&format!("ssid-{i}"), value).expect("store");
            }
            black_box(store.flush())
        })
    });

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_hot_path(c);
    bench_flush(c);
}
