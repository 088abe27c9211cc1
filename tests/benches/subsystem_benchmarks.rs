//! # Seq-Proxy Subsystem Benchmarks
//!
//! | Subsystem | Operation | Expectation |
//! |-----------|-----------|-------------|
//! | sp-01 Hash Ring | `get` | O(log vnodes), flat in owner count |
//! | sp-02 Counter Store | `load` / `store` | memory only, no disk wait |
//! | sp-02 Counter Store | `flush` | linear in map (snapshot) or changed keys (incremental) |

use criterion::{criterion_group, criterion_main, Criterion};
use sp_tests::benchmarks::{sp_01_hash_ring, sp_02_counter_store};

fn bench_hash_ring(c: &mut Criterion) {
    sp_01_hash_ring::register_benchmarks(c);
}

fn bench_counter_store(c: &mut Criterion) {
    sp_02_counter_store::register_benchmarks(c);
}

criterion_group!(benches, bench_hash_ring, bench_counter_store);

criterion_main!(benches);
