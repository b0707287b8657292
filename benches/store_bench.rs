//! Criterion benchmarks for hot paths in the taskd store.
//!
//! Run with:
//!   cargo bench
//!
//! Covers:
//!   - create (ID assignment + validation)
//!   - list with a done filter (snapshot copy)
//!   - stats (full-collection scan)
//!   - task record serialization (serde_json)

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use taskd::store::TaskStore;

fn populated_store(n: usize) -> TaskStore {
    let mut store = TaskStore::new();
    for i in 0..n {
        store
            .create(&format!("task number {i}"), None)
            .expect("create failed");
    }
    // Mark every third task done so filters have both kinds to chew on.
    for id in (1..=n as u64).step_by(3) {
        store.toggle(id).expect("toggle failed");
    }
    store
}

fn bench_create(c: &mut Criterion) {
    c.bench_function("store_create_1000", |b| {
        b.iter_with_setup(TaskStore::new, |mut store| {
            for i in 0..1000 {
                black_box(store.create(black_box(&format!("task {i}")), None).unwrap());
            }
        });
    });
}

fn bench_list(c: &mut Criterion) {
    let store = populated_store(1000);

    c.bench_function("store_list_all_1000", |b| {
        b.iter(|| black_box(store.list(None)));
    });

    c.bench_function("store_list_done_1000", |b| {
        b.iter(|| black_box(store.list(Some(true))));
    });
}

fn bench_stats(c: &mut Criterion) {
    let store = populated_store(1000);

    c.bench_function("store_stats_1000", |b| {
        b.iter(|| black_box(store.stats()));
    });
}

fn bench_serialize(c: &mut Criterion) {
    let store = populated_store(100);
    let tasks = store.list(None);

    c.bench_function("serialize_100_tasks_pretty", |b| {
        b.iter(|| {
            let s = serde_json::to_string_pretty(black_box(&tasks)).unwrap();
            black_box(s);
        });
    });
}

criterion_group!(benches, bench_create, bench_list, bench_stats, bench_serialize);
criterion_main!(benches);
