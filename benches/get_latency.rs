use criterion::{Criterion, Throughput, criterion_group, criterion_main};

use pledge::prelude::*;

fn incr(x: u64) -> u64 {
    x + 1
}

fn bench_pledge(c: &mut Criterion) {
    let mut group = c.benchmark_group("pledge");
    group.throughput(Throughput::Elements(1));

    // Full round-trip: spawn a worker, block for its outcome, reap it.
    group.bench_function("spawn_then_get", |b| {
        b.iter(|| {
            let pledge = Pledge::spawn(|| incr(41));
            pledge.get().unwrap()
        });
    });

    // Steady-state read on a completed handle: lock, clone, return.
    group.bench_function("get_completed", |b| {
        let pledge = Pledge::spawn(|| incr(41));
        pledge.get().unwrap();
        b.iter(|| pledge.get().unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_pledge);
criterion_main!(benches);
