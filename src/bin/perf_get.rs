use std::env;
use std::time::Instant;

use pledge::prelude::*;

#[inline(never)]
fn touch<T: Copy>(v: T) {
    std::hint::black_box(v);
}

fn main() {
    let iterations: usize = env::var("ITER")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(50_000);

    let pledge = Pledge::spawn(|| 41u64 + 1);
    touch(pledge.get().unwrap());

    // Warmup to stabilize cache state
    for _ in 0..(iterations / 10).max(1) {
        touch(pledge.get().unwrap());
    }

    let start = Instant::now();
    let mut sum = 0u64;
    for _ in 0..iterations {
        sum = sum.wrapping_add(pledge.get().unwrap());
    }
    let elapsed = start.elapsed();
    touch(sum);
    println!("get_completed iters={iterations} elapsed={elapsed:?} sum={sum}");
}
