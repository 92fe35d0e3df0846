use std::sync::mpsc::channel;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use pledge::prelude::*;

#[test]
fn all_blocked_readers_wake_with_the_same_outcome() {
    // Scenario:
    // 1. Eight readers call get() while the computation is still parked on
    //    the gate channel.
    // 2. The gate opens; the worker completes exactly once.
    // 3. Every reader must wake with the same value. A lost wake-up shows up
    //    as a recv_timeout failure below instead of a hang.
    const READERS: usize = 8;

    let (gate_tx, gate_rx) = channel::<()>();
    let pledge = Arc::new(Pledge::spawn(move || {
        gate_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("gate never opened");
        41 + 1
    }));

    let ready = Arc::new(Barrier::new(READERS + 1));
    let (out_tx, out_rx) = channel();
    let mut readers = Vec::new();
    for _ in 0..READERS {
        let pledge = pledge.clone();
        let ready = ready.clone();
        let out_tx = out_tx.clone();
        readers.push(thread::spawn(move || {
            ready.wait();
            out_tx.send(pledge.get()).unwrap();
        }));
    }

    ready.wait();
    // Give the readers a moment to actually park on the condvar.
    thread::sleep(Duration::from_millis(100));
    assert_eq!(pledge.status(), Status::Pending);
    gate_tx.send(()).unwrap();

    for _ in 0..READERS {
        let outcome = out_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("a reader never woke up");
        assert_eq!(outcome, Ok(42));
    }
    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn completed_handle_serves_any_number_of_readers() {
    let pledge = Arc::new(Pledge::spawn(|| 1234u64));
    assert_eq!(pledge.get(), Ok(1234));

    // Repeated concurrent reads never re-run the computation and never
    // block; they all see the one stored outcome.
    let mut readers = Vec::new();
    for _ in 0..4 {
        let pledge = pledge.clone();
        readers.push(thread::spawn(move || {
            for _ in 0..100 {
                assert_eq!(pledge.get(), Ok(1234));
            }
        }));
    }
    for reader in readers {
        reader.join().unwrap();
    }
}
