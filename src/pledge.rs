//! The one-shot cell and its worker.
//!
//! One dedicated worker thread per handle stores the outcome exactly once;
//! any number of readers park on the cell's condvar until the store lands.

use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;

use crate::error::{panic_message, BrokenPledge, SpawnError};

/// Observable lifecycle of a [`Pledge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The worker has not delivered an outcome yet.
    Pending,
    /// The outcome is stored; every accessor returns without waiting.
    Completed,
}

/// One-shot state: `Pending` until the worker stores the outcome, then
/// `Done` forever. The store and the status flip are a single assignment
/// under the cell's lock, so a reader can never see one without the other.
enum State<T> {
    Pending,
    Done(Result<T, BrokenPledge>),
}

impl<T> State<T> {
    #[inline]
    fn is_pending(&self) -> bool {
        matches!(self, State::Pending)
    }
}

/// The cell shared by the worker and all readers: the guarded state plus
/// the condvar readers wait on.
struct Cell<T> {
    state: Mutex<State<T>>,
    done: Condvar,
}

/// A one-shot, blocking, multi-reader future.
///
/// [`spawn`](Pledge::spawn) starts the computation on its own worker thread
/// and returns immediately; [`get`](Pledge::get) blocks until the outcome is
/// stored, then hands every caller an independent clone of it. A panicking
/// computation is captured and replayed to every reader as [`BrokenPledge`];
/// it never aborts the process and is never silently lost.
///
/// The handle is deliberately not `Clone`: share it by reference, or wrap it
/// in an `Arc`, to fan readers out. The worker thread is never exposed; it
/// is joined by the first blocking accessor that observes completion, and a
/// handle dropped while still pending simply detaches its worker.
pub struct Pledge<T> {
    cell: Arc<Cell<T>>,
    // Taken and joined by the first accessor to observe completion.
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl<T: Send + 'static> Pledge<T> {
    /// Start `computation` on a dedicated worker thread.
    ///
    /// Returns without blocking, however long the computation runs; it is
    /// invoked at most once, on the worker only. Panics if the OS refuses
    /// to start the thread — [`try_spawn`](Pledge::try_spawn) reports that
    /// case as an error instead.
    pub fn spawn<F>(computation: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        match Self::try_spawn(computation) {
            Ok(pledge) => pledge,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible variant of [`spawn`](Pledge::spawn).
    ///
    /// Inability to start the worker is fatal to construction: it surfaces
    /// here, before any handle exists.
    pub fn try_spawn<F>(computation: F) -> Result<Self, SpawnError>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let cell = Arc::new(Cell {
            state: Mutex::new(State::Pending),
            done: Condvar::new(),
        });

        let worker_cell = cell.clone();
        let handle = thread::Builder::new()
            .name("pledge-worker".into())
            .spawn(move || run_worker(worker_cell, computation))?;
        log::trace!("pledge worker spawned");

        Ok(Self {
            cell,
            worker: Mutex::new(Some(handle)),
        })
    }
}

impl<T> Pledge<T> {
    /// Non-blocking peek at the lifecycle state.
    #[inline]
    pub fn status(&self) -> Status {
        if self.cell.state.lock().unwrap().is_pending() {
            Status::Pending
        } else {
            Status::Completed
        }
    }

    /// Block until the outcome is stored, then move it out of the handle.
    ///
    /// Skips the clone [`get`](Pledge::get) pays, at the price of consuming
    /// the handle. The worker is always reaped before this returns.
    pub fn into_inner(self) -> Result<T, BrokenPledge> {
        let outcome = {
            let mut state = self.wait_done();
            match mem::replace(&mut *state, State::Pending) {
                State::Done(outcome) => outcome,
                // wait_done only returns once the state is Done.
                State::Pending => unreachable!("woke before the outcome was stored"),
            }
        };
        self.reap();
        outcome
    }

    /// Wait on the condvar until the worker has stored the outcome.
    fn wait_done(&self) -> MutexGuard<'_, State<T>> {
        let state = self.cell.state.lock().unwrap();
        self.cell.done.wait_while(state, |s| s.is_pending()).unwrap()
    }

    /// Join the finished worker, once; later callers find the slot empty.
    fn reap(&self) {
        let handle = self.worker.lock().unwrap().take();
        if let Some(handle) = handle {
            // The outcome is already stored; this join only covers the
            // worker's final return.
            let _ = handle.join();
        }
    }
}

impl<T: Clone> Pledge<T> {
    /// Block until the computation finishes, then return its outcome.
    ///
    /// Every call — repeated, concurrent, before or after completion —
    /// observes the same outcome, never re-runs the computation, and never
    /// waits once the outcome is stored. The success value is an
    /// independent clone of the stored one: mutating it affects neither
    /// other readers nor the handle. A captured fault comes back as
    /// [`BrokenPledge`] to every caller.
    pub fn get(&self) -> Result<T, BrokenPledge> {
        let outcome = match &*self.wait_done() {
            State::Done(outcome) => outcome.clone(),
            State::Pending => unreachable!("woke before the outcome was stored"),
        };
        self.reap();
        outcome
    }

    /// Non-blocking read: `None` while the worker is still running.
    #[inline]
    pub fn try_get(&self) -> Option<Result<T, BrokenPledge>> {
        match &*self.cell.state.lock().unwrap() {
            State::Done(outcome) => Some(outcome.clone()),
            State::Pending => None,
        }
    }
}

/// Worker body: run the computation, then store the outcome and wake every
/// reader. The computation runs outside the lock; only the store and the
/// notify happen under it.
fn run_worker<T, F>(cell: Arc<Cell<T>>, computation: F)
where
    F: FnOnce() -> T,
{
    // AssertUnwindSafe: the closure is consumed here and the cell is only
    // written after the unwind is resolved.
    let outcome = panic::catch_unwind(AssertUnwindSafe(computation))
        .map_err(|payload| BrokenPledge::new(panic_message(payload.as_ref())));

    match &outcome {
        Ok(_) => log::trace!("pledge worker completed"),
        Err(broken) => log::trace!("pledge worker captured fault: {broken}"),
    }

    let mut state = cell.state.lock().unwrap();
    *state = State::Done(outcome);
    cell.done.notify_all();
}
