//! Error surface: spawn failures at construction, captured computation
//! faults at read time.

use std::any::Any;
use std::io;

use thiserror::Error;

/// The computation behind a [`Pledge`](crate::Pledge) panicked.
///
/// Captured on the worker thread and carried as data inside the handle, so
/// the fault is replayed to every reader instead of killing the worker
/// silently. Cloneable: each reader receives its own copy of the same fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pledge broken: {message}")]
pub struct BrokenPledge {
    message: String,
}

impl BrokenPledge {
    pub(crate) fn new(message: String) -> Self {
        Self { message }
    }

    /// The description extracted from the panic payload.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The OS refused to start the worker thread.
///
/// Surfaced by [`Pledge::try_spawn`](crate::Pledge::try_spawn) before any
/// handle exists: construction either yields a running worker or fails here.
#[derive(Debug, Error)]
#[error("failed to spawn pledge worker: {0}")]
pub struct SpawnError(#[from] io::Error);

/// Extract a human-readable description from a panic payload.
///
/// `panic!("...")` and `panic!("{}", ...)` payloads come through verbatim;
/// anything else (`panic_any` with an arbitrary type) gets a fixed fallback.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "computation panicked with a non-string payload".to_owned()
    }
}
