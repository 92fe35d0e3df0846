#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! One-shot blocking future: [`Pledge<T>`] runs a computation on a dedicated
//! worker thread and lets any number of readers block for the outcome.
//! Single assignment, multi-reader, copy-on-read; a panicking computation is
//! captured on the worker and replayed to every reader as [`BrokenPledge`].

mod error;
mod pledge;

pub use error::{BrokenPledge, SpawnError};
pub use pledge::{Pledge, Status};

/// Convenience re-exports of the crate's working set.
pub mod prelude {
    pub use crate::{BrokenPledge, Pledge, SpawnError, Status};
}
