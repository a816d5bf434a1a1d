//! Composable future handles.
//!
//! A [`FutureHandle`] is produced by [`FutureBuilder::run`](crate::FutureBuilder::run)
//! and resolves exactly once, to a value or to a [`FutureError`](crate::FutureError).

mod cell;
mod handle;

pub use handle::FutureHandle;

use crate::error::Cause;

use std::panic::{self, AssertUnwindSafe};

/// Runs `f`, turning a panic into a [`Panicked`](crate::Panicked) cause.
pub(crate) fn catch<R>(f: impl FnOnce() -> Result<R, Cause>) -> Result<R, Cause> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| Err(Cause::from_panic(payload)))
}
