use crate::error::FutureError;

use parking_lot::{Condvar, Mutex};
use std::mem;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};
use std::time::Instant;

/// Continuation registered by `map`/`flat_map` on a pending parent.
pub(crate) type Callback<T> = Box<dyn FnOnce(Result<T, FutureError>) + Send>;

/// Lifecycle of a result slot.
enum Slot<T> {
    /// Not resolved yet. At most one consumer is registered: an async waker
    /// or a continuation.
    Pending {
        waker: Option<Waker>,
        then: Option<Callback<T>>,
    },

    /// Resolved and not observed yet.
    Ready(Result<T, FutureError>),

    /// The terminal value was handed to its consumer.
    Taken,
}

/// Single-resolution result slot shared by a [`Completer`] and the handle
/// that reads it.
pub(crate) struct Cell<T> {
    slot: Mutex<Slot<T>>,

    /// Signalled when the slot becomes `Ready`.
    ready: Condvar,
}

impl<T> Cell<T> {
    fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Pending {
                waker: None,
                then: None,
            }),
            ready: Condvar::new(),
        }
    }

    /// Resolves the slot. Only the first call has an effect.
    ///
    /// A registered continuation is invoked on the calling thread, outside
    /// the lock. Continuations that only forward a value (the outer side of
    /// a `flat_map`) complete their own cell inline, so each level of nested
    /// `flat_map` adds a few frames to the resolving worker's stack.
    fn complete(&self, result: Result<T, FutureError>) {
        let mut slot = self.slot.lock();

        match mem::replace(&mut *slot, Slot::Taken) {
            Slot::Pending {
                then: Some(then), ..
            } => {
                drop(slot);
                then(result);
            }
            Slot::Pending { waker, then: None } => {
                *slot = Slot::Ready(result);
                drop(slot);

                self.ready.notify_all();
                if let Some(waker) = waker {
                    waker.wake();
                }
            }
            resolved => *slot = resolved,
        }
    }

    /// Registers `then` to receive the terminal value.
    ///
    /// If the slot is already resolved, `then` runs immediately on the
    /// calling thread.
    pub(crate) fn on_complete(&self, then: Callback<T>) {
        let mut slot = self.slot.lock();

        match mem::replace(&mut *slot, Slot::Taken) {
            Slot::Ready(result) => {
                drop(slot);
                then(result);
            }
            Slot::Pending { waker, .. } => {
                *slot = Slot::Pending {
                    waker,
                    then: Some(then),
                };
            }
            Slot::Taken => {}
        }
    }

    /// Blocks until the slot resolves.
    pub(crate) fn wait(&self) -> Result<T, FutureError> {
        let mut slot = self.slot.lock();

        loop {
            if let Some(result) = take_ready(&mut slot) {
                return result;
            }

            self.ready.wait(&mut slot);
        }
    }

    /// Blocks until the slot resolves or `deadline` passes.
    ///
    /// Returns `None` on expiry; the slot stays pending and a later
    /// resolution is simply never observed.
    pub(crate) fn wait_until(&self, deadline: Instant) -> Option<Result<T, FutureError>> {
        let mut slot = self.slot.lock();

        loop {
            if let Some(result) = take_ready(&mut slot) {
                return Some(result);
            }

            if self.ready.wait_until(&mut slot, deadline).timed_out() {
                return take_ready(&mut slot);
            }
        }
    }

    /// Polls the slot from an async context.
    ///
    /// The waker is stored under the same lock `complete` takes, so a
    /// resolution racing with the poll cannot be missed.
    pub(crate) fn poll(&self, cx: &mut Context<'_>) -> Poll<Result<T, FutureError>> {
        let mut slot = self.slot.lock();

        if let Slot::Pending { waker, .. } = &mut *slot {
            *waker = Some(cx.waker().clone());
            return Poll::Pending;
        }

        match take_ready(&mut slot) {
            Some(result) => Poll::Ready(result),
            None => panic!("`FutureHandle` polled after completion"),
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        !matches!(&*self.slot.lock(), Slot::Pending { .. })
    }
}

/// Moves a resolved value out of the slot, leaving it `Taken`.
fn take_ready<T>(slot: &mut Slot<T>) -> Option<Result<T, FutureError>> {
    match mem::replace(slot, Slot::Taken) {
        Slot::Ready(result) => Some(result),
        other => {
            *slot = other;
            None
        }
    }
}

/// Write side of a [`Cell`].
///
/// A completer dropped without resolving its cell (for instance because the
/// job holding it was rejected or discarded at shutdown) resolves it to
/// [`FutureError::Rejected`], so no reader waits forever.
pub(crate) struct Completer<T> {
    cell: Option<Arc<Cell<T>>>,
}

impl<T> Completer<T> {
    pub(crate) fn complete(mut self, result: Result<T, FutureError>) {
        if let Some(cell) = self.cell.take() {
            cell.complete(result);
        }
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        if let Some(cell) = self.cell.take() {
            cell.complete(Err(FutureError::Rejected));
        }
    }
}

/// Creates a pending cell together with its completer.
pub(crate) fn channel<T>() -> (Completer<T>, Arc<Cell<T>>) {
    let cell = Arc::new(Cell::new());
    let completer = Completer {
        cell: Some(cell.clone()),
    };

    (completer, cell)
}
