use super::catch;
use super::cell::{Cell, Completer, channel};
use crate::error::{Cause, FutureError};
use crate::strategy::Strategy;

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Handle to a computation running on a [`Strategy`].
///
/// The handle resolves exactly once, either to a value of type `T` or to a
/// [`FutureError`]. It can be:
///
/// - chained with [`map`](Self::map) / [`try_map`](Self::try_map) and
///   [`flat_map`](Self::flat_map) / [`try_flat_map`](Self::try_flat_map),
///   each step becoming a new submission to the same strategy,
/// - folded with [`get`](Self::get) / [`get_timeout`](Self::get_timeout),
///   which block the calling thread,
/// - awaited, since it implements [`Future`].
///
/// All of these consume the handle: its terminal value has exactly one
/// consumer. Dropping a handle does **not** cancel the computation.
pub struct FutureHandle<T> {
    cell: Arc<Cell<T>>,
    strategy: Strategy,
}

impl<T: Send + 'static> FutureHandle<T> {
    /// Submits `f` to `strategy`.
    ///
    /// A rejected submission drops the job, and with it the completer, which
    /// resolves the handle to [`FutureError::Rejected`].
    pub(crate) fn spawn<F>(strategy: Strategy, f: F) -> Self
    where
        F: FnOnce() -> Result<T, Cause> + Send + 'static,
    {
        let (completer, cell) = channel();

        let _ = strategy.spawn(move || {
            completer.complete(catch(f).map_err(FutureError::Computation));
        });

        Self { cell, strategy }
    }

    /// Attaches `step` to run on the strategy once this handle succeeds.
    ///
    /// A failure skips `step` and is forwarded unchanged.
    fn chain<U, S>(self, step: S) -> FutureHandle<U>
    where
        U: Send + 'static,
        S: FnOnce(T, Completer<U>) + Send + 'static,
    {
        let (completer, cell) = channel();
        let strategy = self.strategy.clone();

        self.cell.on_complete(Box::new(move |result: Result<T, FutureError>| match result {
            Ok(value) => {
                let _ = strategy.spawn(move || step(value, completer));
            }
            Err(error) => completer.complete(Err(error)),
        }));

        FutureHandle {
            cell,
            strategy: self.strategy,
        }
    }

    /// Resolves `completer` with whatever this handle resolves to.
    fn forward(self, completer: Completer<T>) {
        self.cell
            .on_complete(Box::new(move |result| completer.complete(result)));
    }

    /// Transforms the value once it is available.
    ///
    /// A panic in `f` resolves the returned handle to
    /// [`FutureError::Continuation`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use futura::FutureBuilder;
    ///
    /// let builder = FutureBuilder::with_workers(1);
    /// let len = builder
    ///     .run(|| String::from("future"))
    ///     .map(|s| s.len())
    ///     .get(|n| n as i64, |_| -1);
    ///
    /// assert_eq!(len, 6);
    /// ```
    pub fn map<U, F>(self, f: F) -> FutureHandle<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.chain(move |value, completer| {
            completer.complete(catch(move || Ok(f(value))).map_err(FutureError::Continuation));
        })
    }

    /// Fallible flavour of [`map`](Self::map): an `Err` returned by `f`
    /// becomes the cause of a [`FutureError::Continuation`].
    pub fn try_map<U, E, F>(self, f: F) -> FutureHandle<U>
    where
        U: Send + 'static,
        E: StdError + Send + Sync + 'static,
        F: FnOnce(T) -> Result<U, E> + Send + 'static,
    {
        self.chain(move |value, completer| {
            let result = catch(move || f(value).map_err(Cause::new));
            completer.complete(result.map_err(FutureError::Continuation));
        })
    }

    /// Chains another asynchronous computation.
    ///
    /// The returned handle resolves when the handle produced by `f`
    /// resolves; that handle may run on a different strategy, including a
    /// temporary one such as `FutureBuilder::with_workers(1)`.
    ///
    /// The inner outcome is handed outward on the thread that resolves the
    /// innermost handle, one stack level per nested `flat_map`. Recursion a
    /// few hundred levels deep is fine on the default worker stack; deeper
    /// recursion should use a flat loop of `map` steps instead.
    pub fn flat_map<U, F>(self, f: F) -> FutureHandle<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> FutureHandle<U> + Send + 'static,
    {
        self.try_flat_map_inner(move |value| Ok(f(value)))
    }

    /// Fallible flavour of [`flat_map`](Self::flat_map).
    pub fn try_flat_map<U, E, F>(self, f: F) -> FutureHandle<U>
    where
        U: Send + 'static,
        E: StdError + Send + Sync + 'static,
        F: FnOnce(T) -> Result<FutureHandle<U>, E> + Send + 'static,
    {
        self.try_flat_map_inner(move |value| f(value).map_err(Cause::new))
    }

    fn try_flat_map_inner<U, F>(self, f: F) -> FutureHandle<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Result<FutureHandle<U>, Cause> + Send + 'static,
    {
        self.chain(move |value, completer| match catch(move || f(value)) {
            Ok(inner) => inner.forward(completer),
            Err(cause) => completer.complete(Err(FutureError::Continuation(cause))),
        })
    }
}

impl<T> FutureHandle<T> {
    /// Blocks until the handle resolves and folds the outcome.
    ///
    /// Exactly one of `on_success` and `on_failure` is called. Every failure
    /// kind (computation, continuation, rejection) reaches `on_failure`.
    pub fn get<R>(
        self,
        on_success: impl FnOnce(T) -> R,
        on_failure: impl FnOnce(FutureError) -> R,
    ) -> R {
        match self.wait() {
            Ok(value) => on_success(value),
            Err(error) => on_failure(error),
        }
    }

    /// Like [`get`](Self::get), but gives up after `timeout`.
    ///
    /// On expiry `on_failure` receives [`FutureError::DeadlineExceeded`].
    /// The computation is not cancelled; its eventual result is discarded.
    pub fn get_timeout<R>(
        self,
        on_success: impl FnOnce(T) -> R,
        on_failure: impl FnOnce(FutureError) -> R,
        timeout: Duration,
    ) -> R {
        match self.wait_timeout(timeout) {
            Ok(value) => on_success(value),
            Err(error) => on_failure(error),
        }
    }

    /// Blocks until the handle resolves.
    pub fn wait(self) -> Result<T, FutureError> {
        self.cell.wait()
    }

    /// Blocks until the handle resolves or `timeout` elapses.
    pub fn wait_timeout(self, timeout: Duration) -> Result<T, FutureError> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.cell.wait();
        };

        self.cell.wait_until(deadline).unwrap_or_else(|| {
            tracing::debug!(?timeout, "timed get expired before the handle resolved");
            Err(FutureError::DeadlineExceeded(timeout))
        })
    }

    /// Returns `true` once the handle has resolved.
    pub fn is_done(&self) -> bool {
        self.cell.is_done()
    }

    /// The strategy continuations of this handle run on.
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }
}

impl<T> Future for FutureHandle<T> {
    type Output = Result<T, FutureError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.cell.poll(cx)
    }
}

impl<T> fmt::Debug for FutureHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FutureHandle")
            .field("done", &self.is_done())
            .finish_non_exhaustive()
    }
}
