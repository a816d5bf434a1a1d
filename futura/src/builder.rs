use crate::error::Cause;
use crate::future::FutureHandle;
use crate::strategy::Strategy;

use std::error::Error as StdError;

/// Entry point binding computations to a [`Strategy`].
///
/// A builder carries no state besides its strategy, so it can be cloned and
/// reused freely; every [`run`](Self::run) produces an independent handle.
///
/// # Examples
///
/// ```rust
/// use futura::{FutureBuilder, Strategy};
///
/// let builder = FutureBuilder::build_with(Strategy::bounded(2));
///
/// let greeting = builder
///     .run(|| "future")
///     .get(|s| s.to_string(), |e| e.to_string());
///
/// assert_eq!(greeting, "future");
/// ```
#[derive(Debug, Clone)]
pub struct FutureBuilder {
    strategy: Strategy,
}

impl FutureBuilder {
    /// Binds the process-wide work-stealing pool ([`Strategy::shared`]).
    pub fn build() -> Self {
        Self::build_with(Strategy::shared())
    }

    /// Binds an explicit strategy.
    pub fn build_with(strategy: Strategy) -> Self {
        Self { strategy }
    }

    /// Binds a fresh FIFO pool of `workers` threads.
    ///
    /// # Panics
    ///
    /// Panics if `workers == 0`.
    pub fn with_workers(workers: usize) -> Self {
        Self::build_with(Strategy::bounded(workers))
    }

    /// The strategy every handle of this builder runs on.
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Submits `f` and returns a handle to its result.
    ///
    /// Never blocks. A panic in `f` resolves the handle to
    /// [`FutureError::Computation`](crate::FutureError::Computation).
    pub fn run<T, F>(&self, f: F) -> FutureHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        FutureHandle::spawn(self.strategy.clone(), move || Ok(f()))
    }

    /// Submits a fallible computation; an `Err` becomes the cause of a
    /// [`FutureError::Computation`](crate::FutureError::Computation).
    pub fn try_run<T, E, F>(&self, f: F) -> FutureHandle<T>
    where
        T: Send + 'static,
        E: StdError + Send + Sync + 'static,
        F: FnOnce() -> Result<T, E> + Send + 'static,
    {
        FutureHandle::spawn(self.strategy.clone(), move || f().map_err(Cause::new))
    }
}

impl Default for FutureBuilder {
    fn default() -> Self {
        Self::build()
    }
}
