//! Execution strategies.
//!
//! A [`Strategy`] is the substrate every computation and continuation of a
//! [`FutureHandle`](crate::FutureHandle) runs on. The crate ships two
//! [`ThreadPool`] flavours, selected through [`PoolBuilder`]:
//!
//! - a bounded FIFO pool ([`Strategy::bounded`]),
//! - a work-stealing pool sized to the machine ([`Strategy::work_stealing`],
//!   or the process-wide [`Strategy::shared`]).
//!
//! Any other substrate can be plugged in by implementing [`Executor`].

mod context;
mod pool;
mod work_stealing;
mod worker;

pub(crate) mod builder;

pub use builder::{PoolBuilder, Scheduling};
pub use pool::ThreadPool;

use crate::error::SubmissionRejected;

use std::fmt;
use std::sync::{Arc, OnceLock};

/// A unit of work accepted by an [`Executor`].
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A substrate able to run [`Job`]s on threads other than the caller's.
pub trait Executor: Send + Sync {
    /// Enqueues `job` and returns immediately.
    ///
    /// Returns [`SubmissionRejected`] if the substrate no longer accepts
    /// work; the job is dropped without running in that case.
    fn execute(&self, job: Job) -> Result<(), SubmissionRejected>;

    /// Stops accepting work. The default implementation does nothing.
    fn shutdown(&self) {}

    /// Returns `true` once the substrate stopped accepting work. The default
    /// implementation always returns `false`.
    fn is_shutdown(&self) -> bool {
        false
    }
}

/// Cloneable handle to the [`Executor`] a builder is bound to.
#[derive(Clone)]
pub struct Strategy {
    executor: Arc<dyn Executor>,
}

impl Strategy {
    /// A fresh FIFO pool of exactly `workers` threads.
    ///
    /// `Strategy::bounded(1)` runs jobs one at a time in submission order,
    /// which makes it the deterministic choice for tests.
    ///
    /// # Panics
    ///
    /// Panics if `workers == 0`.
    pub fn bounded(workers: usize) -> Self {
        PoolBuilder::new()
            .worker_threads(workers)
            .thread_name("futura-bounded")
            .fifo()
            .build()
            .into()
    }

    /// A fresh work-stealing pool with one worker per logical CPU.
    pub fn work_stealing() -> Self {
        PoolBuilder::new().work_stealing().build().into()
    }

    /// The process-wide work-stealing pool, created on first use.
    pub fn shared() -> Self {
        static SHARED: OnceLock<Strategy> = OnceLock::new();

        SHARED
            .get_or_init(|| {
                PoolBuilder::new()
                    .thread_name("futura-shared")
                    .work_stealing()
                    .build()
                    .into()
            })
            .clone()
    }

    /// Wraps a custom executor.
    pub fn from_executor<E>(executor: E) -> Self
    where
        E: Executor + 'static,
    {
        Self {
            executor: Arc::new(executor),
        }
    }

    /// Wraps an executor that is already shared behind an [`Arc`].
    pub fn from_arc(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    /// Submits a raw job to the underlying executor.
    ///
    /// Unlike the jobs behind a [`FutureHandle`](crate::FutureHandle), a raw
    /// job does not keep the executor alive.
    pub fn execute(&self, job: Job) -> Result<(), SubmissionRejected> {
        self.executor.execute(job)
    }

    /// Submits `f` together with a clone of this strategy.
    ///
    /// The executor lives at least until `f` has run or been discarded, so
    /// releasing the last handle never shuts down a pool that still has
    /// work. When `f` drops the final reference, the pool is torn down from
    /// its own worker, which never joins itself.
    pub(crate) fn spawn<F>(&self, f: F) -> Result<(), SubmissionRejected>
    where
        F: FnOnce() + Send + 'static,
    {
        let keep_alive = self.clone();

        self.execute(Box::new(move || {
            f();
            drop(keep_alive);
        }))
    }

    /// Shuts the underlying executor down.
    ///
    /// Every clone of this strategy observes the shutdown, including the
    /// process-wide one returned by [`shared`](Self::shared).
    pub fn shutdown(&self) {
        self.executor.shutdown();
    }

    /// Returns `true` once the underlying executor stopped accepting work.
    pub fn is_shutdown(&self) -> bool {
        self.executor.is_shutdown()
    }

    /// Returns `true` if both handles point at the same executor.
    pub fn ptr_eq(&self, other: &Strategy) -> bool {
        Arc::ptr_eq(&self.executor, &other.executor)
    }
}

impl From<ThreadPool> for Strategy {
    fn from(pool: ThreadPool) -> Self {
        Strategy::from_executor(pool)
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy")
            .field("shutdown", &self.is_shutdown())
            .finish_non_exhaustive()
    }
}
