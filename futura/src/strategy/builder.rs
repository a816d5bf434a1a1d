use super::pool::ThreadPool;

use std::thread;

/// How a [`ThreadPool`] hands jobs to its workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduling {
    /// One shared queue; jobs start in submission order.
    Fifo,

    /// Per-worker queues with stealing; jobs submitted from a worker stay
    /// local unless a sibling steals them.
    WorkStealing,
}

/// Builder for configuring and creating a [`ThreadPool`].
///
/// # Examples
///
/// ```rust
/// use futura::{PoolBuilder, Strategy};
///
/// let pool = PoolBuilder::new()
///     .worker_threads(4)
///     .thread_name("ingest")
///     .fifo()
///     .build();
///
/// let strategy = Strategy::from(pool);
/// # drop(strategy);
/// ```
#[derive(Debug, Clone)]
pub struct PoolBuilder {
    /// Number of worker threads.
    worker_threads: usize,

    /// Prefix of the worker thread names.
    thread_name: String,

    scheduling: Scheduling,
}

impl PoolBuilder {
    /// Creates a new `PoolBuilder` with default configuration.
    ///
    /// By default the pool is work-stealing, with one worker per logical CPU
    /// (falling back to `1` if the count is unavailable).
    pub fn new() -> Self {
        let worker_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            worker_threads,
            thread_name: String::from("futura-worker"),
            scheduling: Scheduling::WorkStealing,
        }
    }

    /// Sets the number of worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn worker_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "worker_threads must be > 0");

        self.worker_threads = n;
        self
    }

    /// Sets the prefix used to name worker threads (`{prefix}-{index}`).
    pub fn thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name = prefix.into();
        self
    }

    /// Uses a single FIFO queue shared by every worker.
    pub fn fifo(mut self) -> Self {
        self.scheduling = Scheduling::Fifo;
        self
    }

    /// Uses per-worker queues with work stealing.
    pub fn work_stealing(mut self) -> Self {
        self.scheduling = Scheduling::WorkStealing;
        self
    }

    /// Spawns the workers and returns the running pool.
    pub fn build(self) -> ThreadPool {
        ThreadPool::new(self.worker_threads, &self.thread_name, self.scheduling)
    }
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}
