use super::builder::Scheduling;
use super::context::current_worker;
use super::work_stealing::injector::Injector;
use super::work_stealing::queue::LocalQueue;
use super::worker::Worker;
use super::{Executor, Job};
use crate::error::SubmissionRejected;

use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// State shared between a pool and its workers.
pub(crate) struct Shared {
    /// Global queue; also carries the closed flag.
    pub(crate) injector: Injector,

    /// One queue per worker in work-stealing mode, empty in FIFO mode.
    pub(crate) locals: Vec<LocalQueue>,
}

impl Shared {
    /// Identity used to recognise this pool's own worker threads.
    pub(crate) fn id(self: &Arc<Self>) -> usize {
        Arc::as_ptr(self) as usize
    }
}

/// A fixed set of worker threads executing [`Job`]s.
///
/// Built with [`PoolBuilder`](crate::PoolBuilder). Dropping the pool shuts it
/// down and joins its workers. Behind a [`Strategy`](crate::Strategy), every
/// job submitted for a [`FutureHandle`](crate::FutureHandle) holds a
/// reference, so the drop only happens once no such job is queued or
/// running.
pub struct ThreadPool {
    shared: Arc<Shared>,

    /// Join handles of the worker threads.
    handles: Mutex<Vec<JoinHandle<()>>>,

    workers: usize,
    scheduling: Scheduling,
}

impl ThreadPool {
    /// Spawns `workers` threads named `{name}-{index}`.
    ///
    /// # Panics
    ///
    /// Panics if the operating system refuses to spawn a thread.
    pub(crate) fn new(workers: usize, name: &str, scheduling: Scheduling) -> Self {
        let locals = match scheduling {
            Scheduling::Fifo => Vec::new(),
            Scheduling::WorkStealing => (0..workers).map(|_| LocalQueue::new()).collect(),
        };

        let shared = Arc::new(Shared {
            injector: Injector::new(),
            locals,
        });

        let handles = (0..workers)
            .map(|id| {
                let worker = Worker::new(id, shared.clone());

                thread::Builder::new()
                    .name(format!("{name}-{id}"))
                    .spawn(move || worker.run())
                    .expect("failed to spawn pool worker thread")
            })
            .collect();

        tracing::debug!(workers, ?scheduling, name, "thread pool started");

        Self {
            shared,
            handles: Mutex::new(handles),
            workers,
            scheduling,
        }
    }

    /// Number of worker threads the pool was started with.
    pub fn worker_threads(&self) -> usize {
        self.workers
    }

    /// Queueing discipline of the pool.
    pub fn scheduling(&self) -> Scheduling {
        self.scheduling
    }

    /// Stops admission and discards every queued job.
    ///
    /// Jobs that are already running finish normally. Discarded jobs are
    /// dropped without running, which resolves their handles to
    /// [`FutureError::Rejected`](crate::FutureError::Rejected).
    pub fn shutdown(&self) {
        let mut drained = self.shared.injector.shutdown();

        for local in &self.shared.locals {
            drained.extend(local.drain());
        }

        if !drained.is_empty() {
            tracing::debug!(discarded = drained.len(), "thread pool shut down with queued jobs");
        }

        drop(drained);
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) has been called.
    pub fn is_shutdown(&self) -> bool {
        self.shared.injector.is_shutdown()
    }

    /// Waits for every worker to exit, skipping the calling thread when the
    /// last reference to the pool is released by one of its own jobs.
    fn join(&self) {
        let current = thread::current().id();
        let handles: Vec<_> = self.handles.lock().drain(..).collect();

        for handle in handles {
            if handle.thread().id() == current {
                continue;
            }

            let _ = handle.join();
        }
    }
}

impl Executor for ThreadPool {
    fn execute(&self, job: Job) -> Result<(), SubmissionRejected> {
        let local = current_worker(self.shared.id()).and_then(|id| self.shared.locals.get(id));

        let pushed = match local {
            Some(queue) => queue.push(job, &self.shared.injector),
            None => self.shared.injector.push(job),
        };

        pushed.map_err(|job| {
            drop(job);
            tracing::warn!("submission rejected: thread pool is shut down");
            SubmissionRejected
        })
    }

    fn shutdown(&self) {
        ThreadPool::shutdown(self);
    }

    fn is_shutdown(&self) -> bool {
        ThreadPool::is_shutdown(self)
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
        self.join();
    }
}
