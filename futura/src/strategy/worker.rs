use crate::strategy::Job;
use crate::strategy::context::enter_worker;
use crate::strategy::pool::Shared;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// A worker thread of a [`ThreadPool`](crate::ThreadPool).
///
/// The lookup order is:
/// 1. Pop from the local queue (work-stealing pools only)
/// 2. Take from the global injector
/// 3. Steal from sibling workers
/// 4. Park if no work is available
pub(crate) struct Worker {
    /// Index of the worker inside its pool.
    id: usize,

    /// State shared with the pool and its other workers.
    shared: Arc<Shared>,
}

impl Worker {
    pub(crate) fn new(id: usize, shared: Arc<Shared>) -> Self {
        Self { id, shared }
    }

    /// Runs the worker loop until the pool shuts down.
    pub(crate) fn run(self) {
        enter_worker(self.shared.id(), self.id, || {
            tracing::trace!(worker = self.id, "worker started");

            while !self.shared.injector.is_shutdown() {
                match self.next_job() {
                    Some(job) => self.execute(job),
                    None => self.shared.injector.park(),
                }
            }

            tracing::trace!(worker = self.id, "worker stopped");
        });
    }

    fn execute(&self, job: Job) {
        // Jobs built by this crate never unwind; foreign jobs must not take
        // the worker down with them.
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            tracing::error!(worker = self.id, "job panicked on pool worker");
        }
    }

    fn next_job(&self) -> Option<Job> {
        if let Some(job) = self.shared.locals.get(self.id).and_then(|local| local.pop()) {
            return Some(job);
        }

        if let Some(job) = self.shared.injector.steal() {
            return Some(job);
        }

        self.try_steal()
    }

    /// Attempts to steal a job from a sibling's local queue.
    ///
    /// Siblings are visited round-robin starting after this worker.
    fn try_steal(&self) -> Option<Job> {
        let len = self.shared.locals.len();

        if len <= 1 {
            return None;
        }

        (1..len)
            .map(|offset| (self.id + offset) % len)
            .find_map(|victim| self.shared.locals[victim].steal())
    }
}
