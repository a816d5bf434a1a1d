use crate::strategy::Job;
use crate::strategy::work_stealing::injector::Injector;

use parking_lot::Mutex;
use std::collections::VecDeque;

/// A per-worker local job queue.
///
/// The owning worker pushes and pops at the back (LIFO), which keeps a
/// freshly chained continuation on the thread that produced its input.
/// Siblings steal from the front (FIFO).
pub(crate) struct LocalQueue {
    inner: Mutex<VecDeque<Job>>,
}

impl LocalQueue {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    /// Pushes a job unless the pool is closed, then wakes a parked sibling
    /// so it can steal.
    pub(crate) fn push(&self, job: Job, injector: &Injector) -> Result<(), Job> {
        let mut inner = self.inner.lock();

        if injector.is_shutdown() {
            return Err(job);
        }

        inner.push_back(job);
        drop(inner);

        injector.notify();
        Ok(())
    }

    pub(crate) fn pop(&self) -> Option<Job> {
        self.inner.lock().pop_back()
    }

    pub(crate) fn steal(&self) -> Option<Job> {
        self.inner.lock().pop_front()
    }

    /// Removes every queued job.
    pub(crate) fn drain(&self) -> Vec<Job> {
        self.inner.lock().drain(..).collect()
    }
}
