use crate::strategy::Job;

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Upper bound on how long an idle worker sleeps before re-checking the
/// sibling queues, which are pushed without holding the injector lock.
const PARK_TIMEOUT: Duration = Duration::from_millis(10);

/// Global job queue of a pool.
///
/// Jobs are taken from the front, so submissions made from outside the pool
/// are started in the order they were accepted. The injector also owns the
/// closed flag: once it is set, no queue of the pool accepts new jobs.
pub(crate) struct Injector {
    /// Jobs waiting for a worker.
    queue: Mutex<VecDeque<Job>>,

    /// Wakes workers parked on an empty queue.
    condvar: Condvar,

    /// Set once the pool stops accepting work.
    shutdown: AtomicBool,
}

impl Injector {
    pub(crate) fn new() -> Self {
        Injector {
            queue: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Enqueues a job and wakes one parked worker.
    ///
    /// The closed flag is checked under the queue lock, so a job is either
    /// accepted before [`shutdown`](Self::shutdown) drains the queue or handed
    /// back to the caller.
    pub(crate) fn push(&self, job: Job) -> Result<(), Job> {
        let mut queue = self.queue.lock();

        if self.is_shutdown() {
            return Err(job);
        }

        queue.push_back(job);
        drop(queue);

        self.condvar.notify_one();
        Ok(())
    }

    /// Wakes one parked worker without enqueueing anything.
    pub(crate) fn notify(&self) {
        self.condvar.notify_one();
    }

    /// Takes the oldest job, if any.
    pub(crate) fn steal(&self) -> Option<Job> {
        self.queue.lock().pop_front()
    }

    /// Parks the current worker until a job is pushed, the pool shuts down,
    /// or [`PARK_TIMEOUT`] elapses.
    pub(crate) fn park(&self) {
        let mut queue = self.queue.lock();

        if self.is_shutdown() || !queue.is_empty() {
            return;
        }

        let _ = self.condvar.wait_for(&mut queue, PARK_TIMEOUT);
    }

    /// Closes the injector, wakes every worker and returns the jobs that were
    /// still queued.
    ///
    /// The returned jobs must be dropped by the caller after every queue lock
    /// has been released: dropping a job may resolve handles whose
    /// continuations submit again.
    pub(crate) fn shutdown(&self) -> Vec<Job> {
        let mut queue = self.queue.lock();
        self.shutdown.store(true, Ordering::Release);

        let drained = queue.drain(..).collect();
        drop(queue);

        self.condvar.notify_all();
        drained
    }
}
