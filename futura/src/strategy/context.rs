use std::cell::Cell;

thread_local! {
    /// Pool identity and worker index of the current thread.
    ///
    /// Set for the whole lifetime of a pool worker, so a submission made
    /// from inside a running job can be routed to that worker's local queue.
    static CURRENT_WORKER: Cell<Option<(usize, usize)>> = const { Cell::new(None) };
}

/// Runs `f` with the current thread registered as worker `id` of `pool`.
///
/// The previous registration is restored afterwards.
pub(crate) fn enter_worker<R>(pool: usize, id: usize, f: impl FnOnce() -> R) -> R {
    CURRENT_WORKER.with(|current| {
        let previous = current.replace(Some((pool, id)));
        let out = f();
        current.set(previous);
        out
    })
}

/// Returns the worker index of the current thread if it belongs to `pool`.
pub(crate) fn current_worker(pool: usize) -> Option<usize> {
    CURRENT_WORKER.with(|current| match current.get() {
        Some((owner, id)) if owner == pool => Some(id),
        _ => None,
    })
}
