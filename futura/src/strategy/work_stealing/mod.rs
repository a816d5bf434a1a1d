//! Queues shared by the pool workers.
//!
//! - [`injector`]: the global queue every external submission lands in,
//!   which also parks idle workers,
//! - [`queue`]: per-worker local queues used by the work-stealing mode.
//!
//! A FIFO pool only uses the injector.

pub(crate) mod injector;
pub(crate) mod queue;
