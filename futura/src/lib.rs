//! # Futura
//!
//! **Futura** is a small future-combinator layer for the **Nebula** ecosystem.
//!
//! Work is submitted through a [`FutureBuilder`] bound to an execution
//! [`Strategy`] (a bounded FIFO pool or a work-stealing pool sized to the
//! machine). Each submission returns a [`FutureHandle`] that can be chained
//! with `map` / `flat_map` and finally folded with a blocking `get`, which
//! turns success, failure and timeout into a single value.
//!
//! It offers:
//!
//! - **Explicit execution strategies** that can be injected anywhere, with a
//!   process-wide work-stealing default
//! - **Chaining** where every step is a new submission and failures
//!   short-circuit the rest of the chain
//! - **A unified failure type**, [`FutureError`], carrying the original cause
//! - **Timed retrieval** that never cancels the underlying work
//! - **Memoizing lazy values** via [`Lazy`]
//!
//! ## Quick Start
//!
//! ```rust
//! use futura::{FutureBuilder, Strategy};
//! use std::time::Duration;
//!
//! let builder = FutureBuilder::build_with(Strategy::bounded(1));
//!
//! let length = builder
//!     .run(|| String::from("future"))
//!     .map(|s| s.len())
//!     .get_timeout(|n| n as i64, |_| -1, Duration::from_secs(5));
//!
//! assert_eq!(length, 6);
//! ```
//!
//! ## Modules
//!
//! - [`strategy`] — Execution strategies and the worker pools behind them
//! - [`future`] — The composable [`FutureHandle`]
//! - [`error`] — [`FutureError`] and its [`Cause`]
//! - [`lazy`] — Memoizing lazy values

mod builder;

pub mod error;
pub mod future;
pub mod lazy;
pub mod strategy;

pub use builder::FutureBuilder;
pub use error::{Cause, ErrorKind, FutureError, Panicked, SubmissionRejected};
pub use future::FutureHandle;
pub use lazy::Lazy;
pub use strategy::{Executor, Job, PoolBuilder, Scheduling, Strategy, ThreadPool};
