//! Failure taxonomy shared by every future handle.
//!
//! All failure modes are folded into [`FutureError`], which is handed to the
//! `on_failure` side of [`FutureHandle::get`](crate::FutureHandle::get).

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Failure observed at a blocking retrieval point.
#[derive(Debug, Clone, Error)]
pub enum FutureError {
    /// The submitted computation returned an error or panicked.
    #[error("{0}")]
    Computation(#[source] Cause),

    /// A `map`/`flat_map` step failed while processing a successful parent.
    #[error("{0}")]
    Continuation(#[source] Cause),

    /// The execution strategy refused (or discarded) the work.
    #[error("submission rejected: execution strategy is shut down")]
    Rejected,

    /// A timed retrieval expired before the handle resolved.
    #[error("deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),
}

impl FutureError {
    /// Returns the kind of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FutureError::Computation(_) => ErrorKind::Computation,
            FutureError::Continuation(_) => ErrorKind::Continuation,
            FutureError::Rejected => ErrorKind::Rejected,
            FutureError::DeadlineExceeded(_) => ErrorKind::DeadlineExceeded,
        }
    }

    /// Returns the original cause for computation and continuation failures.
    pub fn cause(&self) -> Option<&Cause> {
        match self {
            FutureError::Computation(cause) | FutureError::Continuation(cause) => Some(cause),
            FutureError::Rejected | FutureError::DeadlineExceeded(_) => None,
        }
    }

    /// Returns `true` if a timed retrieval gave up before the handle resolved.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, FutureError::DeadlineExceeded(_))
    }
}

impl From<SubmissionRejected> for FutureError {
    fn from(_: SubmissionRejected) -> Self {
        FutureError::Rejected
    }
}

/// Discriminant of a [`FutureError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`FutureError::Computation`].
    Computation,
    /// See [`FutureError::Continuation`].
    Continuation,
    /// See [`FutureError::Rejected`].
    Rejected,
    /// See [`FutureError::DeadlineExceeded`].
    DeadlineExceeded,
}

impl ErrorKind {
    /// Stable name of the kind, suitable for logs and assertions.
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Computation => "ComputationFailed",
            ErrorKind::Continuation => "ContinuationFailed",
            ErrorKind::Rejected => "SubmissionRejected",
            ErrorKind::DeadlineExceeded => "DeadlineExceeded",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned by an [`Executor`](crate::Executor) that no longer accepts work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("execution strategy rejected the submission")]
pub struct SubmissionRejected;

/// Error produced from the payload of a panicking computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Panicked {
    message: String,
}

impl Panicked {
    /// The panic message, or a placeholder for non-string payloads.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
struct Message(String);

/// Shared handle to the original error behind a failure.
///
/// `Cause` keeps the user's error intact so it can be inspected with
/// [`downcast_ref`](Self::downcast_ref) on the failure side of a fold.
#[derive(Clone)]
pub struct Cause(Arc<dyn StdError + Send + Sync + 'static>);

impl Cause {
    /// Wraps a typed error.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Cause(Arc::new(error))
    }

    /// Creates a cause carrying only a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Cause::new(Message(message.into()))
    }

    /// Takes ownership of an already boxed error, such as the output of
    /// `"message".into()` or of `?` into `Box<dyn Error + Send + Sync>`.
    pub fn from_boxed(error: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        Cause(Arc::from(error))
    }

    /// Converts a payload caught by `catch_unwind` into a [`Panicked`] cause.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "computation panicked".to_owned()
        };

        Cause::new(Panicked { message })
    }

    /// Returns the original error if it is of type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        self.0.downcast_ref::<E>()
    }

    /// Returns `true` if the original error is of type `E`.
    pub fn is<E>(&self) -> bool
    where
        E: StdError + 'static,
    {
        self.0.is::<E>()
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl StdError for Cause {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}
