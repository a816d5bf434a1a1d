//! Memoizing lazy values.

use crate::error::Cause;
use crate::future::catch;

use parking_lot::Mutex;
use std::convert::Infallible;
use std::error::Error as StdError;
use std::fmt;
use std::sync::OnceLock;

type Supplier<T> = Box<dyn FnOnce() -> Result<T, Cause> + Send>;

/// A value computed on first access and cached afterwards.
///
/// The supplier runs at most once, even under concurrent first accesses.
/// Its outcome is cached whether it succeeds or fails (a panic counts as a
/// failure), and every later read returns a reference to the same value.
///
/// # Examples
///
/// ```rust
/// use futura::Lazy;
///
/// let config = Lazy::new(|| vec![1, 2, 3]);
/// assert!(!config.is_evaluated());
///
/// assert_eq!(config.get().len(), 3);
/// assert!(std::ptr::eq(config.get(), config.get()));
/// ```
pub struct Lazy<T> {
    value: OnceLock<Result<T, Cause>>,
    supplier: Mutex<Option<Supplier<T>>>,
}

impl<T> Lazy<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self::try_new(move || Ok::<T, Infallible>(f()))
    }

    pub fn try_new<E, F>(f: F) -> Self
    where
        E: StdError + Send + Sync + 'static,
        F: FnOnce() -> Result<T, E> + Send + 'static,
    {
        Self {
            value: OnceLock::new(),
            supplier: Mutex::new(Some(Box::new(move || f().map_err(Cause::new)))),
        }
    }

    /// Evaluates the supplier if needed and returns the cached outcome.
    pub fn try_get(&self) -> Result<&T, &Cause> {
        self.value
            .get_or_init(|| {
                let supplier = self.supplier.lock().take();

                match supplier {
                    Some(supplier) => catch(supplier),
                    None => Err(Cause::msg("lazy value supplier is no longer available")),
                }
            })
            .as_ref()
    }

    /// Evaluates the supplier if needed and returns the cached value.
    ///
    /// # Panics
    ///
    /// Panics with the cached cause if the supplier failed.
    pub fn get(&self) -> &T {
        match self.try_get() {
            Ok(value) => value,
            Err(cause) => panic!("lazy value failed to initialize: {cause}"),
        }
    }

    /// Returns `true` once the supplier has run.
    pub fn is_evaluated(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T: fmt::Debug> fmt::Debug for Lazy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.get() {
            Some(Ok(value)) => f.debug_tuple("Lazy").field(value).finish(),
            Some(Err(cause)) => f.debug_tuple("Lazy").field(cause).finish(),
            None => f.write_str("Lazy(<unevaluated>)"),
        }
    }
}
