//! Statistics callbacks for warning and error events

use std::fmt;
use std::sync::Arc;

/// Callback receiving the unprefixed, unmarked message of a warning or error
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use std::sync::Arc;
/// use svclog::stat_fn;
///
/// let errors = Arc::new(AtomicU64::new(0));
/// let counter = Arc::clone(&errors);
/// let hook = stat_fn(move |_args| {
///     counter.fetch_add(1, Ordering::Relaxed);
/// });
/// hook(format_args!("disk {} is full", "/dev/sda1"));
/// assert_eq!(errors.load(Ordering::Relaxed), 1);
/// ```
pub type StatFn = Arc<dyn Fn(fmt::Arguments<'_>) + Send + Sync>;

/// Wrap a closure into a [`StatFn`]
pub fn stat_fn<F>(f: F) -> StatFn
where
    F: Fn(fmt::Arguments<'_>) + Send + Sync + 'static,
{
    Arc::new(f)
}

#[derive(Clone, Default)]
pub(crate) struct StatHooks {
    pub error: Option<StatFn>,
    pub warning: Option<StatFn>,
}

impl StatHooks {
    pub fn new(error: Option<StatFn>, warning: Option<StatFn>) -> Self {
        Self { error, warning }
    }
}

impl fmt::Debug for StatHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatHooks")
            .field("error", &self.error.is_some())
            .field("warning", &self.warning.is_some())
            .finish()
    }
}
