//! Injected diagnostic sink.
//!
//! The translation functions never read logger state of their own. Callers
//! pass a [`MessageLog`], which either routes `tracing` events to a specific
//! [`Dispatch`] or leaves them to whatever subscriber the caller installed.
//! Logging is advisory: results never depend on it.

use tracing::subscriber::NoSubscriber;
use tracing::Dispatch;

/// Where translation events go: a specific dispatcher, or the caller's
/// current default when none is set.
#[derive(Clone, Debug, Default)]
pub struct MessageLog {
    dispatch: Option<Dispatch>,
}

impl MessageLog {
    /// Send events to `dispatch`.
    #[must_use]
    pub fn new(dispatch: Dispatch) -> Self {
        Self {
            dispatch: Some(dispatch),
        }
    }

    /// Discard every event.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Dispatch::new(NoSubscriber::default()))
    }

    /// Use the caller's current default subscriber.
    #[must_use]
    pub fn current() -> Self {
        Self { dispatch: None }
    }

    /// Run `f` with this log's dispatcher as the default.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }
}

impl From<Dispatch> for MessageLog {
    fn from(dispatch: Dispatch) -> Self {
        Self::new(dispatch)
    }
}
