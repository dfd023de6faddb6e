use std::fmt;
use std::sync::Arc;

/// Failure of [`materialize`](crate::materialize) or
/// [`reconcile`](crate::reconcile). Nothing is rolled back: the host tree
/// keeps every mutation applied before the failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Error<E> {
    /// The host adapter rejected a mutation.
    Host(E),
    /// No host node sits at the position the old tree says it should.
    MissingChild { index: usize },
    /// A prop value does not fit its key (e.g. a handler under `title`).
    InvalidProp { key: Arc<str>, reason: &'static str },
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Host(error) => write!(f, "host error: {error}"),
            Error::MissingChild { index } => write!(f, "no host node at child index {index}"),
            Error::InvalidProp { key, reason } => write!(f, "invalid prop `{key}`: {reason}"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for Error<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Host(error) => Some(error),
            _ => None,
        }
    }
}
