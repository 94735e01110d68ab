//! Runtime errors.

use rebind_core::{StateError, ViewId};
use thiserror::Error;

/// Errors returned by [`Runtime`](crate::Runtime) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A state operation failed inside a handler or lifecycle call.
    #[error(transparent)]
    State(#[from] StateError),

    /// No view with this id is mounted.
    #[error("view {0} is not mounted")]
    UnknownView(ViewId),

    /// `mount` was called for an id that is already live.
    #[error("view {0} is already mounted")]
    AlreadyMounted(ViewId),

    /// An event targeted an element with no registered handler.
    #[error("no {kind} handler for `{target}` in view {view}")]
    NoHandler {
        view: ViewId,
        kind: &'static str,
        target: String,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
