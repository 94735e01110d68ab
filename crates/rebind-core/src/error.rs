//! Error types for state access and rendering.

use crate::value::ValueKind;
use crate::view::ViewId;
use thiserror::Error;

/// Errors raised by state container and binding operations.
///
/// These propagate synchronously to whoever called the operation, usually
/// an event handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The name was never initialized in this view's container.
    #[error("unknown state key `{name}` in view {view}")]
    UnknownKey { view: ViewId, name: String },

    /// `init` was called twice for the same name.
    #[error("state key `{name}` is already initialized in view {view}")]
    DuplicateKey { view: ViewId, name: String },

    /// A value of the wrong kind was read or written.
    #[error("state key `{name}` holds {found}, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// A raw input value could not be translated into the stored kind.
    #[error("cannot store {raw:?} in `{name}` ({kind})")]
    InvalidInput {
        name: String,
        raw: String,
        kind: ValueKind,
    },
}

/// A failure while computing a view's output.
///
/// Caught per view during flush: the view is parked in
/// [`RenderStatus::Errored`](crate::RenderStatus::Errored) and its siblings
/// keep rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The render function hit a state error, e.g. read an unknown key.
    #[error(transparent)]
    State(#[from] StateError),

    /// The render function reported its own failure.
    #[error("render failed: {0}")]
    Failed(String),
}

impl RenderError {
    pub fn failed(message: impl Into<String>) -> Self {
        RenderError::Failed(message.into())
    }
}
