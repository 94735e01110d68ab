//! Core types for rebind: per-view state, batched re-rendering and
//! controlled-input binding.
//!
//! A view instance owns a [`StateContainer`]. Event handlers change values
//! only through [`StateContainer::update`], which marks the view as pending
//! without rendering. [`RenderTrigger::flush`] then recomputes every pending
//! view once. Inputs bound with [`RenderCx::bind_display`] always show the
//! stored value, and [`binding::on_change`] writes edits back through the
//! same update path.

pub mod binding;
pub mod error;
pub mod events;
pub mod state;
pub mod trigger;
pub mod value;
pub mod view;

pub use error::{RenderError, StateError};
pub use events::{
    ChangeEvent, ClickEvent, HandlerRegistry, KeyEvent, RawValue, SubmitEvent, UiEvent,
};
pub use state::{SlotMeta, StateContainer, Update, UpdateRequest};
pub use trigger::{ErrorSink, FlushReport, PendingQueue, RenderStatus, RenderTrigger};
pub use value::{FromValue, Value, ValueKind};
pub use view::{escape_html, BindingEdge, RenderCx, RenderOutput, View, ViewId};
