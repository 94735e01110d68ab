//! Rebind - a minimal reactive state and render core.
//!
//! Each mounted view owns a state container of named values. Handlers change
//! those values only through `update`, the runtime recomputes each touched
//! view once after the handler returns, and controlled inputs always display
//! what the container holds.
//!
//! # Quick Start
//!
//! ```ignore
//! use rebind::prelude::*;
//!
//! struct Counter;
//!
//! impl View for Counter {
//!     fn render(&self, cx: &mut RenderCx<'_>) -> Result<(), RenderError> {
//!         let num = cx.get_as::<i64>("num")?;
//!         cx.line(format_args!("<h1>{num}</h1>"));
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), rebind::Error> {
//!     rebind::init_tracing();
//!
//!     let counter = ViewId(1);
//!     let mut runtime = Runtime::new();
//!     runtime.mount(counter, [("num", 0)], Counter)?;
//!     runtime.on_click(counter, "inc", |state, _| {
//!         state.update_with::<i64>("num", |n| n + 1)
//!     })?;
//!
//!     runtime.dispatch(counter, ClickEvent::new("inc"))?;
//!     assert_eq!(runtime.output(counter).unwrap().content(), "<h1>1</h1>\n");
//!     Ok(())
//! }
//! ```
//!
//! # Controlled inputs
//!
//! Bind an input during render with [`RenderCx::bind_display`] and route
//! its change events through [`Runtime::dispatch`]:
//!
//! ```ignore
//! let title = cx.bind_display("title-input", "title")?;
//! // ...
//! runtime.dispatch(form, ChangeEvent::new("title-input", "title", "Abhishek"))?;
//! ```

pub mod config;
pub mod error;
pub mod runtime;

pub mod prelude {
    //! Common imports for rebind applications.
    pub use crate::config::{FlushMode, RuntimeConfig};
    pub use crate::error::Error;
    pub use crate::runtime::Runtime;
    pub use rebind_core::{
        escape_html, ChangeEvent, ClickEvent, KeyEvent, RawValue, RenderCx, RenderError,
        RenderOutput, RenderStatus, StateContainer, StateError, SubmitEvent, UiEvent, Update,
        Value, View, ViewId,
    };
}

pub use config::{FlushMode, RuntimeConfig};
pub use error::{Error, Result};
pub use runtime::Runtime;

pub use rebind_core as core;

/// Install the default `tracing` subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}
