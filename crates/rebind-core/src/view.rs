//! View instances and their rendered output.

use crate::binding;
use crate::error::{RenderError, StateError};
use crate::state::StateContainer;
use crate::value::{FromValue, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of one live view instance.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit of UI whose output is computed from its state container.
///
/// `render` must be a pure function of the values it reads through the
/// [`RenderCx`]: the same values always produce the same output. Props are
/// plain fields of the implementing type, fixed when the view is built.
///
/// Closures of the right shape are views too:
///
/// ```ignore
/// runtime.mount(ViewId(1), [("num", Value::from(0))], |cx: &mut RenderCx<'_>| {
///     let num = cx.get("num")?;
///     cx.line(format_args!("<h1>{num}</h1>"));
///     Ok(())
/// })?;
/// ```
pub trait View: 'static {
    fn render(&self, cx: &mut RenderCx<'_>) -> Result<(), RenderError>;
}

impl<F> View for F
where
    F: Fn(&mut RenderCx<'_>) -> Result<(), RenderError> + 'static,
{
    fn render(&self, cx: &mut RenderCx<'_>) -> Result<(), RenderError> {
        self(cx)
    }
}

/// Relationship between an input element and the value it displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingEdge {
    pub element_id: String,
    pub name: String,
}

/// Immutable snapshot of what a view displays.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderOutput {
    content: String,
    inputs: BTreeMap<String, Value>,
    bindings: Vec<BindingEdge>,
}

impl RenderOutput {
    /// The rendered text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The value shown by a bound input element, if it was bound in this render.
    pub fn input(&self, element_id: &str) -> Option<&Value> {
        self.inputs.get(element_id)
    }

    /// Binding edges recorded during this render, in call order.
    pub fn bindings(&self) -> &[BindingEdge] {
        &self.bindings
    }
}

/// Context handed to [`View::render`].
///
/// Gives read-only access to the view's state and collects the output.
pub struct RenderCx<'a> {
    container: &'a StateContainer,
    output: RenderOutput,
}

impl<'a> RenderCx<'a> {
    pub(crate) fn new(container: &'a StateContainer) -> Self {
        Self {
            container,
            output: RenderOutput::default(),
        }
    }

    pub fn view(&self) -> ViewId {
        self.container.view()
    }

    pub fn get(&self, name: &str) -> Result<Value, StateError> {
        self.container.get(name)
    }

    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T, StateError> {
        self.container.get_as(name)
    }

    /// Read the value a controlled input should display, recording the binding.
    pub fn bind_display(&mut self, element_id: &str, name: &str) -> Result<Value, StateError> {
        let value = binding::bind_display(self.container, element_id, name)?;
        self.output
            .inputs
            .insert(element_id.to_owned(), value.clone());
        self.output.bindings.push(BindingEdge {
            element_id: element_id.to_owned(),
            name: name.to_owned(),
        });
        Ok(value)
    }

    /// Append text to the output.
    pub fn push_str(&mut self, text: &str) {
        self.output.content.push_str(text);
    }

    /// Append a line to the output.
    pub fn line(&mut self, line: impl fmt::Display) {
        use fmt::Write;
        // Writing into a String cannot fail.
        let _ = writeln!(self.output.content, "{line}");
    }

    pub(crate) fn finish(self) -> RenderOutput {
        self.output
    }
}

/// Escape HTML special characters in user-provided text.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
