//! Boundary events and the handler registry.
//!
//! The surrounding rendering layer reports what happened to an element as a
//! [`UiEvent`]. Change events go straight to the binding adapter; clicks, key
//! presses and submits are looked up in a [`HandlerRegistry`] keyed by view
//! and element id.

use crate::error::StateError;
use crate::state::StateContainer;
use crate::value::ValueKind;
use crate::view::ViewId;
use std::collections::HashMap;

/// The raw value a bound element reports on change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Contents of a text-like field.
    Text(String),
    /// Checked state of a checkbox.
    Checked(bool),
}

impl RawValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            RawValue::Text(_) => ValueKind::Text,
            RawValue::Checked(_) => ValueKind::Bool,
        }
    }
}

impl From<&str> for RawValue {
    fn from(text: &str) -> Self {
        RawValue::Text(text.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(text: String) -> Self {
        RawValue::Text(text)
    }
}

impl From<bool> for RawValue {
    fn from(checked: bool) -> Self {
        RawValue::Checked(checked)
    }
}

/// A bound element changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub element_id: String,
    pub name: String,
    pub raw: RawValue,
}

impl ChangeEvent {
    pub fn new(
        element_id: impl Into<String>,
        name: impl Into<String>,
        raw: impl Into<RawValue>,
    ) -> Self {
        Self {
            element_id: element_id.into(),
            name: name.into(),
            raw: raw.into(),
        }
    }
}

/// A key was pressed inside an element. Read-only for handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub element_id: String,
    pub key: String,
}

impl KeyEvent {
    pub fn new(element_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            key: key.into(),
        }
    }
}

/// An element was clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub element_id: String,
}

impl ClickEvent {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }
}

/// A form was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitEvent {
    pub form_id: String,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            default_prevented: false,
        }
    }

    /// Suppress the default navigate-and-reload behavior.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Any event the rendering layer can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Change(ChangeEvent),
    Key(KeyEvent),
    Click(ClickEvent),
    Submit(SubmitEvent),
}

impl UiEvent {
    /// Id of the element (or form) the event targets.
    pub fn target(&self) -> &str {
        match self {
            UiEvent::Change(e) => &e.element_id,
            UiEvent::Key(e) => &e.element_id,
            UiEvent::Click(e) => &e.element_id,
            UiEvent::Submit(e) => &e.form_id,
        }
    }
}

impl From<ChangeEvent> for UiEvent {
    fn from(e: ChangeEvent) -> Self {
        UiEvent::Change(e)
    }
}

impl From<KeyEvent> for UiEvent {
    fn from(e: KeyEvent) -> Self {
        UiEvent::Key(e)
    }
}

impl From<ClickEvent> for UiEvent {
    fn from(e: ClickEvent) -> Self {
        UiEvent::Click(e)
    }
}

impl From<SubmitEvent> for UiEvent {
    fn from(e: SubmitEvent) -> Self {
        UiEvent::Submit(e)
    }
}

/// Click handler. May update the view's state.
pub type ClickHandler = Box<dyn Fn(&mut StateContainer, &ClickEvent) -> Result<(), StateError>>;

/// Key handler. Observes the event only.
pub type KeyHandler = Box<dyn Fn(&KeyEvent)>;

/// Submit handler. Runs after default navigation has been suppressed.
pub type SubmitHandler = Box<dyn Fn(&mut StateContainer, &SubmitEvent) -> Result<(), StateError>>;

type HandlerKey = (ViewId, String);

/// Registry that maps (view, element id) pairs to callbacks.
#[derive(Default)]
pub struct HandlerRegistry {
    click: HashMap<HandlerKey, ClickHandler>,
    key: HashMap<HandlerKey, KeyHandler>,
    submit: HashMap<HandlerKey, SubmitHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a click handler, replacing any previous one for the element.
    pub fn register_click<F>(&mut self, view: ViewId, element_id: impl Into<String>, handler: F)
    where
        F: Fn(&mut StateContainer, &ClickEvent) -> Result<(), StateError> + 'static,
    {
        self.click.insert((view, element_id.into()), Box::new(handler));
    }

    pub fn register_key<F>(&mut self, view: ViewId, element_id: impl Into<String>, handler: F)
    where
        F: Fn(&KeyEvent) + 'static,
    {
        self.key.insert((view, element_id.into()), Box::new(handler));
    }

    pub fn register_submit<F>(&mut self, view: ViewId, form_id: impl Into<String>, handler: F)
    where
        F: Fn(&mut StateContainer, &SubmitEvent) -> Result<(), StateError> + 'static,
    {
        self.submit.insert((view, form_id.into()), Box::new(handler));
    }

    pub fn click(&self, view: ViewId, element_id: &str) -> Option<&ClickHandler> {
        self.click.get(&(view, element_id.to_owned()))
    }

    pub fn key(&self, view: ViewId, element_id: &str) -> Option<&KeyHandler> {
        self.key.get(&(view, element_id.to_owned()))
    }

    pub fn submit(&self, view: ViewId, form_id: &str) -> Option<&SubmitHandler> {
        self.submit.get(&(view, form_id.to_owned()))
    }

    /// Drop every handler registered for a view.
    pub fn clear_view(&mut self, view: ViewId) {
        self.click.retain(|(v, _), _| *v != view);
        self.key.retain(|(v, _), _| *v != view);
        self.submit.retain(|(v, _), _| *v != view);
    }

    /// Get the number of registered handlers (for debugging).
    pub fn handler_count(&self) -> usize {
        self.click.len() + self.key.len() + self.submit.len()
    }
}
