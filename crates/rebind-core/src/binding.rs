//! Controlled-input binding.
//!
//! An input element bound to a name always displays the container's value
//! and writes every change back through [`StateContainer::update`]. There is
//! no short-circuit for unchanged values: each change event is one update
//! and one notify, so the display is always sourced from state.

use crate::error::StateError;
use crate::events::{RawValue, SubmitEvent};
use crate::state::StateContainer;
use crate::value::{Value, ValueKind};

/// Read the value an input element should display.
///
/// Called during rendering, usually through
/// [`RenderCx::bind_display`](crate::RenderCx::bind_display).
pub fn bind_display(
    container: &StateContainer,
    element_id: &str,
    name: &str,
) -> Result<Value, StateError> {
    let value = container.get(name)?;
    tracing::trace!("bind {} -> `{}` = {:?}", element_id, name, value);
    Ok(value)
}

/// Write a change reported by a bound element back into state.
///
/// Text goes into text values, checked state into boolean values, and text
/// into integer values when it parses as one.
pub fn on_change(
    container: &mut StateContainer,
    element_id: &str,
    name: &str,
    raw: RawValue,
) -> Result<(), StateError> {
    let current = container.get(name)?;
    let next = translate(name, current.kind(), raw)?;
    tracing::debug!("change from {} -> `{}`", element_id, name);
    container.update(name, next)
}

/// Run a submit handler for a form.
///
/// Default navigation is suppressed before the handler runs. Any state change
/// (such as clearing a bound field) is the handler's own `update` call.
pub fn on_submit<H>(
    form_id: &str,
    event: &mut SubmitEvent,
    container: &mut StateContainer,
    handler: H,
) -> Result<(), StateError>
where
    H: FnOnce(&mut StateContainer, &SubmitEvent) -> Result<(), StateError>,
{
    event.prevent_default();
    tracing::debug!("submit {}", form_id);
    handler(container, event)
}

fn translate(name: &str, kind: ValueKind, raw: RawValue) -> Result<Value, StateError> {
    match (kind, raw) {
        (ValueKind::Text, RawValue::Text(text)) => Ok(Value::Text(text)),
        (ValueKind::Bool, RawValue::Checked(checked)) => Ok(Value::Bool(checked)),
        (ValueKind::Int, RawValue::Text(text)) => {
            text.trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| StateError::InvalidInput {
                    name: name.to_owned(),
                    raw: text,
                    kind,
                })
        }
        (kind, raw) => Err(StateError::TypeMismatch {
            name: name.to_owned(),
            expected: kind,
            found: raw.kind(),
        }),
    }
}
