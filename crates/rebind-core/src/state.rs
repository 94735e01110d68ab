//! Per-view state containers.
//!
//! A [`StateContainer`] maps names to [`Value`]s for exactly one view
//! instance. Values are only ever replaced, through [`StateContainer::update`]
//! or one of its shorthands, and every successful replacement posts a notify
//! for the owning view. The container never renders anything itself.
//!
//! ```ignore
//! let mut state = StateContainer::new(ViewId(1));
//! state.init("num", 0)?;
//!
//! state.update_with::<i64>("num", |n| n + 1)?;
//! assert_eq!(state.get_as::<i64>("num")?, 1);
//!
//! state.update_with::<i64>("num", |n| n - 5)?;
//! assert_eq!(state.get_as::<i64>("num")?, -4);
//! ```

use crate::error::StateError;
use crate::trigger::PendingQueue;
use crate::value::{FromValue, Value, ValueKind};
use crate::view::ViewId;
use std::collections::BTreeMap;
use std::fmt;

/// How to compute the replacement value in an update.
pub enum Update {
    /// Store this value.
    Replace(Value),
    /// Store `f(current)`.
    Apply(Box<dyn FnOnce(Value) -> Value>),
}

impl Update {
    pub fn apply(f: impl FnOnce(Value) -> Value + 'static) -> Self {
        Update::Apply(Box::new(f))
    }
}

macro_rules! replace_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Update {
                fn from(value: $ty) -> Self {
                    Update::Replace(value.into())
                }
            }
        )*
    };
}

replace_from!(Value, i64, i32, bool, String, &str);

impl fmt::Debug for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Update::Replace(value) => f.debug_tuple("Replace").field(value).finish(),
            Update::Apply(_) => f.write_str("Apply(..)"),
        }
    }
}

/// A pending change to one named value, produced by an event handler.
///
/// Applying it consumes it, so a request takes effect at most once.
#[derive(Debug)]
pub struct UpdateRequest {
    pub name: String,
    pub update: Update,
}

impl UpdateRequest {
    pub fn new(name: impl Into<String>, update: impl Into<Update>) -> Self {
        Self {
            name: name.into(),
            update: update.into(),
        }
    }
}

/// Debug description of a stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMeta {
    pub name: String,
    pub kind: ValueKind,
}

/// The named values owned by one view instance.
pub struct StateContainer {
    view: ViewId,
    values: BTreeMap<String, Value>,
    pending: PendingQueue,
}

impl StateContainer {
    /// Create an empty, detached container for `view`.
    ///
    /// Updates reach a render trigger only once the container has been
    /// handed to [`RenderTrigger::insert`](crate::RenderTrigger::insert).
    pub fn new(view: ViewId) -> Self {
        Self::with_queue(view, PendingQueue::default())
    }

    pub(crate) fn with_queue(view: ViewId, pending: PendingQueue) -> Self {
        Self {
            view,
            values: BTreeMap::new(),
            pending,
        }
    }

    pub(crate) fn attach(&mut self, pending: PendingQueue) {
        self.pending = pending;
    }

    /// Cut the link to the trigger queue. Later updates notify nobody.
    pub(crate) fn detach(&mut self) {
        self.pending = PendingQueue::default();
    }

    /// The view instance that owns this container.
    pub fn view(&self) -> ViewId {
        self.view
    }

    /// Register a value. Fails if the name is already taken.
    pub fn init(
        &mut self,
        name: impl Into<String>,
        initial: impl Into<Value>,
    ) -> Result<(), StateError> {
        let name = name.into();
        if self.values.contains_key(&name) {
            return Err(StateError::DuplicateKey {
                view: self.view,
                name,
            });
        }
        self.values.insert(name, initial.into());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Value, StateError> {
        self.slot(name).cloned()
    }

    /// Read a value as a concrete Rust type.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T, StateError> {
        let value = self.get(name)?;
        T::from_value(value).map_err(|found| StateError::TypeMismatch {
            name: name.to_owned(),
            expected: T::KIND,
            found: found.kind(),
        })
    }

    /// Replace a value, then notify the render trigger.
    ///
    /// Storing a value equal to the current one still notifies. On error
    /// nothing is stored and nothing is notified.
    pub fn update(&mut self, name: &str, update: impl Into<Update>) -> Result<(), StateError> {
        let current = self.slot(name)?;
        let kind = current.kind();
        let next = match update.into() {
            Update::Replace(value) => value,
            Update::Apply(f) => f(current.clone()),
        };
        if next.kind() != kind {
            return Err(StateError::TypeMismatch {
                name: name.to_owned(),
                expected: kind,
                found: next.kind(),
            });
        }

        if let Some(slot) = self.values.get_mut(name) {
            *slot = next;
        }
        self.pending.mark(self.view);
        tracing::debug!("view {}: updated `{}`", self.view, name);
        Ok(())
    }

    /// Shorthand for a plain-value update.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), StateError> {
        self.update(name, Update::Replace(value.into()))
    }

    /// Shorthand for a functional update over a concrete Rust type.
    pub fn update_with<T: FromValue>(
        &mut self,
        name: &str,
        f: impl FnOnce(T) -> T,
    ) -> Result<(), StateError> {
        let current = self.get_as::<T>(name)?;
        self.set(name, f(current))
    }

    /// Consume an update request.
    pub fn apply(&mut self, request: UpdateRequest) -> Result<(), StateError> {
        self.update(&request.name, request.update)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Names of all registered values, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Describe every stored value, for inspection tooling.
    pub fn debug_info(&self) -> Vec<SlotMeta> {
        self.values
            .iter()
            .map(|(name, value)| SlotMeta {
                name: name.clone(),
                kind: value.kind(),
            })
            .collect()
    }

    fn slot(&self, name: &str) -> Result<&Value, StateError> {
        self.values.get(name).ok_or_else(|| StateError::UnknownKey {
            view: self.view,
            name: name.to_owned(),
        })
    }
}

impl fmt::Debug for StateContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateContainer")
            .field("view", &self.view)
            .field("values", &self.values)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container() -> (StateContainer, PendingQueue) {
        let pending = PendingQueue::default();
        (StateContainer::with_queue(ViewId(1), pending.clone()), pending)
    }

    #[test]
    fn counter_scenario() {
        let (mut state, _) = container();
        state.init("num", 0).unwrap();

        state.update_with::<i64>("num", |n| n + 1).unwrap();
        assert_eq!(state.get("num").unwrap(), Value::Int(1));

        state.update_with::<i64>("num", |n| n - 5).unwrap();
        assert_eq!(state.get("num").unwrap(), Value::Int(-4));
    }

    #[test]
    fn functional_update_reads_current_value() {
        let (mut state, _) = container();
        state.init("num", 3).unwrap();

        state
            .update("num", Update::apply(|v| Value::Int(v.as_int().unwrap_or(0) + 5)))
            .unwrap();
        assert_eq!(state.get_as::<i64>("num").unwrap(), 8);
    }

    #[test]
    fn plain_update_replaces_value() {
        let (mut state, _) = container();
        state.init("title", "").unwrap();

        state.update("title", "Abhishek").unwrap();
        assert_eq!(state.get_as::<String>("title").unwrap(), "Abhishek");
    }

    #[test]
    fn duplicate_init_fails() {
        let (mut state, _) = container();
        state.init("num", 0).unwrap();

        let err = state.init("num", 1).unwrap_err();
        assert_eq!(
            err,
            StateError::DuplicateKey {
                view: ViewId(1),
                name: "num".into(),
            }
        );
        assert_eq!(state.get_as::<i64>("num").unwrap(), 0);
    }

    #[test]
    fn unknown_key_leaves_other_values_alone() {
        let (mut state, pending) = container();
        state.init("num", 7).unwrap();

        let err = state.set("missing", 1).unwrap_err();
        assert!(matches!(err, StateError::UnknownKey { ref name, .. } if name == "missing"));
        assert_eq!(state.get_as::<i64>("num").unwrap(), 7);
        assert!(pending.is_empty());
        assert!(state.get("missing").is_err());
    }

    #[test]
    fn same_value_update_still_notifies() {
        let (mut state, pending) = container();
        state.init("title", "same").unwrap();

        state.set("title", "same").unwrap();
        assert!(pending.contains(ViewId(1)));
    }

    #[test]
    fn updates_coalesce_into_one_mark() {
        let (mut state, pending) = container();
        state.init("num", 0).unwrap();
        state.init("title", "").unwrap();

        state.update_with::<i64>("num", |n| n + 1).unwrap();
        state.update_with::<i64>("num", |n| n + 1).unwrap();
        state.set("title", "x").unwrap();

        assert_eq!(pending.len(), 1);
        assert_eq!(state.get_as::<i64>("num").unwrap(), 2);
    }

    #[test]
    fn kind_changes_are_rejected() {
        let (mut state, pending) = container();
        state.init("num", 0).unwrap();

        let err = state.set("num", "zero").unwrap_err();
        assert_eq!(
            err,
            StateError::TypeMismatch {
                name: "num".into(),
                expected: ValueKind::Int,
                found: ValueKind::Text,
            }
        );
        assert!(pending.is_empty());

        let err = state.get_as::<bool>("num").unwrap_err();
        assert!(matches!(err, StateError::TypeMismatch { .. }));
    }

    #[test]
    fn apply_consumes_request() {
        let (mut state, _) = container();
        state.init("checked", false).unwrap();

        state.apply(UpdateRequest::new("checked", true)).unwrap();
        assert_eq!(state.get_as::<bool>("checked").unwrap(), true);
    }

    #[test]
    fn debug_info_lists_slots() {
        let (mut state, _) = container();
        state.init("title", "").unwrap();
        state.init("num", 0).unwrap();

        let names: Vec<_> = state.names().collect();
        assert_eq!(names, vec!["num", "title"]);
        assert_eq!(
            state.debug_info(),
            vec![
                SlotMeta {
                    name: "num".into(),
                    kind: ValueKind::Int,
                },
                SlotMeta {
                    name: "title".into(),
                    kind: ValueKind::Text,
                },
            ]
        );
    }
}
