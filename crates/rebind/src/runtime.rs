//! Runtime - view lifecycle, event dispatch and flush scheduling.

use crate::config::{FlushMode, RuntimeConfig};
use crate::error::{Error, Result};
use rebind_core::binding;
use rebind_core::{
    ClickEvent, FlushReport, FromValue, HandlerRegistry, KeyEvent, RenderError, RenderOutput,
    RenderStatus, RenderTrigger, StateContainer, StateError, SubmitEvent, UiEvent, Value, View,
    ViewId,
};

/// Owns every mounted view and routes boundary events to them.
///
/// All work happens on the calling thread. A dispatched event runs its
/// handler to completion first; the views it touched are then recomputed
/// once each, according to the configured [`FlushMode`].
pub struct Runtime {
    trigger: RenderTrigger,
    handlers: HandlerRegistry,
    config: RuntimeConfig,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            trigger: RenderTrigger::new(),
            handlers: HandlerRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Mount a view instance with its initial values.
    ///
    /// Each value is registered with `init`; a repeated name fails the whole
    /// mount and nothing is kept. The first render is scheduled like any
    /// other recomputation.
    pub fn mount<I, K, V>(
        &mut self,
        id: ViewId,
        initial: I,
        view: impl View,
    ) -> Result<Option<FlushReport>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        if self.trigger.contains(id) {
            return Err(Error::AlreadyMounted(id));
        }

        let mut container = StateContainer::new(id);
        for (name, value) in initial {
            container.init(name, value)?;
        }
        tracing::debug!("mounting view {} with {} value(s)", id, container.len());
        self.trigger.insert(id, container, Box::new(view));

        Ok(self.auto_flush())
    }

    /// Tear down a view: its state, any pending render and its handlers.
    pub fn unmount(&mut self, id: ViewId) -> Result<()> {
        self.trigger.remove(id).ok_or(Error::UnknownView(id))?;
        self.handlers.clear_view(id);
        tracing::debug!("unmounted view {}", id);
        Ok(())
    }

    pub fn is_mounted(&self, id: ViewId) -> bool {
        self.trigger.contains(id)
    }

    // ------------------------------------------------------------------
    // Handlers
    // ------------------------------------------------------------------

    /// Register the click handler for an element of a mounted view.
    pub fn on_click<F>(&mut self, view: ViewId, element_id: &str, handler: F) -> Result<()>
    where
        F: Fn(&mut StateContainer, &ClickEvent) -> Result<(), StateError> + 'static,
    {
        self.require_mounted(view)?;
        self.handlers.register_click(view, element_id, handler);
        Ok(())
    }

    /// Register a read-only key handler for an element of a mounted view.
    pub fn on_key<F>(&mut self, view: ViewId, element_id: &str, handler: F) -> Result<()>
    where
        F: Fn(&KeyEvent) + 'static,
    {
        self.require_mounted(view)?;
        self.handlers.register_key(view, element_id, handler);
        Ok(())
    }

    /// Register the submit handler for a form of a mounted view.
    pub fn on_submit<F>(&mut self, view: ViewId, form_id: &str, handler: F) -> Result<()>
    where
        F: Fn(&mut StateContainer, &SubmitEvent) -> Result<(), StateError> + 'static,
    {
        self.require_mounted(view)?;
        self.handlers.register_submit(view, form_id, handler);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Route one boundary event to a view.
    ///
    /// Change events go through the binding adapter; clicks, keys and
    /// submits go to their registered handler. Handler errors are returned
    /// as-is and skip the flush; updates made before the error stay pending.
    pub fn dispatch(
        &mut self,
        view: ViewId,
        event: impl Into<UiEvent>,
    ) -> Result<Option<FlushReport>> {
        let event = event.into();
        tracing::debug!("dispatching {:?} to view {}", event, view);

        let container = self
            .trigger
            .container_mut(view)
            .ok_or(Error::UnknownView(view))?;

        match event {
            UiEvent::Change(change) => {
                binding::on_change(container, &change.element_id, &change.name, change.raw)?;
            }
            UiEvent::Key(key) => {
                let handler = self
                    .handlers
                    .key(view, &key.element_id)
                    .ok_or_else(|| missing_handler(view, "key", &key.element_id))?;
                handler(&key);
                return Ok(None);
            }
            UiEvent::Click(click) => {
                let handler = self
                    .handlers
                    .click(view, &click.element_id)
                    .ok_or_else(|| missing_handler(view, "click", &click.element_id))?;
                handler(container, &click)?;
            }
            UiEvent::Submit(mut submit) => {
                let handler = self
                    .handlers
                    .submit(view, &submit.form_id)
                    .ok_or_else(|| missing_handler(view, "submit", &submit.form_id))?;
                let form_id = submit.form_id.clone();
                binding::on_submit(&form_id, &mut submit, container, |state, event| {
                    handler(state, event)
                })?;
            }
        }

        Ok(self.auto_flush())
    }

    /// Run a handler body against a view's state with a single flush after it.
    ///
    /// All updates made inside `f` coalesce into one recomputation.
    pub fn batch<R>(
        &mut self,
        view: ViewId,
        f: impl FnOnce(&mut StateContainer) -> Result<R, StateError>,
    ) -> Result<R> {
        let container = self
            .trigger
            .container_mut(view)
            .ok_or(Error::UnknownView(view))?;
        let result = f(container)?;
        self.auto_flush();
        Ok(result)
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Recompute every pending view.
    pub fn flush(&mut self) -> FlushReport {
        let report = self.trigger.flush();

        if self.config.log_outputs {
            for id in &report.rendered {
                if let Some(output) = self.trigger.output(*id) {
                    tracing::trace!("view {} rendered:\n{}", id, output.content());
                }
            }
        }

        report
    }

    /// Take an errored view out of the errored state and render it again.
    pub fn reset(&mut self, id: ViewId) -> Result<Option<FlushReport>> {
        self.require_mounted(id)?;
        if !self.trigger.reset(id) {
            return Ok(None);
        }
        tracing::debug!("view {} reset", id);
        Ok(self.auto_flush())
    }

    /// Replace the sink that receives render failures.
    pub fn set_error_sink(&mut self, sink: impl FnMut(ViewId, &RenderError) + 'static) {
        self.trigger.set_error_sink(Box::new(sink));
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub fn get(&self, view: ViewId, name: &str) -> Result<Value> {
        Ok(self.container(view)?.get(name)?)
    }

    pub fn get_as<T: FromValue>(&self, view: ViewId, name: &str) -> Result<T> {
        Ok(self.container(view)?.get_as(name)?)
    }

    /// The last successful output of a view.
    pub fn output(&self, view: ViewId) -> Option<&RenderOutput> {
        self.trigger.output(view)
    }

    pub fn status(&self, view: ViewId) -> Option<RenderStatus> {
        self.trigger.status(view)
    }

    /// The failure that parked a view in [`RenderStatus::Errored`].
    pub fn error(&self, view: ViewId) -> Option<&RenderError> {
        self.trigger.error(view)
    }

    pub fn render_count(&self, view: ViewId) -> usize {
        self.trigger.render_count(view)
    }

    /// Read-only access to a view's state, e.g. for `debug_info`.
    pub fn container(&self, view: ViewId) -> Result<&StateContainer> {
        self.trigger.container(view).ok_or(Error::UnknownView(view))
    }

    fn require_mounted(&self, view: ViewId) -> Result<()> {
        if self.trigger.contains(view) {
            Ok(())
        } else {
            Err(Error::UnknownView(view))
        }
    }

    fn auto_flush(&mut self) -> Option<FlushReport> {
        match self.config.flush_mode {
            FlushMode::AfterEachEvent => Some(self.flush()),
            FlushMode::Manual => None,
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

fn missing_handler(view: ViewId, kind: &'static str, target: &str) -> Error {
    tracing::warn!("no {} handler for `{}` in view {}", kind, target, view);
    Error::NoHandler {
        view,
        kind,
        target: target.to_owned(),
    }
}
