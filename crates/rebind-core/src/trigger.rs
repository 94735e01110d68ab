//! Render trigger: pending marks and batched recomputation.
//!
//! State containers never render. A successful update only marks the owning
//! view as pending in a shared [`PendingQueue`]. The [`RenderTrigger`] later
//! drains that queue in [`RenderTrigger::flush`] and recomputes each pending
//! view exactly once, however many updates it received in between.
//!
//! Per view the status moves `Clean -> Pending -> Clean`. A failed render
//! parks the view in `Errored` until [`RenderTrigger::reset`] is called; the
//! view keeps its last good output in the meantime.

use crate::error::RenderError;
use crate::state::StateContainer;
use crate::view::{RenderCx, RenderOutput, View, ViewId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

// ============================================================================
// Pending queue
// ============================================================================

/// Shared set of views waiting for a recomputation.
///
/// Cloning yields another handle to the same queue. Mounted containers hold
/// one so that `update` can post a notify without reaching into the trigger.
#[derive(Clone, Default)]
pub struct PendingQueue {
    inner: Rc<RefCell<Vec<ViewId>>>,
}

impl PendingQueue {
    /// Mark a view as pending. Returns `false` if it already was.
    pub fn mark(&self, view: ViewId) -> bool {
        let mut pending = self.inner.borrow_mut();
        if pending.contains(&view) {
            return false;
        }
        pending.push(view);
        true
    }

    pub fn contains(&self, view: ViewId) -> bool {
        self.inner.borrow().contains(&view)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    fn remove(&self, view: ViewId) {
        self.inner.borrow_mut().retain(|v| *v != view);
    }

    fn drain(&self) -> Vec<ViewId> {
        std::mem::take(&mut *self.inner.borrow_mut())
    }
}

impl fmt::Debug for PendingQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.borrow().iter()).finish()
    }
}

// ============================================================================
// Render trigger
// ============================================================================

/// Render status of a mounted view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// Output matches the current state.
    Clean,
    /// State changed since the last render.
    Pending,
    /// The last render failed. Stays here until reset.
    Errored,
}

/// Callback that receives render failures during flush.
pub type ErrorSink = Box<dyn FnMut(ViewId, &RenderError)>;

/// What a call to [`RenderTrigger::flush`] did.
#[derive(Debug, Default, PartialEq)]
pub struct FlushReport {
    /// Views that rendered successfully.
    pub rendered: Vec<ViewId>,
    /// Views whose render failed and are now errored.
    pub failed: Vec<(ViewId, RenderError)>,
}

impl FlushReport {
    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty() && self.failed.is_empty()
    }
}

struct Mounted {
    container: StateContainer,
    view: Box<dyn View>,
    output: Option<RenderOutput>,
    error: Option<RenderError>,
    render_count: usize,
}

/// Owns mounted views and recomputes the pending ones on flush.
pub struct RenderTrigger {
    views: HashMap<ViewId, Mounted>,
    queue: PendingQueue,
    error_sink: ErrorSink,
}

impl RenderTrigger {
    pub fn new() -> Self {
        Self {
            views: HashMap::new(),
            queue: PendingQueue::default(),
            error_sink: Box::new(log_render_error),
        }
    }

    /// Register a view instance. Its first render happens on the next flush.
    ///
    /// The container is wired to this trigger's pending queue. Returns `false`
    /// and keeps nothing if the id is taken or the container belongs to
    /// another view.
    pub fn insert(
        &mut self,
        id: ViewId,
        mut container: StateContainer,
        view: Box<dyn View>,
    ) -> bool {
        if self.views.contains_key(&id) {
            return false;
        }
        if container.view() != id {
            tracing::warn!(
                "refusing to mount container of view {} as view {}",
                container.view(),
                id
            );
            return false;
        }
        container.attach(self.queue.clone());
        self.views.insert(
            id,
            Mounted {
                container,
                view,
                output: None,
                error: None,
                render_count: 0,
            },
        );
        self.queue.mark(id);
        true
    }

    /// Drop a view instance together with any pending recomputation.
    ///
    /// The returned container is detached: writing to it no longer notifies.
    pub fn remove(&mut self, id: ViewId) -> Option<StateContainer> {
        self.queue.remove(id);
        let mut container = self.views.remove(&id)?.container;
        container.detach();
        Some(container)
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(&id)
    }

    pub fn container(&self, id: ViewId) -> Option<&StateContainer> {
        self.views.get(&id).map(|m| &m.container)
    }

    pub fn container_mut(&mut self, id: ViewId) -> Option<&mut StateContainer> {
        self.views.get_mut(&id).map(|m| &mut m.container)
    }

    /// Record that a view has pending changes. Does not render.
    pub fn notify(&self, id: ViewId) {
        if !self.views.contains_key(&id) {
            tracing::debug!("notify for unmounted view {}", id);
            return;
        }
        if self.queue.mark(id) {
            tracing::debug!("view {} is now pending", id);
        }
    }

    /// Recompute every pending view once and mark it clean.
    ///
    /// A failing view is reported to the error sink and parked in
    /// [`RenderStatus::Errored`]; the remaining views still render.
    pub fn flush(&mut self) -> FlushReport {
        let mut report = FlushReport::default();

        for id in self.queue.drain() {
            let Some(mounted) = self.views.get_mut(&id) else {
                continue;
            };
            if mounted.error.is_some() {
                tracing::debug!("view {} is errored, skipping render", id);
                continue;
            }

            let mut cx = RenderCx::new(&mounted.container);
            match mounted.view.render(&mut cx) {
                Ok(()) => {
                    mounted.output = Some(cx.finish());
                    mounted.render_count += 1;
                    report.rendered.push(id);
                }
                Err(err) => {
                    (self.error_sink)(id, &err);
                    mounted.error = Some(err.clone());
                    report.failed.push((id, err));
                }
            }
        }

        if !report.is_empty() {
            tracing::debug!(
                "flush rendered {} view(s), {} failed",
                report.rendered.len(),
                report.failed.len()
            );
        }
        report
    }

    /// Take a view out of the errored state. It renders again on the next flush.
    ///
    /// Returns `false` if the view is unknown or was not errored.
    pub fn reset(&mut self, id: ViewId) -> bool {
        let Some(mounted) = self.views.get_mut(&id) else {
            return false;
        };
        if mounted.error.take().is_none() {
            return false;
        }
        self.queue.mark(id);
        true
    }

    pub fn status(&self, id: ViewId) -> Option<RenderStatus> {
        let mounted = self.views.get(&id)?;
        Some(if mounted.error.is_some() {
            RenderStatus::Errored
        } else if self.queue.contains(id) {
            RenderStatus::Pending
        } else {
            RenderStatus::Clean
        })
    }

    /// The last successful output of a view.
    pub fn output(&self, id: ViewId) -> Option<&RenderOutput> {
        self.views.get(&id)?.output.as_ref()
    }

    /// The error that parked a view, if it is errored.
    pub fn error(&self, id: ViewId) -> Option<&RenderError> {
        self.views.get(&id)?.error.as_ref()
    }

    /// Number of successful renders of a view.
    pub fn render_count(&self, id: ViewId) -> usize {
        self.views.get(&id).map_or(0, |m| m.render_count)
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn set_error_sink(&mut self, sink: ErrorSink) {
        self.error_sink = sink;
    }
}

impl Default for RenderTrigger {
    fn default() -> Self {
        Self::new()
    }
}

fn log_render_error(id: ViewId, err: &RenderError) {
    tracing::error!("render of view {} failed: {}", id, err);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StateError;
    use std::cell::Cell;

    /// A view that renders `num` and counts how often it ran.
    struct Counting {
        renders: Rc<Cell<usize>>,
    }

    impl View for Counting {
        fn render(&self, cx: &mut RenderCx<'_>) -> Result<(), RenderError> {
            self.renders.set(self.renders.get() + 1);
            let num = cx.get("num")?;
            cx.line(num);
            Ok(())
        }
    }

    fn mount_counting(trigger: &mut RenderTrigger, id: ViewId, num: i64) -> Rc<Cell<usize>> {
        let renders = Rc::new(Cell::new(0));
        let mut container = StateContainer::new(id);
        container.init("num", num).unwrap();
        assert!(trigger.insert(
            id,
            container,
            Box::new(Counting {
                renders: Rc::clone(&renders),
            }),
        ));
        renders
    }

    #[test]
    fn first_flush_renders_new_view() {
        let mut trigger = RenderTrigger::new();
        let renders = mount_counting(&mut trigger, ViewId(1), 0);

        assert_eq!(trigger.status(ViewId(1)), Some(RenderStatus::Pending));
        let report = trigger.flush();

        assert_eq!(report.rendered, vec![ViewId(1)]);
        assert_eq!(renders.get(), 1);
        assert_eq!(trigger.status(ViewId(1)), Some(RenderStatus::Clean));
        assert_eq!(trigger.output(ViewId(1)).unwrap().content(), "0\n");
    }

    #[test]
    fn notify_is_idempotent_while_pending() {
        let mut trigger = RenderTrigger::new();
        let renders = mount_counting(&mut trigger, ViewId(1), 0);
        trigger.flush();

        trigger.notify(ViewId(1));
        trigger.notify(ViewId(1));
        assert_eq!(trigger.pending_count(), 1);

        trigger.flush();
        assert_eq!(renders.get(), 2);

        // Nothing pending, nothing rendered.
        assert!(trigger.flush().is_empty());
        assert_eq!(renders.get(), 2);
    }

    #[test]
    fn updates_between_flushes_render_once() {
        let mut trigger = RenderTrigger::new();
        let renders = mount_counting(&mut trigger, ViewId(1), 3);
        trigger.flush();

        let container = trigger.container_mut(ViewId(1)).unwrap();
        container.update_with::<i64>("num", |n| n + 5).unwrap();
        container.update_with::<i64>("num", |n| n + 1).unwrap();
        trigger.flush();

        assert_eq!(renders.get(), 2);
        assert_eq!(trigger.output(ViewId(1)).unwrap().content(), "9\n");
    }

    #[test]
    fn failed_render_is_isolated_and_keeps_last_output() {
        let mut trigger = RenderTrigger::new();
        let good = mount_counting(&mut trigger, ViewId(1), 1);
        let bad = mount_counting(&mut trigger, ViewId(2), 2);
        trigger.flush();

        let sunk = Rc::new(RefCell::new(Vec::new()));
        let sunk_clone = Rc::clone(&sunk);
        trigger.set_error_sink(Box::new(move |id, err| {
            sunk_clone.borrow_mut().push((id, err.clone()));
        }));

        // Swap view 2 for one that reads a key its container never had.
        let container = trigger.remove(ViewId(2)).unwrap();
        trigger.insert(
            ViewId(2),
            container,
            Box::new(|cx: &mut RenderCx<'_>| -> Result<(), RenderError> {
                cx.get("missing")?;
                Ok(())
            }),
        );
        trigger.notify(ViewId(1));
        let report = trigger.flush();

        assert_eq!(report.rendered, vec![ViewId(1)]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(good.get(), 2);
        assert_eq!(bad.get(), 1);
        assert_eq!(trigger.status(ViewId(2)), Some(RenderStatus::Errored));
        assert_eq!(
            sunk.borrow()[0],
            (
                ViewId(2),
                RenderError::State(StateError::UnknownKey {
                    view: ViewId(2),
                    name: "missing".into(),
                })
            )
        );
    }

    #[test]
    fn errored_view_keeps_output_until_reset() {
        let mut trigger = RenderTrigger::new();
        let fail = Rc::new(Cell::new(false));
        let fail_clone = Rc::clone(&fail);

        let mut container = StateContainer::new(ViewId(7));
        container.init("num", 1).unwrap();
        trigger.insert(
            ViewId(7),
            container,
            Box::new(move |cx: &mut RenderCx<'_>| -> Result<(), RenderError> {
                if fail_clone.get() {
                    return Err(RenderError::failed("boom"));
                }
                let num = cx.get("num")?;
                cx.line(num);
                Ok(())
            }),
        );
        trigger.set_error_sink(Box::new(|_, _| {}));
        trigger.flush();

        fail.set(true);
        trigger.container_mut(ViewId(7)).unwrap().set("num", 2).unwrap();
        trigger.flush();
        assert_eq!(trigger.status(ViewId(7)), Some(RenderStatus::Errored));
        assert_eq!(trigger.output(ViewId(7)).unwrap().content(), "1\n");

        // Still errored: updates do not trigger a retry.
        trigger.container_mut(ViewId(7)).unwrap().set("num", 3).unwrap();
        assert!(trigger.flush().is_empty());
        assert_eq!(trigger.status(ViewId(7)), Some(RenderStatus::Errored));

        fail.set(false);
        assert!(trigger.reset(ViewId(7)));
        assert_eq!(trigger.status(ViewId(7)), Some(RenderStatus::Pending));
        trigger.flush();
        assert_eq!(trigger.status(ViewId(7)), Some(RenderStatus::Clean));
        assert_eq!(trigger.output(ViewId(7)).unwrap().content(), "3\n");
    }

    #[test]
    fn remove_discards_pending_work() {
        let mut trigger = RenderTrigger::new();
        let renders = mount_counting(&mut trigger, ViewId(1), 0);

        assert!(trigger.remove(ViewId(1)).is_some());
        assert_eq!(trigger.pending_count(), 0);
        assert!(trigger.flush().is_empty());
        assert_eq!(renders.get(), 0);
        assert_eq!(trigger.status(ViewId(1)), None);
    }

    #[test]
    fn insert_refuses_taken_id() {
        let mut trigger = RenderTrigger::new();
        mount_counting(&mut trigger, ViewId(1), 0);
        assert!(!trigger.insert(ViewId(1), StateContainer::new(ViewId(1)), Box::new(Empty)));
    }

    struct Empty;

    impl View for Empty {
        fn render(&self, _cx: &mut RenderCx<'_>) -> Result<(), RenderError> {
            Ok(())
        }
    }

    #[test]
    fn insert_refuses_container_of_another_view() {
        let mut trigger = RenderTrigger::new();
        let mut container = StateContainer::new(ViewId(1));
        container.init("num", 0).unwrap();

        assert!(!trigger.insert(ViewId(2), container, Box::new(Empty)));
        assert!(!trigger.contains(ViewId(2)));
        assert_eq!(trigger.pending_count(), 0);
    }

    #[test]
    fn inserted_container_notifies_its_own_view() {
        let mut trigger = RenderTrigger::new();
        let renders = mount_counting(&mut trigger, ViewId(2), 0);
        trigger.flush();

        trigger.container_mut(ViewId(2)).unwrap().set("num", 5).unwrap();
        assert_eq!(trigger.status(ViewId(2)), Some(RenderStatus::Pending));
        assert_eq!(trigger.flush().rendered, vec![ViewId(2)]);
        assert_eq!(renders.get(), 2);
        assert_eq!(trigger.output(ViewId(2)).unwrap().content(), "5\n");
    }

    #[test]
    fn removed_container_no_longer_notifies() {
        let mut trigger = RenderTrigger::new();
        mount_counting(&mut trigger, ViewId(1), 0);
        trigger.flush();

        let mut old = trigger.remove(ViewId(1)).unwrap();
        let renders = mount_counting(&mut trigger, ViewId(1), 0);
        trigger.flush();

        old.set("num", 9).unwrap();
        assert_eq!(old.get_as::<i64>("num").unwrap(), 9);
        assert_eq!(trigger.status(ViewId(1)), Some(RenderStatus::Clean));
        assert!(trigger.flush().is_empty());
        assert_eq!(renders.get(), 1);
        assert_eq!(trigger.output(ViewId(1)).unwrap().content(), "0\n");
    }

    #[test]
    fn unmounted_container_cannot_reach_live_view() {
        let mut trigger = RenderTrigger::new();
        mount_counting(&mut trigger, ViewId(1), 0);
        trigger.flush();

        let mut stray = StateContainer::new(ViewId(1));
        stray.init("num", 0).unwrap();
        stray.set("num", 4).unwrap();

        assert_eq!(trigger.status(ViewId(1)), Some(RenderStatus::Clean));
        assert_eq!(trigger.pending_count(), 0);
    }
}
