#![forbid(unsafe_code)]

//! Deterministic in-memory [`RenderHost`] for tests and examples.
//!
//! `StubHost` models just enough of a windowing system to exercise the
//! coordinator: a per-container stacking vector (bottom → top), view
//! property tables, a virtual clock, and a manually pumped animation
//! queue.
//!
//! Semantics:
//!
//! - `animate` applies the property targets immediately but defers the
//!   completion until [`settle`] is called — except zero-duration
//!   animations, whose completions run before `animate` returns (the
//!   host contract allows this, and it is what makes animation-less
//!   teardown feel synchronous).
//! - `schedule`d tasks fire during [`advance`] once the virtual clock
//!   passes their deadline, in deadline order.
//! - Completions and tasks run with no internal borrows held, so they
//!   may freely call back into the host.
//!
//! [`settle`]: StubHost::settle
//! [`advance`]: StubHost::advance

use std::cell::RefCell;
use std::time::Duration;

use ahash::AHashMap;

use crate::geometry::{Point, Rect, Size};
use crate::host::{Animation, Completion, Curve, MaskStyle, RenderHost, TaskId, ViewId};

struct ViewState {
    frame: Rect,
    opacity: f32,
    scale: f64,
    attached_to: Option<ViewId>,
    mask: Option<MaskStyle>,
}

struct QueuedAnimation {
    /// Kept for debugging pumped queues in test failures.
    #[allow(dead_code)]
    view: ViewId,
    done: Option<Completion>,
}

struct TaskEntry {
    id: u64,
    due: Duration,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct State {
    now: Duration,
    next_id: u64,
    views: AHashMap<u64, ViewState>,
    children: AHashMap<u64, Vec<ViewId>>,
    animations: Vec<QueuedAnimation>,
    tasks: Vec<TaskEntry>,
    default_container: Option<ViewId>,
}

impl State {
    fn view(&self, view: ViewId) -> &ViewState {
        self.views.get(&view.raw()).expect("unknown view")
    }

    fn view_mut(&mut self, view: ViewId) -> &mut ViewState {
        self.views.get_mut(&view.raw()).expect("unknown view")
    }

    fn new_view(&mut self, frame: Rect, mask: Option<MaskStyle>) -> ViewId {
        let id = ViewId::new(self.next_id);
        self.next_id += 1;
        self.views.insert(
            id.raw(),
            ViewState {
                frame,
                opacity: 1.0,
                scale: 1.0,
                attached_to: None,
                mask,
            },
        );
        id
    }

    fn remove_from_parent(&mut self, view: ViewId) {
        if let Some(parent) = self.views.get(&view.raw()).and_then(|v| v.attached_to) {
            if let Some(order) = self.children.get_mut(&parent.raw()) {
                order.retain(|v| *v != view);
            }
            self.view_mut(view).attached_to = None;
        }
    }

    fn insert_child(&mut self, view: ViewId, container: ViewId, index: Option<usize>) {
        self.remove_from_parent(view);
        let order = self.children.entry(container.raw()).or_default();
        match index {
            Some(index) if index <= order.len() => order.insert(index, view),
            _ => order.push(view),
        }
        self.view_mut(view).attached_to = Some(container);
    }
}

/// In-memory render host with a virtual clock.
#[derive(Default)]
pub struct StubHost {
    state: RefCell<State>,
}

impl StubHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unattached view with the given frame.
    pub fn make_view(&self, frame: Rect) -> ViewId {
        self.state.borrow_mut().new_view(frame, None)
    }

    /// Create a root container of the given size and install it as the
    /// default container.
    pub fn make_container(&self, width: f64, height: f64) -> ViewId {
        let mut state = self.state.borrow_mut();
        let id = state.new_view(Rect::new(0.0, 0.0, width, height), None);
        state.default_container = Some(id);
        id
    }

    /// Replace the default container (or clear it with `None`).
    pub fn set_default_container(&self, container: Option<ViewId>) {
        self.state.borrow_mut().default_container = container;
    }

    /// Children of `container`, bottom → top.
    pub fn stacking(&self, container: ViewId) -> Vec<ViewId> {
        self.state
            .borrow()
            .children
            .get(&container.raw())
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_attached(&self, view: ViewId) -> bool {
        self.state.borrow().view(view).attached_to.is_some()
    }

    pub fn opacity(&self, view: ViewId) -> f32 {
        self.state.borrow().view(view).opacity
    }

    pub fn scale(&self, view: ViewId) -> f64 {
        self.state.borrow().view(view).scale
    }

    /// The mask style a view was created with, if it is a mask surface.
    pub fn mask_style(&self, view: ViewId) -> Option<MaskStyle> {
        self.state.borrow().view(view).mask
    }

    /// Completions not yet pumped by [`StubHost::settle`].
    pub fn pending_animations(&self) -> usize {
        self.state.borrow().animations.len()
    }

    /// Tasks still waiting on the virtual clock.
    pub fn scheduled_tasks(&self) -> usize {
        self.state.borrow().tasks.len()
    }

    /// Fire every queued animation completion, in submission order,
    /// until none remain (completions may enqueue more).
    pub fn settle(&self) {
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                if state.animations.is_empty() {
                    break;
                }
                state.animations.remove(0)
            };
            if let Some(done) = next.done {
                done();
            }
        }
    }

    /// Advance the virtual clock, firing due tasks in deadline order.
    pub fn advance(&self, by: Duration) {
        let deadline = self.state.borrow().now + by;
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                let due = state
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= deadline)
                    .min_by_key(|(_, t)| t.due)
                    .map(|(i, _)| i);
                match due {
                    Some(i) => {
                        let entry = state.tasks.remove(i);
                        state.now = entry.due.max(state.now);
                        entry.task
                    }
                    None => {
                        state.now = deadline;
                        break;
                    }
                }
            };
            next();
        }
    }

    fn apply(state: &mut State, view: ViewId, animation: &Animation) {
        let v = state.view_mut(view);
        if let Some(opacity) = animation.opacity {
            v.opacity = opacity;
        }
        if let Some(scale) = animation.scale {
            v.scale = scale;
        }
        if let Some(center) = animation.center {
            v.frame = v.frame.with_center(center);
        }
        if let Some(frame) = animation.frame {
            v.frame = frame;
        }
    }
}

impl RenderHost for StubHost {
    fn attach(&self, view: ViewId, container: ViewId) {
        self.state.borrow_mut().insert_child(view, container, None);
    }

    fn attach_above(&self, view: ViewId, container: ViewId, sibling: ViewId) {
        let mut state = self.state.borrow_mut();
        let index = state
            .children
            .get(&container.raw())
            .and_then(|order| order.iter().position(|v| *v == sibling))
            .map(|i| i + 1);
        state.insert_child(view, container, index);
    }

    fn attach_below(&self, view: ViewId, container: ViewId, sibling: ViewId) {
        let mut state = self.state.borrow_mut();
        let index = state
            .children
            .get(&container.raw())
            .and_then(|order| order.iter().position(|v| *v == sibling));
        state.insert_child(view, container, index);
    }

    fn detach(&self, view: ViewId) {
        self.state.borrow_mut().remove_from_parent(view);
    }

    fn frame(&self, view: ViewId) -> Rect {
        self.state.borrow().view(view).frame
    }

    fn set_frame(&self, view: ViewId, frame: Rect) {
        self.state.borrow_mut().view_mut(view).frame = frame;
    }

    fn set_center(&self, view: ViewId, center: Point) {
        let mut state = self.state.borrow_mut();
        let v = state.view_mut(view);
        v.frame = v.frame.with_center(center);
    }

    fn set_opacity(&self, view: ViewId, opacity: f32) {
        self.state.borrow_mut().view_mut(view).opacity = opacity;
    }

    fn set_scale(&self, view: ViewId, scale: f64) {
        self.state.borrow_mut().view_mut(view).scale = scale;
    }

    fn make_mask(&self, style: MaskStyle, bounds: Rect) -> ViewId {
        self.state.borrow_mut().new_view(bounds, Some(style))
    }

    fn default_container(&self) -> Option<ViewId> {
        self.state.borrow().default_container
    }

    fn animate(
        &self,
        view: ViewId,
        animation: Animation,
        duration: Duration,
        _curve: Curve,
        done: Option<Completion>,
    ) {
        {
            let mut state = self.state.borrow_mut();
            Self::apply(&mut state, view, &animation);
        }
        if duration.is_zero() {
            if let Some(done) = done {
                done();
            }
        } else {
            self.state
                .borrow_mut()
                .animations
                .push(QueuedAnimation { view, done });
        }
    }

    fn schedule(&self, after: Duration, task: Box<dyn FnOnce()>) -> TaskId {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let due = state.now + after;
        state.tasks.push(TaskEntry { id, due, task });
        TaskId::new(id)
    }

    fn cancel(&self, task: TaskId) {
        self.state
            .borrow_mut()
            .tasks
            .retain(|entry| entry.id != task.raw());
    }
}
