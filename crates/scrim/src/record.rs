#![forbid(unsafe_code)]

//! Per-overlay record and lifecycle state machine.
//!
//! One [`OverlayRecord`] exists per active overlay. It owns its mask,
//! its auto-dismiss task, and its keyboard subscription, and drives the
//! lifecycle: idle → presenting → displayed → dismissing → destroyed.
//!
//! # Invariants
//!
//! 1. `original_frame` is captured once, at construction, before any
//!    animation mutates geometry.
//! 2. A record is never destroyed while displayed; destruction happens
//!    only inside dismiss completion.
//! 3. The auto-dismiss task is armed only after the record reaches
//!    `Displayed` — never while the surface is still animating in —
//!    and is canceled by manual dismissal or destruction.
//! 4. Mask and view are detached strictly before `on_did_hide` fires,
//!    so callbacks never observe a record still attached.
//!
//! # Failure Modes
//!
//! - `present` on a non-idle record and `dismiss` on a non-displayed
//!   record are silent no-ops (idempotent by design). In particular a
//!   `dismiss` racing an unfinished `present` does nothing.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use scrim_core::geometry::{Point, Rect};
use scrim_core::host::{Animation, Completion, Curve, RenderHost, ScheduledTask, ViewId};
use scrim_core::keyboard::{KeyboardEvent, KeyboardHub, KeyboardInfo, KeyboardSubscription};

use crate::config::{Edge, LifecycleCallback, OverlayConfig, Priority};
use crate::coordinator::CoordinatorInner;
use crate::transition::{self, Transition, TransitionContext};

/// Lifecycle phase of an overlay record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, not yet presenting.
    Idle,
    /// Entrance animation running.
    Presenting,
    /// Steady state; the only phase `dismiss` acts from.
    Displayed,
    /// Exit animation running.
    Dismissing,
    /// Detached; terminal.
    Destroyed,
}

pub(crate) struct OverlayRecord {
    view: ViewId,
    container: ViewId,
    mask: Option<ViewId>,
    original_frame: Rect,
    config: RefCell<OverlayConfig>,
    phase: Cell<Phase>,
    // Captured at construction; later config mutation does not re-resolve.
    transition: Rc<dyn Transition>,
    edge: Option<Edge>,
    priority: Priority,
    host: Rc<dyn RenderHost>,
    coordinator: Weak<CoordinatorInner>,
    pending_auto_dismiss: RefCell<Option<ScheduledTask>>,
    keyboard_sub: RefCell<Option<KeyboardSubscription>>,
}

impl OverlayRecord {
    pub(crate) fn new(
        view: ViewId,
        config: OverlayConfig,
        container: ViewId,
        host: Rc<dyn RenderHost>,
        keyboard: &KeyboardHub,
        coordinator: Weak<CoordinatorInner>,
    ) -> Rc<Self> {
        let original_frame = host.frame(view);
        let mask = (!config.mask_style.is_none())
            .then(|| host.make_mask(config.mask_style, host.bounds(container)));
        let transition = transition::resolve(&config.animation);
        let edge = config.animation.directional_edge();
        let priority = config.priority;
        let track_keyboard = config.track_keyboard;

        let rec = Rc::new(Self {
            view,
            container,
            mask,
            original_frame,
            config: RefCell::new(config),
            phase: Cell::new(Phase::Idle),
            transition,
            edge,
            priority,
            host,
            coordinator,
            pending_auto_dismiss: RefCell::new(None),
            keyboard_sub: RefCell::new(None),
        });

        if track_keyboard {
            let weak = Rc::downgrade(&rec);
            let sub = keyboard.subscribe(move |event, info| {
                if let Some(rec) = weak.upgrade() {
                    rec.keyboard_event(event, info);
                }
            });
            *rec.keyboard_sub.borrow_mut() = Some(sub);
        }

        rec
    }

    #[inline]
    pub(crate) fn view(&self) -> ViewId {
        self.view
    }

    #[inline]
    pub(crate) fn mask(&self) -> Option<ViewId> {
        self.mask
    }

    #[inline]
    pub(crate) fn priority(&self) -> Priority {
        self.priority
    }

    #[inline]
    pub(crate) fn phase(&self) -> Phase {
        self.phase.get()
    }

    /// The surface a lower-priority record slots below: the mask when
    /// one exists, else the view itself.
    pub(crate) fn sibling_anchor(&self) -> ViewId {
        self.mask.unwrap_or(self.view)
    }

    /// Attach mask + view to the container, optionally below `sibling`.
    pub(crate) fn attach(&self, below: Option<ViewId>) {
        match (self.mask, below) {
            (Some(mask), Some(sibling)) => {
                self.host.attach_below(mask, self.container, sibling);
                self.host.attach_above(self.view, self.container, mask);
            }
            (Some(mask), None) => {
                self.host.attach(mask, self.container);
                self.host.attach_above(self.view, self.container, mask);
            }
            (None, Some(sibling)) => self.host.attach_below(self.view, self.container, sibling),
            (None, None) => self.host.attach(self.view, self.container),
        }
    }

    fn transition_context(&self, duration: Duration) -> TransitionContext {
        TransitionContext {
            host: self.host.clone(),
            view: self.view,
            mask: self.mask,
            container: self.container,
            original_frame: self.original_frame,
            duration,
        }
    }

    fn fire(self: &Rc<Self>, callback: Option<LifecycleCallback>) {
        if let Some(callback) = callback {
            callback(&OverlayHandle { rec: self.clone() });
        }
    }

    // --- lifecycle ---

    pub(crate) fn present(self: &Rc<Self>, completion: Option<Completion>) {
        if self.phase.get() != Phase::Idle {
            tracing::trace!(view = self.view.raw(), "present ignored: not idle");
            return;
        }
        self.phase.set(Phase::Presenting);
        tracing::debug!(view = self.view.raw(), "overlay presenting");

        let will_show = self.config.borrow().on_will_show.clone();
        self.fire(will_show);

        let duration = self.config.borrow().animation_duration;
        let ctx = self.transition_context(duration);
        let weak = Rc::downgrade(self);
        self.transition.present(
            &ctx,
            Box::new(move || {
                if let Some(rec) = weak.upgrade() {
                    rec.finish_present(completion);
                }
            }),
        );
    }

    fn finish_present(self: &Rc<Self>, completion: Option<Completion>) {
        if self.phase.get() != Phase::Presenting {
            return;
        }
        self.phase.set(Phase::Displayed);
        tracing::debug!(view = self.view.raw(), "overlay displayed");

        let did_show = self.config.borrow().on_did_show.clone();
        self.fire(did_show);
        if let Some(completion) = completion {
            completion();
        }
        self.arm_auto_dismiss();
    }

    pub(crate) fn dismiss(self: &Rc<Self>, animated: bool, completion: Option<Completion>) {
        if self.phase.get() != Phase::Displayed {
            tracing::trace!(view = self.view.raw(), "dismiss ignored: not displayed");
            return;
        }
        self.phase.set(Phase::Dismissing);
        tracing::debug!(view = self.view.raw(), animated, "overlay dismissing");

        let will_hide = self.config.borrow().on_will_hide.clone();
        self.fire(will_hide);

        // Coerced for this call only; the config keeps its duration.
        let duration = if animated {
            self.config.borrow().animation_duration
        } else {
            Duration::ZERO
        };
        let ctx = self.transition_context(duration);
        let weak = Rc::downgrade(self);
        self.transition.dismiss(
            &ctx,
            Box::new(move || {
                if let Some(rec) = weak.upgrade() {
                    rec.finish_dismiss(completion);
                }
            }),
        );
    }

    /// Tear down regardless of phase, without animation. Used by bulk
    /// clears (exclusive show, hide-all), where overlays still animating
    /// in must not survive.
    pub(crate) fn force_dismiss(self: &Rc<Self>, completion: Option<Completion>) {
        match self.phase.get() {
            Phase::Displayed => self.dismiss(false, completion),
            Phase::Idle | Phase::Presenting => {
                self.phase.set(Phase::Dismissing);
                let will_hide = self.config.borrow().on_will_hide.clone();
                self.fire(will_hide);
                self.finish_dismiss(completion);
            }
            // Already on the way out (or gone); the earlier dismissal
            // owns the teardown.
            Phase::Dismissing | Phase::Destroyed => {}
        }
    }

    fn finish_dismiss(self: &Rc<Self>, completion: Option<Completion>) {
        if self.phase.get() != Phase::Dismissing {
            return;
        }
        // Scoped cleanup: cancel the timer, release the subscription,
        // detach surfaces — all before anyone observes `Destroyed`.
        self.pending_auto_dismiss.borrow_mut().take();
        self.keyboard_sub.borrow_mut().take();
        if let Some(mask) = self.mask {
            self.host.detach(mask);
        }
        self.host.detach(self.view);
        self.phase.set(Phase::Destroyed);
        tracing::debug!(view = self.view.raw(), "overlay destroyed");

        let did_hide = self.config.borrow().on_did_hide.clone();
        self.fire(did_hide);
        if let Some(completion) = completion {
            completion();
        }
    }

    /// Route a hide request: a custom-hide callback owns dismissal
    /// entirely when present; otherwise the owning coordinator removes
    /// the record through its queue.
    pub(crate) fn hide(self: &Rc<Self>) {
        let custom = self.config.borrow().on_custom_hide.clone();
        if let Some(custom) = custom {
            custom(&OverlayHandle { rec: self.clone() });
            return;
        }
        if let Some(coordinator) = self.coordinator.upgrade() {
            CoordinatorInner::hide_record(&coordinator, self.clone(), true);
        } else {
            // Orphaned record (coordinator gone): dismiss directly.
            self.dismiss(true, None);
        }
    }

    fn arm_auto_dismiss(self: &Rc<Self>) {
        let after = self.config.borrow().auto_dismiss_after;
        if after.is_zero() {
            return;
        }
        let weak = Rc::downgrade(self);
        let task = ScheduledTask::arm(
            self.host.clone(),
            after,
            Box::new(move || {
                if let Some(rec) = weak.upgrade() {
                    tracing::debug!(view = rec.view.raw(), "auto-dismiss fired");
                    rec.hide();
                }
            }),
        );
        // Replacing the slot cancels any previously armed task.
        *self.pending_auto_dismiss.borrow_mut() = Some(task);
    }

    // --- gestures ---

    fn gesture_edge(&self) -> Option<Edge> {
        if !self.config.borrow().interactive_dismiss {
            return None;
        }
        self.edge
    }

    pub(crate) fn pan_changed(self: &Rc<Self>, translation: Point) {
        let Some(edge) = self.gesture_edge() else {
            return;
        };
        if self.phase.get() != Phase::Displayed {
            return;
        }
        let rest = self.original_frame.center();
        let current = self.host.center(self.view);
        // 1:1 tracking in the dismiss direction; opposing movement
        // clamps back to the rest position.
        match edge {
            Edge::Top if translation.y < 0.0 => {
                let y = rest.y - translation.y.abs();
                self.host.set_center(self.view, Point::new(current.x, y));
            }
            Edge::Bottom if translation.y > 0.0 => {
                let y = rest.y + translation.y.abs();
                self.host.set_center(self.view, Point::new(current.x, y));
            }
            Edge::Left if translation.x < 0.0 => {
                let x = rest.x - translation.x.abs();
                self.host.set_center(self.view, Point::new(x, current.y));
            }
            Edge::Right if translation.x > 0.0 => {
                let x = rest.x + translation.x.abs();
                self.host.set_center(self.view, Point::new(x, current.y));
            }
            _ => self.host.set_frame(self.view, self.original_frame),
        }
    }

    pub(crate) fn pan_ended(self: &Rc<Self>, translation: Point) {
        let Some(edge) = self.gesture_edge() else {
            return;
        };
        if self.phase.get() != Phase::Displayed {
            return;
        }
        let threshold = self
            .config
            .borrow()
            .interactive_dismiss_threshold
            .clamp(f64::EPSILON, 1.0);
        let (offset, dimension) = match edge {
            Edge::Top | Edge::Bottom => (translation.y.abs(), self.original_frame.height()),
            Edge::Left | Edge::Right => (translation.x.abs(), self.original_frame.width()),
        };
        if offset >= dimension * threshold {
            tracing::debug!(view = self.view.raw(), offset, "gesture committed dismissal");
            self.hide();
        } else {
            // Cheap reset, not a re-run of the present animation.
            self.host.set_frame(self.view, self.original_frame);
        }
    }

    pub(crate) fn backdrop_tapped(self: &Rc<Self>) {
        if self.config.borrow().dismiss_on_backdrop_tap {
            self.hide();
        }
    }

    // --- keyboard ---

    fn keyboard_event(self: &Rc<Self>, event: KeyboardEvent, info: &KeyboardInfo) {
        if self.phase.get() == Phase::Destroyed {
            return;
        }
        match event {
            KeyboardEvent::WillShow => {
                let (callback, gap) = {
                    let config = self.config.borrow();
                    (config.on_keyboard_will_show.clone(), config.keyboard_gap)
                };
                if let Some(callback) = callback {
                    callback();
                }
                self.avoid_keyboard(info, gap);
            }
            KeyboardEvent::DidShow => {
                let callback = self.config.borrow().on_keyboard_did_show.clone();
                if let Some(callback) = callback {
                    callback();
                }
            }
            KeyboardEvent::WillChangeFrame => {
                let callback = self.config.borrow().on_keyboard_frame_will_change.clone();
                if let Some(callback) = callback {
                    callback(info.begin_frame, info.end_frame, info.duration);
                }
            }
            KeyboardEvent::DidChangeFrame => {
                let callback = self.config.borrow().on_keyboard_frame_did_change.clone();
                if let Some(callback) = callback {
                    callback(info.begin_frame, info.end_frame, info.duration);
                }
            }
            KeyboardEvent::WillHide => {
                let callback = self.config.borrow().on_keyboard_will_hide.clone();
                if let Some(callback) = callback {
                    callback();
                }
                // Restore original geometry with the keyboard's timing.
                self.host.animate(
                    self.view,
                    Animation::new().frame(self.original_frame),
                    info.duration,
                    Curve::EaseOut,
                    None,
                );
            }
            KeyboardEvent::DidHide => {
                let callback = self.config.borrow().on_keyboard_did_hide.clone();
                if let Some(callback) = callback {
                    callback();
                }
            }
        }
    }

    /// Raise the view just clear of the keyboard when its top edge
    /// would occlude the overlay's bottom edge.
    fn avoid_keyboard(&self, info: &KeyboardInfo, gap: f64) {
        let center = self.host.center(self.view);
        let height = self.host.frame(self.view).height();
        let bottom = center.y + height / 2.0;
        let keyboard_top = info.end_frame.origin.y;
        if keyboard_top < bottom {
            let offset = bottom - keyboard_top + gap;
            self.host.animate(
                self.view,
                Animation::new().center(Point::new(center.x, center.y - offset)),
                info.duration,
                Curve::EaseOut,
                None,
            );
        }
    }
}

/// Shared handle to an active (or destroyed) overlay.
///
/// Identity is the underlying record: two handles compare equal iff
/// they refer to the same overlay instance.
#[derive(Clone)]
pub struct OverlayHandle {
    pub(crate) rec: Rc<OverlayRecord>,
}

impl OverlayHandle {
    /// The caller-owned display surface.
    pub fn view(&self) -> ViewId {
        self.rec.view()
    }

    /// The container the overlay attached to.
    pub fn container(&self) -> ViewId {
        self.rec.container
    }

    /// The backdrop surface, when the mask style is not `None`.
    pub fn mask(&self) -> Option<ViewId> {
        self.rec.mask()
    }

    /// Geometry captured at construction.
    pub fn original_frame(&self) -> Rect {
        self.rec.original_frame
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.rec.phase()
    }

    /// True between present completion and dismissal start.
    pub fn is_displaying(&self) -> bool {
        self.rec.phase() == Phase::Displayed
    }

    /// Mutate the config snapshot in place.
    ///
    /// Intended for attaching callbacks after `show`. `container`,
    /// `mask_style`, `priority`, and `animation` were captured at
    /// insertion; changing them here has no effect.
    pub fn update_config(&self, f: impl FnOnce(&mut OverlayConfig)) {
        f(&mut self.rec.config.borrow_mut());
    }

    /// Request dismissal through the overlay's hide routing (custom
    /// hide callback when configured, else the owning coordinator).
    pub fn request_hide(&self) {
        self.rec.hide();
    }

    /// Feed a drag-gesture movement sample (platform glue entry point).
    pub fn pan_changed(&self, translation: Point) {
        self.rec.pan_changed(translation);
    }

    /// Feed the drag-gesture end sample; commits or snaps back.
    pub fn pan_ended(&self, translation: Point) {
        self.rec.pan_ended(translation);
    }

    /// Report a tap on the backdrop mask (platform glue entry point).
    pub fn backdrop_tapped(&self) {
        self.rec.backdrop_tapped();
    }
}

impl PartialEq for OverlayHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.rec, &other.rec)
    }
}

impl Eq for OverlayHandle {}

impl core::fmt::Debug for OverlayHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OverlayHandle")
            .field("view", &self.view())
            .field("phase", &self.phase())
            .finish()
    }
}
