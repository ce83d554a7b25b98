#![forbid(unsafe_code)]

//! The render/window/timer collaborator boundary.
//!
//! The coordinator never draws pixels or runs an event loop; it calls
//! into a [`RenderHost`] supplied by the embedding application. The
//! host owns view handles, z-placement, property animation, and a
//! deferred-task facility, all on the single UI-affine context.
//!
//! # Invariants
//!
//! 1. Every animation completion fires exactly once, after the host's
//!    animation settles (success or interruption). Callers must not
//!    assume synchronous completion, except that a zero duration *may*
//!    complete before `animate` returns.
//! 2. `cancel` of an already-fired or unknown [`TaskId`] is a no-op.
//! 3. `detach` of an unattached view is a no-op.
//!
//! # Failure Modes
//!
//! - A custom host that never invokes an animation completion stalls
//!   the overlay's lifecycle state machine permanently; there is no
//!   watchdog.

use std::rc::Rc;
use std::time::Duration;

use crate::color::Rgba;
use crate::geometry::{Point, Rect};

/// Opaque handle to a host-owned view surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(u64);

impl ViewId {
    /// Wrap a raw host handle.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Opaque handle to a deferred task scheduled on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Animation timing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Curve {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
}

/// One-shot callback invoked when an animation settles.
pub type Completion = Box<dyn FnOnce()>;

/// Backdrop blur grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurKind {
    Dark,
    Light,
    ExtraLight,
}

/// Backdrop rendering intent for an overlay's mask.
///
/// `None` means no mask surface is created at all; the other variants
/// are handed to [`RenderHost::make_mask`] verbatim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaskStyle {
    /// No backdrop surface.
    None,
    /// A full-bounds surface filled with the given tint.
    Solid(Rgba),
    /// A full-bounds blur surface.
    Blur(BlurKind),
}

impl MaskStyle {
    /// Solid black scaled to `alpha` opacity — the conventional dimmer.
    pub fn dimmed(alpha: f32) -> Self {
        MaskStyle::Solid(Rgba::BLACK.with_opacity(alpha))
    }

    /// Fully transparent solid mask; still captures backdrop taps.
    pub const fn clear() -> Self {
        MaskStyle::Solid(Rgba::TRANSPARENT)
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, MaskStyle::None)
    }
}

impl Default for MaskStyle {
    /// 25 %-opacity black.
    fn default() -> Self {
        MaskStyle::dimmed(0.25)
    }
}

/// A set of property targets animated together.
///
/// Unset properties are left untouched by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Animation {
    pub opacity: Option<f32>,
    pub scale: Option<f64>,
    pub center: Option<Point>,
    pub frame: Option<Rect>,
}

impl Animation {
    pub const fn new() -> Self {
        Self {
            opacity: None,
            scale: None,
            center: None,
            frame: None,
        }
    }

    /// Target opacity in `[0.0, 1.0]`.
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Target uniform scale.
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Target center point.
    pub fn center(mut self, center: Point) -> Self {
        self.center = Some(center);
        self
    }

    /// Target frame.
    pub fn frame(mut self, frame: Rect) -> Self {
        self.frame = Some(frame);
        self
    }
}

/// The view/rendering, window, and timer collaborator.
///
/// Implementations use interior mutability; all methods take `&self`
/// and are called from the single UI context only (the trait is
/// deliberately not `Send`).
pub trait RenderHost {
    // --- attachment & z-placement ---

    /// Attach `view` as the front-most child of `container`.
    fn attach(&self, view: ViewId, container: ViewId);

    /// Attach `view` immediately above `sibling` within `container`.
    fn attach_above(&self, view: ViewId, container: ViewId, sibling: ViewId);

    /// Attach `view` immediately below `sibling` within `container`.
    fn attach_below(&self, view: ViewId, container: ViewId, sibling: ViewId);

    /// Detach `view` from its container. No-op when unattached.
    fn detach(&self, view: ViewId);

    // --- geometry & display properties ---

    /// Current frame of `view` in its container's coordinates.
    fn frame(&self, view: ViewId) -> Rect;

    fn set_frame(&self, view: ViewId, frame: Rect);

    /// Current center of `view`.
    fn center(&self, view: ViewId) -> Point {
        self.frame(view).center()
    }

    fn set_center(&self, view: ViewId, center: Point);

    fn set_opacity(&self, view: ViewId, opacity: f32);

    fn set_scale(&self, view: ViewId, scale: f64);

    /// Local bounds of `view` (its size at a zero origin).
    fn bounds(&self, view: ViewId) -> Rect {
        let frame = self.frame(view);
        Rect {
            origin: Point::ZERO,
            size: frame.size,
        }
    }

    // --- surfaces ---

    /// Create (but do not attach) a backdrop surface with the given
    /// style covering `bounds`.
    fn make_mask(&self, style: MaskStyle, bounds: Rect) -> ViewId;

    /// Resolve the key/foreground surface used when a config supplies
    /// no container.
    fn default_container(&self) -> Option<ViewId>;

    // --- animation ---

    /// Animate `view`'s properties toward `animation` over `duration`.
    ///
    /// `done`, when supplied, must be invoked exactly once after the
    /// animation settles.
    fn animate(
        &self,
        view: ViewId,
        animation: Animation,
        duration: Duration,
        curve: Curve,
        done: Option<Completion>,
    );

    // --- deferred tasks ---

    /// Run `task` after `after` elapses, unless canceled first.
    fn schedule(&self, after: Duration, task: Box<dyn FnOnce()>) -> TaskId;

    /// Cancel a scheduled task. No-op if already fired or unknown.
    fn cancel(&self, task: TaskId);
}

/// RAII guard for a host-scheduled deferred task.
///
/// Dropping the guard cancels the task, so a task's lifetime is bounded
/// by its owner's — the scoped-cleanup discipline that keeps timers
/// from firing on torn-down overlays.
pub struct ScheduledTask {
    host: Rc<dyn RenderHost>,
    id: TaskId,
}

impl ScheduledTask {
    /// Schedule `task` on `host` and tie its lifetime to the guard.
    pub fn arm(host: Rc<dyn RenderHost>, after: Duration, task: Box<dyn FnOnce()>) -> Self {
        let id = host.schedule(after, task);
        tracing::trace!(task = id.raw(), ?after, "deferred task armed");
        Self { host, id }
    }

    /// The underlying task id.
    pub fn id(&self) -> TaskId {
        self.id
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        tracing::trace!(task = self.id.raw(), "deferred task canceled");
        self.host.cancel(self.id);
    }
}

impl core::fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScheduledTask").field("id", &self.id).finish()
    }
}
