#![forbid(unsafe_code)]

//! Entrance/exit animation strategies.
//!
//! Each strategy is a stateless present/dismiss pair over a
//! [`TransitionContext`] — the overlay's handles, captured geometry,
//! and effective duration. Strategies never consult the coordinator;
//! they only drive host animations and hand the completion through.
//!
//! # Invariants
//!
//! 1. Every `present`/`dismiss` run invokes its completion exactly once
//!    (delegated to the host's animation-settling contract).
//! 2. Strategies read `ctx.duration`, never the config — animation-less
//!    dismissal works by coercing the context duration to zero for a
//!    single call.

use std::rc::Rc;
use std::time::Duration;

use scrim_core::geometry::{Point, Rect};
use scrim_core::host::{Animation, Completion, Curve, RenderHost, ViewId};

use crate::config::{AnimationKind, Edge};

/// Everything a transition may touch while animating one overlay.
pub struct TransitionContext {
    pub host: Rc<dyn RenderHost>,
    /// The caller's overlay surface.
    pub view: ViewId,
    /// The backdrop surface, when the mask style is not `None`.
    pub mask: Option<ViewId>,
    /// The container both are attached to.
    pub container: ViewId,
    /// Geometry captured at construction, before any animation moved it.
    pub original_frame: Rect,
    /// Effective duration for this run.
    pub duration: Duration,
}

impl TransitionContext {
    fn container_bounds(&self) -> Rect {
        self.host.bounds(self.container)
    }

    /// Fade the mask (if any) to `opacity` alongside the main animation.
    fn fade_mask(&self, opacity: f32, curve: Curve) {
        if let Some(mask) = self.mask {
            self.host.animate(
                mask,
                Animation::new().opacity(opacity),
                self.duration,
                curve,
                None,
            );
        }
    }
}

/// A present/dismiss animation pair.
///
/// Custom strategies implement this and are carried opaquely through
/// [`AnimationKind::Custom`].
pub trait Transition {
    fn present(&self, ctx: &TransitionContext, done: Completion);
    fn dismiss(&self, ctx: &TransitionContext, done: Completion);
}

/// Resolve the strategy for an animation kind. Dispatch is by tag;
/// the built-in strategies carry no state beyond the slide edge.
pub(crate) fn resolve(kind: &AnimationKind) -> Rc<dyn Transition> {
    match kind {
        AnimationKind::Fade => Rc::new(Fade),
        AnimationKind::Scale => Rc::new(Scale),
        AnimationKind::Directional(edge) => Rc::new(Slide { edge: *edge }),
        AnimationKind::Custom(transition) => transition.clone(),
    }
}

/// Start/end center points for a directional transition.
///
/// The end point is the view's original on-screen center; the start
/// point is offset past the chosen container edge so the surface rests
/// fully outside the bounds.
pub fn slide_endpoints(original: Rect, container: Rect, edge: Edge) -> (Point, Point) {
    let end = original.center();
    let start = match edge {
        Edge::Top => Point::new(end.x, -original.height() / 2.0),
        Edge::Left => Point::new(-original.width() / 2.0, end.y),
        Edge::Bottom => Point::new(end.x, container.height() + original.height() / 2.0),
        Edge::Right => Point::new(container.width() + original.width() / 2.0, end.y),
    };
    (start, end)
}

/// Opacity 0 → 1 and back; no geometry change, mask untouched.
pub struct Fade;

impl Transition for Fade {
    fn present(&self, ctx: &TransitionContext, done: Completion) {
        ctx.host.set_opacity(ctx.view, 0.0);
        ctx.host.animate(
            ctx.view,
            Animation::new().opacity(1.0),
            ctx.duration,
            Curve::EaseOut,
            Some(done),
        );
    }

    fn dismiss(&self, ctx: &TransitionContext, done: Completion) {
        ctx.host.animate(
            ctx.view,
            Animation::new().opacity(0.0),
            ctx.duration,
            Curve::EaseIn,
            Some(done),
        );
    }
}

/// Opacity plus uniform scale 0.2 → 1.0; mask fades in lockstep.
pub struct Scale;

impl Scale {
    const INITIAL_SCALE: f64 = 0.2;
}

impl Transition for Scale {
    fn present(&self, ctx: &TransitionContext, done: Completion) {
        if let Some(mask) = ctx.mask {
            ctx.host.set_opacity(mask, 0.0);
        }
        ctx.fade_mask(1.0, Curve::EaseOut);
        ctx.host.set_opacity(ctx.view, 0.0);
        ctx.host.set_scale(ctx.view, Self::INITIAL_SCALE);
        ctx.host.animate(
            ctx.view,
            Animation::new().opacity(1.0).scale(1.0),
            ctx.duration,
            Curve::EaseOut,
            Some(done),
        );
    }

    fn dismiss(&self, ctx: &TransitionContext, done: Completion) {
        ctx.fade_mask(0.0, Curve::EaseIn);
        ctx.host.animate(
            ctx.view,
            Animation::new().opacity(0.0).scale(Self::INITIAL_SCALE),
            ctx.duration,
            Curve::EaseIn,
            Some(done),
        );
    }
}

/// Directional slide from past a container edge to the original center.
pub struct Slide {
    pub edge: Edge,
}

impl Transition for Slide {
    fn present(&self, ctx: &TransitionContext, done: Completion) {
        let (start, end) = slide_endpoints(ctx.original_frame, ctx.container_bounds(), self.edge);
        if let Some(mask) = ctx.mask {
            ctx.host.set_opacity(mask, 0.0);
        }
        ctx.fade_mask(1.0, Curve::EaseOut);
        ctx.host.set_center(ctx.view, start);
        ctx.host.animate(
            ctx.view,
            Animation::new().center(end),
            ctx.duration,
            Curve::EaseOut,
            Some(done),
        );
    }

    fn dismiss(&self, ctx: &TransitionContext, done: Completion) {
        let (start, _) = slide_endpoints(ctx.original_frame, ctx.container_bounds(), self.edge);
        ctx.fade_mask(0.0, Curve::EaseIn);
        ctx.host.animate(
            ctx.view,
            Animation::new().center(start),
            ctx.duration,
            Curve::EaseIn,
            Some(done),
        );
    }
}
