#![forbid(unsafe_code)]

//! Overlay configuration.
//!
//! [`OverlayConfig`] is a plain value object with builder-style setters;
//! every field has a default (mask = 25 %-opacity black, priority
//! normal, fade over 0.3 s, everything else off).
//!
//! Mutability after `show`: callbacks may be attached late via
//! [`OverlayHandle::update_config`], but `container`, `mask_style`,
//! `priority`, and `animation` are captured when the overlay is
//! inserted — changing them afterwards has no effect.
//!
//! [`OverlayHandle::update_config`]: crate::OverlayHandle::update_config

use std::rc::Rc;
use std::time::Duration;

use scrim_core::geometry::Rect;
use scrim_core::host::{MaskStyle, ViewId};

use crate::record::OverlayHandle;
use crate::transition::Transition;

/// Z-order tier among concurrently displayed overlays.
///
/// Higher tiers always render above lower tiers regardless of show
/// order; within a tier, later overlays sit above earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    VeryLow,
    Low,
    #[default]
    Normal,
    High,
    VeryHigh,
}

/// Container edge a directional transition enters from (and a gesture
/// dismisses toward).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Left,
    Bottom,
    Right,
}

/// Entrance/exit animation selection.
#[derive(Clone, Default)]
pub enum AnimationKind {
    /// Opacity 0 → 1 and back; no geometry change.
    #[default]
    Fade,
    /// Opacity plus uniform scale 0.2 → 1.0; mask fades in lockstep.
    Scale,
    /// Slide in from past the given container edge.
    Directional(Edge),
    /// Caller-supplied strategy; treated opaquely.
    Custom(Rc<dyn Transition>),
}

impl AnimationKind {
    /// Whether interactive (gesture) dismissal applies to this kind.
    pub(crate) fn directional_edge(&self) -> Option<Edge> {
        match self {
            AnimationKind::Directional(edge) => Some(*edge),
            _ => None,
        }
    }
}

impl core::fmt::Debug for AnimationKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AnimationKind::Fade => write!(f, "Fade"),
            AnimationKind::Scale => write!(f, "Scale"),
            AnimationKind::Directional(edge) => write!(f, "Directional({edge:?})"),
            AnimationKind::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Which overlays a bulk hide targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissOption {
    /// The lowest-z (bottom-most) overlay.
    First,
    /// The highest-z (front-most) overlay.
    Last,
    /// Every overlay, with animation suppressed.
    All,
}

/// Per-overlay lifecycle callback.
pub type LifecycleCallback = Rc<dyn Fn(&OverlayHandle)>;
/// Zero-argument keyboard callback.
pub type KeyboardCallback = Rc<dyn Fn()>;
/// Keyboard frame-change callback: begin frame, end frame, duration.
pub type KeyboardFrameCallback = Rc<dyn Fn(Rect, Rect, Duration)>;

/// Caller-supplied overlay configuration snapshot.
#[derive(Clone, Default)]
pub struct OverlayConfig {
    /// Host surface the overlay and mask attach to; the host's default
    /// (key/foreground) container when `None`.
    pub container: Option<ViewId>,
    /// Backdrop rendering intent.
    pub mask_style: MaskStyle,
    /// Z-order tier.
    pub priority: Priority,
    /// Entrance/exit animation.
    pub animation: AnimationKind,
    /// Present/dismiss animation duration.
    pub animation_duration: Duration,
    /// Automatic dismissal delay after display; zero = never.
    pub auto_dismiss_after: Duration,
    /// Hide when the mask is tapped.
    pub dismiss_on_backdrop_tap: bool,
    /// Track drag gestures toward the animation edge.
    pub interactive_dismiss: bool,
    /// Fraction of the dragged dimension that commits a dismissal,
    /// in `(0, 1]`.
    pub interactive_dismiss_threshold: f64,
    /// Reposition above the keyboard and forward keyboard events.
    pub track_keyboard: bool,
    /// Extra distance kept between overlay bottom and keyboard top.
    pub keyboard_gap: f64,
    /// Dismiss every other overlay (without animation) before showing.
    pub exclusive: bool,

    pub on_will_show: Option<LifecycleCallback>,
    pub on_did_show: Option<LifecycleCallback>,
    pub on_will_hide: Option<LifecycleCallback>,
    pub on_did_hide: Option<LifecycleCallback>,
    /// When set, [`OverlayHandle::request_hide`] delegates dismissal
    /// entirely to this callback; the coordinator does not auto-remove.
    ///
    /// [`OverlayHandle::request_hide`]: crate::OverlayHandle::request_hide
    pub on_custom_hide: Option<LifecycleCallback>,

    pub on_keyboard_will_show: Option<KeyboardCallback>,
    pub on_keyboard_did_show: Option<KeyboardCallback>,
    pub on_keyboard_frame_will_change: Option<KeyboardFrameCallback>,
    pub on_keyboard_frame_did_change: Option<KeyboardFrameCallback>,
    pub on_keyboard_will_hide: Option<KeyboardCallback>,
    pub on_keyboard_did_hide: Option<KeyboardCallback>,
}

impl OverlayConfig {
    pub fn new() -> Self {
        Self {
            container: None,
            mask_style: MaskStyle::default(),
            priority: Priority::Normal,
            animation: AnimationKind::Fade,
            animation_duration: Duration::from_millis(300),
            auto_dismiss_after: Duration::ZERO,
            dismiss_on_backdrop_tap: false,
            interactive_dismiss: false,
            interactive_dismiss_threshold: 0.5,
            track_keyboard: false,
            keyboard_gap: 0.0,
            exclusive: false,
            on_will_show: None,
            on_did_show: None,
            on_will_hide: None,
            on_did_hide: None,
            on_custom_hide: None,
            on_keyboard_will_show: None,
            on_keyboard_did_show: None,
            on_keyboard_frame_will_change: None,
            on_keyboard_frame_did_change: None,
            on_keyboard_will_hide: None,
            on_keyboard_did_hide: None,
        }
    }

    pub fn container(mut self, container: ViewId) -> Self {
        self.container = Some(container);
        self
    }

    pub fn mask_style(mut self, style: MaskStyle) -> Self {
        self.mask_style = style;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn animation(mut self, animation: AnimationKind) -> Self {
        self.animation = animation;
        self
    }

    pub fn animation_duration(mut self, duration: Duration) -> Self {
        self.animation_duration = duration;
        self
    }

    pub fn auto_dismiss_after(mut self, delay: Duration) -> Self {
        self.auto_dismiss_after = delay;
        self
    }

    pub fn dismiss_on_backdrop_tap(mut self, dismiss: bool) -> Self {
        self.dismiss_on_backdrop_tap = dismiss;
        self
    }

    pub fn interactive_dismiss(mut self, enabled: bool) -> Self {
        self.interactive_dismiss = enabled;
        self
    }

    /// Commit fraction in `(0, 1]`; values outside are clamped when the
    /// gesture ends.
    pub fn interactive_dismiss_threshold(mut self, threshold: f64) -> Self {
        self.interactive_dismiss_threshold = threshold;
        self
    }

    pub fn track_keyboard(mut self, track: bool) -> Self {
        self.track_keyboard = track;
        self
    }

    pub fn keyboard_gap(mut self, gap: f64) -> Self {
        self.keyboard_gap = gap;
        self
    }

    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn on_will_show(mut self, f: impl Fn(&OverlayHandle) + 'static) -> Self {
        self.on_will_show = Some(Rc::new(f));
        self
    }

    pub fn on_did_show(mut self, f: impl Fn(&OverlayHandle) + 'static) -> Self {
        self.on_did_show = Some(Rc::new(f));
        self
    }

    pub fn on_will_hide(mut self, f: impl Fn(&OverlayHandle) + 'static) -> Self {
        self.on_will_hide = Some(Rc::new(f));
        self
    }

    pub fn on_did_hide(mut self, f: impl Fn(&OverlayHandle) + 'static) -> Self {
        self.on_did_hide = Some(Rc::new(f));
        self
    }

    pub fn on_custom_hide(mut self, f: impl Fn(&OverlayHandle) + 'static) -> Self {
        self.on_custom_hide = Some(Rc::new(f));
        self
    }

    pub fn on_keyboard_will_show(mut self, f: impl Fn() + 'static) -> Self {
        self.on_keyboard_will_show = Some(Rc::new(f));
        self
    }

    pub fn on_keyboard_did_show(mut self, f: impl Fn() + 'static) -> Self {
        self.on_keyboard_did_show = Some(Rc::new(f));
        self
    }

    pub fn on_keyboard_frame_will_change(
        mut self,
        f: impl Fn(Rect, Rect, Duration) + 'static,
    ) -> Self {
        self.on_keyboard_frame_will_change = Some(Rc::new(f));
        self
    }

    pub fn on_keyboard_frame_did_change(
        mut self,
        f: impl Fn(Rect, Rect, Duration) + 'static,
    ) -> Self {
        self.on_keyboard_frame_did_change = Some(Rc::new(f));
        self
    }

    pub fn on_keyboard_will_hide(mut self, f: impl Fn() + 'static) -> Self {
        self.on_keyboard_will_hide = Some(Rc::new(f));
        self
    }

    pub fn on_keyboard_did_hide(mut self, f: impl Fn() + 'static) -> Self {
        self.on_keyboard_did_hide = Some(Rc::new(f));
        self
    }
}

impl core::fmt::Debug for OverlayConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OverlayConfig")
            .field("container", &self.container)
            .field("mask_style", &self.mask_style)
            .field("priority", &self.priority)
            .field("animation", &self.animation)
            .field("animation_duration", &self.animation_duration)
            .field("auto_dismiss_after", &self.auto_dismiss_after)
            .field("dismiss_on_backdrop_tap", &self.dismiss_on_backdrop_tap)
            .field("interactive_dismiss", &self.interactive_dismiss)
            .field(
                "interactive_dismiss_threshold",
                &self.interactive_dismiss_threshold,
            )
            .field("track_keyboard", &self.track_keyboard)
            .field("keyboard_gap", &self.keyboard_gap)
            .field("exclusive", &self.exclusive)
            .finish_non_exhaustive()
    }
}
