#![forbid(unsafe_code)]

//! Priority-stacked overlay presentation above a host view tree.
//!
//! `scrim` coordinates transient surfaces — toasts, alerts, panels,
//! pickers — over an application's content: backdrop masks, entrance and
//! exit transitions, swipe-to-dismiss gestures, keyboard avoidance,
//! auto-dismiss timers, and a z-ordered queue where higher-priority
//! overlays always render above lower ones.
//!
//! The crate never draws or runs an event loop itself; the embedding
//! application supplies a [`RenderHost`] (views, z-placement, property
//! animation, deferred tasks) and forwards keyboard notifications into
//! the coordinator's [`KeyboardHub`]. Everything is single-threaded and
//! UI-affine, shared through `Rc` handles.
//!
//! ```
//! use std::rc::Rc;
//! use scrim::{AnimationKind, Coordinator, Edge, OverlayConfig, RenderHost};
//! use scrim_core::geometry::Rect;
//! use scrim_core::test_host::StubHost;
//!
//! let host = Rc::new(StubHost::new());
//! host.make_container(300.0, 600.0);
//! let coordinator = Coordinator::new(host.clone() as Rc<dyn RenderHost>);
//!
//! let toast = host.make_view(Rect::new(10.0, 20.0, 100.0, 50.0));
//! let handle = coordinator.show(
//!     toast,
//!     OverlayConfig::new()
//!         .animation(AnimationKind::Directional(Edge::Bottom))
//!         .auto_dismiss_after(std::time::Duration::from_secs(2)),
//! )?;
//!
//! host.settle(); // test host: pump the entrance animation
//! assert!(handle.is_displaying());
//! # Ok::<(), scrim::Error>(())
//! ```

pub mod config;
pub mod coordinator;
mod record;
pub mod transition;

pub use config::{
    AnimationKind, DismissOption, Edge, KeyboardCallback, KeyboardFrameCallback,
    LifecycleCallback, OverlayConfig, Priority,
};
pub use coordinator::{Coordinator, hide_view, set_default, show};
pub use record::{OverlayHandle, Phase};
pub use transition::{Transition, TransitionContext, slide_endpoints};

pub use scrim_core::color::Rgba;
pub use scrim_core::error::{Error, Result};
pub use scrim_core::geometry::{Point, Rect, Size};
pub use scrim_core::host::{
    Animation, BlurKind, Completion, Curve, MaskStyle, RenderHost, ViewId,
};
pub use scrim_core::keyboard::{KeyboardEvent, KeyboardHub, KeyboardInfo, KeyboardSubscription};
