#![forbid(unsafe_code)]

//! Platform-boundary primitives for the scrim overlay coordinator.
//!
//! This crate defines everything the coordinator needs from the outside
//! world, without owning any of it:
//!
//! - [`geometry`]: continuous 2-D points, sizes, and rectangles.
//! - [`color`]: the RGBA tint handed to backdrop masks.
//! - [`host`]: the [`RenderHost`] collaborator trait — attachment,
//!   z-placement, geometry, animation, and deferred tasks — plus the
//!   [`ScheduledTask`] RAII guard.
//! - [`keyboard`]: the [`KeyboardHub`] notification dispatcher with
//!   RAII [`KeyboardSubscription`] guards.
//! - [`error`]: the configuration-error taxonomy.
//!
//! The crate draws no pixels and spawns no threads; all types assume a
//! single UI-affine execution context.

pub mod color;
pub mod error;
pub mod geometry;
pub mod host;
pub mod keyboard;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_host;

pub use color::Rgba;
pub use error::{Error, Result};
pub use geometry::{Point, Rect, Size};
pub use host::{
    Animation, BlurKind, Completion, Curve, MaskStyle, RenderHost, ScheduledTask, TaskId, ViewId,
};
pub use keyboard::{KeyboardEvent, KeyboardHub, KeyboardInfo, KeyboardSubscription};

#[cfg(any(test, feature = "test-helpers"))]
pub use test_host::StubHost;
