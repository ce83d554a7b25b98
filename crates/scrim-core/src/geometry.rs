#![forbid(unsafe_code)]

//! Continuous 2-D geometry for overlay surfaces.
//!
//! Overlay animation interpolates sub-pixel positions, so everything
//! here is `f64`-valued. A [`Rect`] is origin + size; its [`center`]
//! is the anchor used by directional transitions, gesture tracking,
//! and keyboard avoidance.
//!
//! [`center`]: Rect::center

/// A point in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// Create a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    /// Create a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle: origin (top-left) + size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    /// Create a rectangle from scalar components.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Right edge.
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    /// Bottom edge.
    #[inline]
    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// The rectangle's center point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// The same size repositioned so its center lands on `center`.
    pub fn with_center(&self, center: Point) -> Rect {
        Rect {
            origin: Point::new(
                center.x - self.size.width / 2.0,
                center.y - self.size.height / 2.0,
            ),
            size: self.size,
        }
    }
}
