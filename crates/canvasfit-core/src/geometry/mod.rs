//! Pure geometry for resize and grid-slice operations.
//!
//! Nothing here touches pixels. Given source dimensions and a
//! [`ResizeSpec`](crate::ResizeSpec), [`resolve`] decides the canvas size and
//! the two rectangles the compositor copies between:
//!
//! ```text
//!   source image                      destination canvas
//!  +----------------+                +-----------+
//!  |   +--------+   |   resample /   |+---------+|
//!  |   | source |   |  ------------> || dest    ||
//!  |   |  rect  |   |   block copy   || rect    ||
//!  |   +--------+   |                |+---------+|
//!  +----------------+                +-----------+
//! ```
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner
//! - Rectangle offsets are signed: destination rectangles may start left of
//!   or above the canvas, in which case the overhang is clipped
//! - All rounding follows the floor rules of each [`ResizeMethod`]

mod grid;
mod method;
mod resolve;

pub use grid::{check_cell, GridLayout};
pub use method::{FieldsMode, ResizeMethod};
pub use resolve::{resolve, resolve_dimensions, Layout, Resolution};

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    #[inline]
    pub fn aspect(self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// An axis-aligned rectangle with a signed origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle at the origin covering `size`.
    pub const fn full(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    pub fn right(self) -> i64 {
        self.x + self.width as i64
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i64 {
        self.y + self.height as i64
    }

    /// Overlap with another rectangle, or `None` when they are disjoint.
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32))
    }
}
