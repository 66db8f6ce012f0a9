//! Pixel operations driven by resolved geometry.
//!
//! - [`composite`]/[`resize`]/[`scale`] turn a [`Layout`](crate::geometry::Layout)
//!   into a new canvas
//! - [`slice`] resizes onto a grid canvas and cuts out one cell
//!
//! Pixel work itself goes through `image::imageops`. Every operation
//! allocates a fresh buffer and leaves its input untouched.

mod composite;
mod slice;

pub use composite::{composite, resize, scale};
pub use slice::{slice, GridSlice};
