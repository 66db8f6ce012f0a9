//! Canvasfit Core - fit raster images onto exact canvases
//!
//! This crate resizes, crops, pads and grid-slices images under a small set
//! of resize policies ([`ResizeMethod`]), with optional background padding
//! ([`FieldsMode`]) and alignment of the visible region.
//!
//! # Layout
//!
//! - [`geometry`] - pure rectangle arithmetic: target completion, the
//!   per-method layouts, grid addressing
//! - [`transform`] - pixel work driven by a layout: compositing, resampling,
//!   slicing
//! - [`codec`] - JPEG/PNG/GIF decode and encode behind the [`Codec`] trait
//! - [`fs`] - file access behind the [`FileSystem`] trait
//! - [`container`] - [`Image`], tying everything to a file
//! - [`config`] - TOML defaults for all of the above
//!
//! # Logging
//!
//! Operations emit `tracing` events (`debug` at operation boundaries, `trace`
//! for resolved rectangles). No subscriber is installed here.

pub mod buffer;
pub mod codec;
pub mod config;
pub mod container;
pub mod error;
pub mod fs;
pub mod geometry;
pub mod params;
pub mod transform;

pub use buffer::{PixelBuffer, Rgb};
pub use codec::{Codec, ImageCodec, ImageFormat};
pub use config::{CanvasConfig, ConfigError};
pub use container::Image;
pub use error::ImageError;
pub use fs::{is_acceptable_filename, FileSystem, LocalFs};
pub use geometry::{
    resolve, resolve_dimensions, FieldsMode, GridLayout, Layout, Rect, ResizeMethod, Resolution,
    Size,
};
pub use params::{ResizeSpec, SliceSpec};
pub use transform::{resize, scale, slice, GridSlice};
