//! Error type shared by geometry, compositing, codec and container operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by canvasfit operations.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Width or height is missing, zero, or could not be resolved.
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Resize method or fields mode value is not recognised.
    #[error("Unsupported resize method: {0}")]
    UnsupportedMethod(String),

    /// Slice coordinates fall outside the grid.
    #[error("{axis} index {index} out of range 0..{count}")]
    IndexOutOfRange {
        axis: &'static str,
        index: u32,
        count: u32,
    },

    /// The destination canvas could not be allocated.
    #[error("Cannot allocate {width}x{height} canvas")]
    CanvasAllocation { width: u32, height: u32 },

    /// A copy rectangle degenerated to zero width or height.
    #[error("Degenerate copy rectangle: {0}")]
    Geometry(String),

    /// The backing file does not exist or cannot be read.
    #[error("File {} is not readable: {reason}", path.display())]
    NotReadable { path: PathBuf, reason: String },

    /// The destination cannot be written.
    #[error("File {} is not writable: {reason}", path.display())]
    NotWritable { path: PathBuf, reason: String },

    /// The bytes are not a supported image or could not be decoded.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Background colour is not a 6-digit hex string.
    #[error("Invalid colour '{0}', expected 6 hex digits")]
    InvalidColor(String),

    /// The encoder failed.
    #[error("Encoding failed: {0}")]
    Encoding(String),
}
