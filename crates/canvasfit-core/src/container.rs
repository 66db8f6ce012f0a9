//! The image container.
//!
//! An [`Image`] is a file path plus, lazily, the decoded pixels behind it.
//! Every transform replaces the owned [`PixelBuffer`] only once the new one
//! is fully built, so a failed operation leaves the image as it was.
//!
//! ```ignore
//! use canvasfit_core::{Image, ResizeMethod, ResizeSpec};
//!
//! let mut image = Image::open("photo.jpg");
//! image.resize(&ResizeSpec::exact(200, 200).with_method(ResizeMethod::Fit))?;
//! image.save()?;
//! ```

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::codec::{Codec, ImageCodec, ImageFormat};
use crate::error::ImageError;
use crate::fs::{FileSystem, LocalFs};
use crate::params::{ResizeSpec, SliceSpec};
use crate::transform::{self, GridSlice};

/// A raster image backed by a file.
pub struct Image<F: FileSystem = LocalFs, C: Codec = ImageCodec> {
    path: PathBuf,
    fs: F,
    codec: C,
    /// In-memory bytes that take precedence over the file.
    content: Option<Vec<u8>>,
    buffer: Option<PixelBuffer>,
    format: Option<ImageFormat>,
    modified: Option<SystemTime>,
}

impl Image {
    /// An image at `path` on the local disk. Nothing is read until needed.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_collaborators(path, LocalFs, ImageCodec::default())
    }

    /// An in-memory image that will be written to `path` on [`save`](Self::save).
    pub fn from_source(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Result<Self, ImageError> {
        let mut image = Self::open(path);
        image.set_content(bytes, false)?;
        Ok(image)
    }
}

impl<F: FileSystem, C: Codec> Image<F, C> {
    pub fn with_collaborators(path: impl Into<PathBuf>, fs: F, codec: C) -> Self {
        Self {
            path: path.into(),
            fs,
            codec,
            content: None,
            buffer: None,
            format: None,
            modified: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// (Re)decode the image, discarding any transformed pixels.
    ///
    /// # Errors
    ///
    /// `NotReadable` when the file is missing or unreadable,
    /// `UnsupportedFormat` when it is not a JPEG, PNG or GIF.
    pub fn load(&mut self) -> Result<&PixelBuffer, ImageError> {
        let buffer = self.decode_current()?;
        Ok(self.buffer.insert(buffer))
    }

    /// The current pixels, loading them on first access.
    pub fn buffer(&mut self) -> Result<&PixelBuffer, ImageError> {
        let buffer = match self.buffer.take() {
            Some(buffer) => buffer,
            None => self.decode_current()?,
        };
        Ok(self.buffer.insert(buffer))
    }

    /// Source format, detected once from the content or file bytes.
    pub fn format(&mut self) -> Result<ImageFormat, ImageError> {
        if let Some(format) = self.format {
            return Ok(format);
        }

        let format = match &self.content {
            Some(bytes) => self.codec.detect_format(bytes),
            None => {
                let bytes = self.read_file()?;
                self.codec.detect_format(&bytes)
            }
        };
        self.format = Some(format);
        Ok(format)
    }

    pub fn mime_type(&mut self) -> Result<&'static str, ImageError> {
        Ok(self.format()?.mime_type())
    }

    pub fn extension(&mut self) -> Result<&'static str, ImageError> {
        Ok(self.format()?.extension())
    }

    /// Encode the current pixels.
    ///
    /// Without an explicit `format`, PNG and GIF sources stay PNG and GIF and
    /// everything else becomes JPEG. Without `quality` the codec default for
    /// the chosen format applies.
    pub fn content(
        &mut self,
        format: Option<ImageFormat>,
        quality: Option<u8>,
    ) -> Result<Vec<u8>, ImageError> {
        let format = match format {
            Some(format) => format,
            None => self.format()?.output(),
        };
        if !format.is_supported() {
            return Err(ImageError::UnsupportedFormat(format!(
                "cannot encode {} as {format:?}",
                self.path.display()
            )));
        }
        let quality = quality.unwrap_or_else(|| self.codec.default_quality(format));

        let current = match self.buffer.take() {
            Some(buffer) => buffer,
            None => self.decode_current()?,
        };
        let current = &*self.buffer.insert(current);
        self.codec.encode(current, format, quality)
    }

    /// JPEG bytes at `quality` (1-100).
    pub fn to_jpeg(&mut self, quality: u8) -> Result<Vec<u8>, ImageError> {
        self.content(Some(ImageFormat::Jpeg), Some(quality))
    }

    /// PNG bytes at `compression` (0-9).
    pub fn to_png(&mut self, compression: u8) -> Result<Vec<u8>, ImageError> {
        self.content(Some(ImageFormat::Png), Some(compression))
    }

    pub fn to_gif(&mut self) -> Result<Vec<u8>, ImageError> {
        self.content(Some(ImageFormat::Gif), None)
    }

    /// Resize in place. A resize skipped by the quality guard is a success
    /// that leaves the pixels untouched.
    pub fn resize(&mut self, spec: &ResizeSpec) -> Result<(), ImageError> {
        let resized = transform::resize(self.buffer()?, spec)?;
        if let Some(buffer) = resized {
            self.buffer = Some(buffer);
        }
        Ok(())
    }

    /// Scale both sides by `factor`; see [`transform::scale`].
    pub fn scale(&mut self, factor: f64) -> Result<(), ImageError> {
        let scaled = transform::scale(self.buffer()?, factor)?;
        if let Some(buffer) = scaled {
            self.buffer = Some(buffer);
        }
        Ok(())
    }

    /// Resize onto the grid canvas and return the requested cell.
    ///
    /// The grid canvas becomes the image's pixels.
    pub fn slice(&mut self, spec: &SliceSpec) -> Result<PixelBuffer, ImageError> {
        let GridSlice { canvas, cell, .. } = transform::slice(self.buffer()?, spec)?;
        self.buffer = Some(canvas);
        Ok(cell)
    }

    /// Slice and encode the cell in the source format.
    ///
    /// # Errors
    ///
    /// `UnsupportedFormat` unless the source is JPEG, PNG or GIF. There is
    /// no JPEG fallback here.
    pub fn slice_content(&mut self, spec: &SliceSpec) -> Result<Vec<u8>, ImageError> {
        let format = self.format()?;
        if !format.is_supported() {
            return Err(ImageError::UnsupportedFormat(format!(
                "cannot slice {}",
                self.path.display()
            )));
        }

        let cell = self.slice(spec)?;
        self.codec
            .encode(&cell, format, self.codec.default_quality(format))
    }

    /// Replace the image with `bytes`, optionally writing them out.
    ///
    /// The bytes are decoded first; on failure nothing changes.
    pub fn set_content(&mut self, bytes: Vec<u8>, auto_save: bool) -> Result<(), ImageError> {
        let (format, buffer) = self.decode_bytes(&bytes)?;

        self.content = Some(bytes);
        self.buffer = Some(buffer);
        self.format = Some(format);
        self.modified = None;

        if auto_save {
            self.save()?;
        }
        Ok(())
    }

    /// Write the image to its path.
    ///
    /// Decoded pixels are re-encoded in the output format of the source;
    /// raw content that was never decoded is written as-is.
    pub fn save(&mut self) -> Result<(), ImageError> {
        if !self.fs.is_writable(&self.path) {
            return Err(ImageError::NotWritable {
                path: self.path.clone(),
                reason: "permission denied".to_string(),
            });
        }

        let raw = match self.buffer {
            Some(_) => None,
            None => self.content.clone(),
        };
        let bytes = match raw {
            Some(raw) => raw,
            None => self.content(None, None)?,
        };

        self.fs
            .write(&self.path, &bytes)
            .map_err(|e| ImageError::NotWritable {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        self.modified = None;

        debug!(path = %self.path.display(), len = bytes.len(), "saved image");
        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.fs.exists(&self.path)
    }

    pub fn is_readable(&self) -> bool {
        self.fs.is_readable(&self.path)
    }

    pub fn is_writable(&self) -> bool {
        self.fs.is_writable(&self.path)
    }

    /// Remove the backing file. In-memory pixels are kept.
    pub fn delete(&mut self) -> Result<(), ImageError> {
        self.fs
            .delete(&self.path)
            .map_err(|e| ImageError::NotWritable {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        self.modified = None;
        Ok(())
    }

    /// Modification time of the file, or the Unix epoch if it cannot be read.
    pub fn modified(&mut self) -> SystemTime {
        if let Some(modified) = self.modified {
            return modified;
        }

        let modified = if self.fs.is_readable(&self.path) {
            self.fs.modified(&self.path).unwrap_or(SystemTime::UNIX_EPOCH)
        } else {
            SystemTime::UNIX_EPOCH
        };
        self.modified = Some(modified);
        modified
    }

    fn read_file(&self) -> Result<Vec<u8>, ImageError> {
        let not_readable = |reason: String| ImageError::NotReadable {
            path: self.path.clone(),
            reason,
        };

        if !self.fs.exists(&self.path) {
            return Err(not_readable("file does not exist".to_string()));
        }
        if !self.fs.is_readable(&self.path) {
            return Err(not_readable("permission denied".to_string()));
        }
        self.fs.read(&self.path).map_err(|e| not_readable(e.to_string()))
    }

    fn decode_bytes(&self, bytes: &[u8]) -> Result<(ImageFormat, PixelBuffer), ImageError> {
        let format = self.codec.detect_format(bytes);
        if !format.is_supported() {
            return Err(ImageError::UnsupportedFormat(format!(
                "{} is not a JPEG, PNG or GIF image",
                self.path.display()
            )));
        }
        Ok((format, self.codec.decode(bytes)?))
    }

    /// Decode from in-memory content if present, otherwise from the file.
    fn decode_current(&mut self) -> Result<PixelBuffer, ImageError> {
        let (format, buffer) = match &self.content {
            Some(bytes) => self.decode_bytes(bytes)?,
            None => {
                let bytes = self.read_file()?;
                self.decode_bytes(&bytes)?
            }
        };
        self.format = Some(format);

        debug!(
            path = %self.path.display(),
            ?format,
            width = buffer.width,
            height = buffer.height,
            "loaded image"
        );
        Ok(buffer)
    }
}

impl<F: FileSystem, C: Codec> std::fmt::Debug for Image<F, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("size", &self.buffer.as_ref().map(PixelBuffer::size))
            .finish_non_exhaustive()
    }
}
