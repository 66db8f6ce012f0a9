//! Parameter types for resize and slice operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between callers (the [`Image`](crate::Image) container, or code
//! driving the transforms directly) and the geometry/compositing layer.
//!
//! ## Types
//!
//! - [`ResizeSpec`]: target size, method, padding, alignment, background, quality guard.
//! - [`SliceSpec`]: overall grid size, cell coordinates, grid counts, padding.

use serde::{Deserialize, Serialize};

use crate::buffer::Rgb;
use crate::geometry::{FieldsMode, ResizeMethod};

/// Alignment used when none is given: centre on both axes.
pub const DEFAULT_ALIGN: f64 = 0.5;

/// Default grid for slicing: 5 columns by 5 rows.
pub const DEFAULT_GRID: u32 = 5;

/// Full description of one resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeSpec {
    /// Requested width; completed from the aspect ratio when absent.
    pub width: Option<u32>,
    /// Requested height; completed from the aspect ratio when absent.
    pub height: Option<u32>,
    pub method: ResizeMethod,
    pub fields: FieldsMode,
    /// Horizontal position of the visible content, 0 = left, 1 = right.
    pub h_align: f64,
    /// Vertical position of the visible content, 0 = top, 1 = bottom.
    pub v_align: f64,
    /// Padding colour, used only with [`FieldsMode::WithFields`].
    pub background: Rgb,
    /// Skip the resize when it would enlarge both sides.
    pub keep_quality: bool,
}

impl Default for ResizeSpec {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            method: ResizeMethod::default(),
            fields: FieldsMode::default(),
            h_align: DEFAULT_ALIGN,
            v_align: DEFAULT_ALIGN,
            background: Rgb::default(),
            keep_quality: true,
        }
    }
}

impl ResizeSpec {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Both sides given.
    pub fn exact(width: u32, height: u32) -> Self {
        Self::new(Some(width), Some(height))
    }

    /// Width only; height follows the source aspect.
    pub fn width(width: u32) -> Self {
        Self::new(Some(width), None)
    }

    /// Height only; width follows the source aspect.
    pub fn height(height: u32) -> Self {
        Self::new(None, Some(height))
    }

    pub fn with_method(mut self, method: ResizeMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_fields(mut self, fields: FieldsMode) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_align(mut self, h_align: f64, v_align: f64) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    pub fn with_background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }

    pub fn with_keep_quality(mut self, keep_quality: bool) -> Self {
        self.keep_quality = keep_quality;
        self
    }

    /// Alignment fractions clamped to `[0, 1]`; NaN centres.
    pub fn alignment(&self) -> (f64, f64) {
        (clamp_align(self.h_align), clamp_align(self.v_align))
    }
}

fn clamp_align(value: f64) -> f64 {
    if value.is_nan() {
        DEFAULT_ALIGN
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// One cell of a uniformly partitioned, resized image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceSpec {
    /// Overall width the grid should cover.
    pub width: u32,
    /// Overall height the grid should cover.
    pub height: u32,
    /// Zero-based column index.
    pub column: u32,
    /// Zero-based row index.
    pub row: u32,
    pub columns: u32,
    pub rows: u32,
    pub fields: FieldsMode,
}

impl SliceSpec {
    /// Cell (`column`, `row`) of the default 5×5 grid over `width × height`.
    pub fn new(width: u32, height: u32, column: u32, row: u32) -> Self {
        Self {
            width,
            height,
            column,
            row,
            columns: DEFAULT_GRID,
            rows: DEFAULT_GRID,
            fields: FieldsMode::WithoutFields,
        }
    }

    pub fn with_grid(mut self, columns: u32, rows: u32) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    pub fn with_fields(mut self, fields: FieldsMode) -> Self {
        self.fields = fields;
        self
    }
}
