//! Grid slicing.

use image::imageops;
use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::error::ImageError;
use crate::geometry::{check_cell, resolve, GridLayout, Rect, ResizeMethod, Resolution, Size};
use crate::params::{ResizeSpec, SliceSpec};

use super::composite::composite_image;

/// Result of slicing: the whole working canvas and the requested cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSlice {
    /// The source resized to exactly `columns × rows` cells.
    pub canvas: PixelBuffer,
    /// A copy of the requested cell.
    pub cell: PixelBuffer,
    /// Where the cell sits on the canvas.
    pub rect: Rect,
}

/// Resize `source` onto a grid canvas and cut out one cell.
///
/// Indices are checked before any pixel work. The resize always uses FILL
/// with the quality guard off, so small sources are upscaled to the grid.
pub fn slice(source: &PixelBuffer, spec: &SliceSpec) -> Result<GridSlice, ImageError> {
    check_cell(spec.column, spec.row, spec.columns, spec.rows)?;

    let grid = GridLayout::new(
        Size::new(spec.width, spec.height),
        spec.columns,
        spec.rows,
        spec.fields,
    )?;
    let canvas_size = grid.canvas()?;
    let rect = grid.cell_rect(spec.column, spec.row)?;

    let resize_spec = ResizeSpec::exact(canvas_size.width, canvas_size.height)
        .with_method(ResizeMethod::Fill)
        .with_fields(spec.fields)
        .with_keep_quality(false);
    let layout = match resolve(source.size(), &resize_spec)? {
        Resolution::Layout(layout) => layout,
        Resolution::Unchanged => {
            return Err(ImageError::Geometry(format!(
                "grid canvas {}x{} was not laid out",
                canvas_size.width, canvas_size.height
            )));
        }
    };
    let canvas = composite_image(
        source,
        &layout,
        resize_spec.method,
        resize_spec.fields,
        resize_spec.background,
    )?;

    let cell = imageops::crop_imm(
        &canvas,
        rect.x as u32,
        rect.y as u32,
        rect.width,
        rect.height,
    )
    .to_image();
    let canvas = PixelBuffer::from_canvas(canvas);
    let cell = PixelBuffer::from_canvas(cell);
    debug!(
        column = spec.column,
        row = spec.row,
        grid = ?(spec.columns, spec.rows),
        canvas = ?canvas.size(),
        cell = ?rect,
        "sliced"
    );

    Ok(GridSlice { canvas, cell, rect })
}


// ============================================================================
// Property-Based Tests
// ============================================================================
