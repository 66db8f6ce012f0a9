//! Grid addressing for slice operations.

use super::{FieldsMode, Rect, Size};
use crate::error::ImageError;

/// A uniform `columns × rows` grid over a working canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Size of every cell.
    pub cell: Size,
    pub columns: u32,
    pub rows: u32,
}

impl GridLayout {
    /// Compute the cell size for covering `overall` with a grid.
    ///
    /// Without fields the cell size rounds down, so the grid may fall short
    /// of the requested area by less than one cell per axis. With fields it
    /// rounds up and may overshoot instead.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` for zero counts, `InvalidDimensions` when a cell
    /// side comes out as zero.
    pub fn new(
        overall: Size,
        columns: u32,
        rows: u32,
        fields: FieldsMode,
    ) -> Result<Self, ImageError> {
        // A zero count leaves no valid index at all
        check_cell(0, 0, columns, rows)?;

        let cell = match fields {
            FieldsMode::WithoutFields => {
                Size::new(overall.width / columns, overall.height / rows)
            }
            FieldsMode::WithFields => Size::new(
                overall.width.div_ceil(columns),
                overall.height.div_ceil(rows),
            ),
        };

        if cell.width == 0 || cell.height == 0 {
            return Err(ImageError::InvalidDimensions(format!(
                "{}x{} cannot hold a {columns}x{rows} grid",
                overall.width, overall.height
            )));
        }

        Ok(Self {
            cell,
            columns,
            rows,
        })
    }

    /// The working canvas: exactly `columns` cells wide and `rows` cells tall.
    pub fn canvas(&self) -> Result<Size, ImageError> {
        let width = self.cell.width.checked_mul(self.columns);
        let height = self.cell.height.checked_mul(self.rows);
        match (width, height) {
            (Some(width), Some(height)) => Ok(Size::new(width, height)),
            _ => Err(ImageError::InvalidDimensions(format!(
                "grid canvas {}x{} cells of {:?} overflows",
                self.columns, self.rows, self.cell
            ))),
        }
    }

    /// Rectangle of the cell at (`column`, `row`) on the working canvas.
    pub fn cell_rect(&self, column: u32, row: u32) -> Result<Rect, ImageError> {
        check_cell(column, row, self.columns, self.rows)?;

        Ok(Rect::new(
            column as i64 * self.cell.width as i64,
            row as i64 * self.cell.height as i64,
            self.cell.width,
            self.cell.height,
        ))
    }
}

/// Check `0 <= column < columns` and `0 <= row < rows`.
pub fn check_cell(column: u32, row: u32, columns: u32, rows: u32) -> Result<(), ImageError> {
    check_index("column", column, columns)?;
    check_index("row", row, rows)
}

fn check_index(axis: &'static str, index: u32, count: u32) -> Result<(), ImageError> {
    if index >= count {
        return Err(ImageError::IndexOutOfRange { axis, index, count });
    }
    Ok(())
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn fields_strategy() -> impl Strategy<Value = FieldsMode> {
        prop_oneof![Just(FieldsMode::WithFields), Just(FieldsMode::WithoutFields)]
    }

    proptest! {
        /// Property: cells tile the canvas exactly, with no gaps or overlaps.
        #[test]
        fn prop_cells_tile_canvas(
            overall in (1u32..=300, 1u32..=300),
            columns in 1u32..=8,
            rows in 1u32..=8,
            fields in fields_strategy(),
        ) {
            let grid = GridLayout::new(Size::new(overall.0, overall.1), columns, rows, fields);
            prop_assume!(grid.is_ok());
            let grid = grid.unwrap();
            let canvas = grid.canvas().unwrap();

            let mut coverage = vec![0u8; (canvas.width * canvas.height) as usize];
            for row in 0..rows {
                for column in 0..columns {
                    let rect = grid.cell_rect(column, row).unwrap();
                    for y in rect.y..rect.bottom() {
                        for x in rect.x..rect.right() {
                            coverage[(y as u32 * canvas.width + x as u32) as usize] += 1;
                        }
                    }
                }
            }

            prop_assert!(coverage.iter().all(|&c| c == 1));
        }

        /// Property: anything outside [0, count) is rejected.
        #[test]
        fn prop_out_of_range_rejected(
            columns in 1u32..=8,
            rows in 1u32..=8,
            past in 0u32..=10,
        ) {
            let grid =
                GridLayout::new(Size::new(400, 400), columns, rows, FieldsMode::WithoutFields)
                    .unwrap();

            let column_err = matches!(
                grid.cell_rect(columns + past, 0),
                Err(ImageError::IndexOutOfRange { .. })
            );
            let row_err = matches!(
                grid.cell_rect(0, rows + past),
                Err(ImageError::IndexOutOfRange { .. })
            );
            prop_assert!(column_err);
            prop_assert!(row_err);
        }

        /// Property: the canvas never deviates from the request by a full cell.
        #[test]
        fn prop_canvas_within_one_cell(
            overall in (8u32..=300, 8u32..=300),
            columns in 1u32..=8,
            rows in 1u32..=8,
            fields in fields_strategy(),
        ) {
            let size = Size::new(overall.0, overall.1);
            let grid = GridLayout::new(size, columns, rows, fields).unwrap();
            let canvas = grid.canvas().unwrap();

            match fields {
                FieldsMode::WithoutFields => {
                    prop_assert!(canvas.width <= overall.0);
                    prop_assert!(overall.0 - canvas.width < columns);
                    prop_assert!(canvas.height <= overall.1);
                    prop_assert!(overall.1 - canvas.height < rows);
                }
                FieldsMode::WithFields => {
                    prop_assert!(canvas.width >= overall.0);
                    prop_assert!(canvas.width - overall.0 < columns);
                    prop_assert!(canvas.height >= overall.1);
                    prop_assert!(canvas.height - overall.1 < rows);
                }
            }
        }
    }
}
