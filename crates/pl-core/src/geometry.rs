/// Derived grid layout, shared read-only by the mapper and every exporter.
///
/// Derived once per conversion and never mutated afterwards.
///
/// # Example
/// ```
/// use pl_core::geometry::GridGeometry;
/// let g = GridGeometry {
///     columns: 10,
///     rows: 5,
///     cell_width_px: 6.0,
///     cell_height_px: 10.0,
///     font_size_px: 10.0,
///     canvas_width_px: 60,
///     canvas_height_px: 50,
///     physical_size_mm: None,
/// };
/// assert_eq!(g.cell_origin(2, 3), (12.0, 30.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    /// Character columns.
    pub columns: u32,
    /// Character rows.
    pub rows: u32,
    /// Cell width in pixels (not necessarily integral).
    ///
    /// On fixed media cells are pen-sized and the grid is anchored at the
    /// canvas origin, so `columns × cell_width_px` may fall short of
    /// `canvas_width_px` (same for rows). See [`GridGeometry::grid_extent_px`].
    pub cell_width_px: f32,
    /// Cell height in pixels.
    pub cell_height_px: f32,
    /// Glyph size that tiles one cell.
    pub font_size_px: f32,
    /// Output surface width: image width in Auto, media width otherwise.
    pub canvas_width_px: u32,
    /// Output surface height.
    pub canvas_height_px: u32,
    /// Paper size for fixed media, `None` in Auto.
    pub physical_size_mm: Option<(f32, f32)>,
}

impl GridGeometry {
    /// Top-left corner of cell `(column, row)` in canvas pixels.
    #[inline(always)]
    #[must_use]
    pub fn cell_origin(&self, column: u32, row: u32) -> (f32, f32) {
        (
            column as f32 * self.cell_width_px,
            row as f32 * self.cell_height_px,
        )
    }

    /// Extent covered by the grid, `(columns × cellWidth, rows × cellHeight)`.
    #[must_use]
    pub fn grid_extent_px(&self) -> (f32, f32) {
        (
            self.columns as f32 * self.cell_width_px,
            self.rows as f32 * self.cell_height_px,
        )
    }

    /// True for fixed-media layouts.
    #[must_use]
    pub fn is_fixed_media(&self) -> bool {
        self.physical_size_mm.is_some()
    }
}
