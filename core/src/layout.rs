//! Mapping between grid coordinates and drawing-surface pixels.

use glam::Vec2;

use crate::{catalog::GridPoint, CellCoord};

/// Square-tile board fitted and centred inside a drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    canvas: Vec2,
    offset: Vec2,
    tile_size: f32,
    columns: u32,
    rows: u32,
}

impl BoardLayout {
    /// Fits a `columns` by `rows` grid into a surface, centring the leftover
    /// space on the shorter axis.
    #[must_use]
    pub fn fit(width: f32, height: f32, columns: u32, rows: u32) -> Self {
        let canvas = Vec2::new(width.max(0.0), height.max(0.0));
        if columns == 0 || rows == 0 {
            return Self {
                canvas,
                offset: Vec2::ZERO,
                tile_size: 0.0,
                columns,
                rows,
            };
        }

        let tile_size = (canvas.x / columns as f32).min(canvas.y / rows as f32);
        let grid = Vec2::new(columns as f32, rows as f32) * tile_size;
        Self {
            canvas,
            offset: (canvas - grid) * 0.5,
            tile_size,
            columns,
            rows,
        }
    }

    /// Layout with an explicit tile size anchored at the origin.
    #[must_use]
    pub fn with_tile_size(tile_size: f32, columns: u32, rows: u32) -> Self {
        let tile_size = tile_size.max(0.0);
        Self {
            canvas: Vec2::new(columns as f32, rows as f32) * tile_size,
            offset: Vec2::ZERO,
            tile_size,
            columns,
            rows,
        }
    }

    /// Side length of a tile in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Pixel position of the grid's upper-left corner.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Size of the surface the layout was fitted into.
    #[must_use]
    pub const fn canvas(&self) -> Vec2 {
        self.canvas
    }

    /// Number of grid columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of grid rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Size of the drawn grid in pixels.
    #[must_use]
    pub fn grid_size(&self) -> Vec2 {
        Vec2::new(self.columns as f32, self.rows as f32) * self.tile_size
    }

    /// Reports whether the layout covers any visible area.
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.tile_size > f32::EPSILON
    }

    /// Converts a fractional grid position to pixels without centring.
    #[must_use]
    pub fn grid_to_pixel(&self, grid: Vec2) -> Vec2 {
        self.offset + grid * self.tile_size
    }

    /// Pixel centre of a cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        self.grid_to_pixel(Vec2::new(cell.column() as f32, cell.row() as f32) + 0.5)
    }

    /// Pixel position of a waypoint, centred within its tile.
    #[must_use]
    pub fn grid_point_to_pixel(&self, point: GridPoint) -> Vec2 {
        self.grid_to_pixel(Vec2::new(point.x, point.y) + 0.5)
    }

    /// Converts a pixel position to fractional grid coordinates.
    #[must_use]
    pub fn pixel_to_grid(&self, pixel: Vec2) -> Option<Vec2> {
        if !self.has_area() {
            return None;
        }
        Some((pixel - self.offset) / self.tile_size)
    }

    /// Cell under a pixel position, or `None` outside the grid.
    #[must_use]
    pub fn pixel_to_cell(&self, pixel: Vec2) -> Option<CellCoord> {
        let grid = self.pixel_to_grid(pixel)?.floor();
        if grid.x < 0.0
            || grid.y < 0.0
            || grid.x >= self.columns as f32
            || grid.y >= self.rows as f32
        {
            return None;
        }
        Some(CellCoord::new(grid.x as u32, grid.y as u32))
    }
}
