//! Pixel-space geometry shared by widgets and the gesture tracker.
//!
//! Terminal frontends work in character cells, but gesture thresholds are
//! expressed in pixels so they read the same as on any pointer surface.
//! `CellMetrics` converts between the two.

/// A point in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned bounds of a rendered element, in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// Size of one terminal cell in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub cell_width_px: f32,
    pub cell_height_px: f32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            cell_width_px: 8.0,
            cell_height_px: 16.0,
        }
    }
}

impl CellMetrics {
    pub fn new(cell_width_px: f32, cell_height_px: f32) -> Self {
        Self {
            cell_width_px,
            cell_height_px,
        }
    }

    /// Centre of the cell at (col, row)
    pub fn cell_center(&self, col: u16, row: u16) -> Point {
        Point::new(
            (col as f32 + 0.5) * self.cell_width_px,
            (row as f32 + 0.5) * self.cell_height_px,
        )
    }

    /// Bounds covering a rectangle of cells (may start off screen)
    pub fn cells_to_bounds(&self, col: i32, row: i32, cols: i32, rows: i32) -> Bounds {
        Bounds::new(
            col as f32 * self.cell_width_px,
            row as f32 * self.cell_height_px,
            cols as f32 * self.cell_width_px,
            rows as f32 * self.cell_height_px,
        )
    }

    pub fn width_px(&self, cols: u16) -> f32 {
        cols as f32 * self.cell_width_px
    }
}
