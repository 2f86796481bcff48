//! Grid data model shared by the planner and the compositor.
//!
//! A grid is addressed by [`TileCoordinate`]s in row-major order. Pan
//! distances are expressed in viewport-movement terms: a positive
//! [`PanStep::dx`] reveals content to the right, a positive
//! [`PanStep::dy`] reveals content below. Translating that intent into an
//! input gesture is the job of whoever performs the pan.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid shape, pan distance and declared overlap for one capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSpec {
    pub cols: u32,
    pub rows: u32,
    /// Viewport pan distance between neighbouring columns, before overlap.
    pub pan_x: u32,
    /// Viewport pan distance between neighbouring rows, before overlap.
    pub pan_y: u32,
    pub overlap_x: u32,
    pub overlap_y: u32,
}

impl GridSpec {
    /// A grid with no pan and no overlap. Enough for stitching, which only
    /// looks at the overlap; planning additionally needs [`with_pan`](Self::with_pan).
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cols,
            rows,
            pan_x: 0,
            pan_y: 0,
            overlap_x: 0,
            overlap_y: 0,
        }
    }

    pub fn with_pan(mut self, pan_x: u32, pan_y: u32) -> Self {
        self.pan_x = pan_x;
        self.pan_y = pan_y;
        self
    }

    pub fn with_overlap(mut self, overlap_x: u32, overlap_y: u32) -> Self {
        self.overlap_x = overlap_x;
        self.overlap_y = overlap_y;
        self
    }

    /// Number of tiles in a complete grid.
    pub fn tile_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    pub fn contains(&self, coordinate: TileCoordinate) -> bool {
        coordinate.col < self.cols && coordinate.row < self.rows
    }

    /// Coordinate of the `index`-th tile in row-major order.
    pub fn coordinate_at(&self, index: usize) -> Option<TileCoordinate> {
        if self.cols == 0 || index >= self.tile_count() {
            return None;
        }
        let cols = self.cols as usize;
        Some(TileCoordinate::new((index % cols) as u32, (index / cols) as u32))
    }

    /// Row-major index of `coordinate`, if it lies inside the grid.
    pub fn index_of(&self, coordinate: TileCoordinate) -> Option<usize> {
        if !self.contains(coordinate) {
            return None;
        }
        Some(coordinate.row as usize * self.cols as usize + coordinate.col as usize)
    }

    /// Every coordinate of the grid in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = TileCoordinate> + '_ {
        (0..self.tile_count()).filter_map(move |i| self.coordinate_at(i))
    }
}

/// Horizontal or vertical grid axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("horizontal"),
            Axis::Y => f.write_str("vertical"),
        }
    }
}

/// Grid cell address. Orders row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoordinate {
    // Field order matters for the derived Ord.
    pub row: u32,
    pub col: u32,
}

impl TileCoordinate {
    pub fn new(col: u32, row: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// A single relative viewport displacement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PanStep {
    pub dx: i32,
    pub dy: i32,
}

impl PanStep {
    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// One captured viewport image and the grid cell it belongs to.
#[derive(Clone, Debug)]
pub struct Tile {
    pub coordinate: TileCoordinate,
    pub image: DynamicImage,
}

impl Tile {
    pub fn new(coordinate: TileCoordinate, image: DynamicImage) -> Self {
        Self { coordinate, image }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Pair an ordered list of images with row-major coordinates of `spec`.
    ///
    /// Images beyond the grid are kept with out-of-grid coordinates so the
    /// compositor can report them rather than silently dropping captures.
    pub fn row_major(images: Vec<DynamicImage>, spec: &GridSpec) -> Vec<Tile> {
        let cols = spec.cols.max(1) as usize;
        images
            .into_iter()
            .enumerate()
            .map(|(i, image)| {
                let coordinate = TileCoordinate::new((i % cols) as u32, (i / cols) as u32);
                Tile::new(coordinate, image)
            })
            .collect()
    }
}
