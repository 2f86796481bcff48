//! Overlap-aware tile compositing.
//!
//! Tiles are placed purely by grid position: tile `(col, row)` lands at
//! `(col * step_x, row * step_y)` where each step is the tile extent minus
//! the declared overlap. Tiles are pasted in raster-scan order, so inside an
//! overlap band the later tile wins. No pixel content is ever compared.

use crate::error::{Error, GridSpecDefect, Result, TileSetDefect};
use crate::grid::{Axis, GridSpec, Tile, TileCoordinate};
use image::{imageops, RgbImage};
use tracing::debug;

/// The stitched output. Always 8-bit RGB with no alpha.
pub type CompositeImage = RgbImage;

/// Validated geometry of a composite, computed before any pixel is touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileLayout {
    pub tile_width: u32,
    pub tile_height: u32,
    pub step_x: u32,
    pub step_y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileLayout {
    /// Check `tiles` against `spec` and derive the canvas geometry.
    pub fn measure(tiles: &[Tile], spec: &GridSpec) -> Result<Self> {
        check_coverage(tiles, spec)?;

        // Non-empty grid, so at least one tile.
        let (tile_width, tile_height) = tiles[0].dimensions();
        for tile in tiles {
            let found = tile.dimensions();
            if found != (tile_width, tile_height) {
                return Err(Error::InconsistentTileSize {
                    coordinate: tile.coordinate,
                    expected: (tile_width, tile_height),
                    found,
                });
            }
        }

        Self::new(spec, tile_width, tile_height)
    }

    /// Canvas geometry for `spec` with tiles of the given size.
    pub fn new(spec: &GridSpec, tile_width: u32, tile_height: u32) -> Result<Self> {
        let step_x = step(Axis::X, tile_width, spec.overlap_x)?;
        let step_y = step(Axis::Y, tile_height, spec.overlap_y)?;

        let width = u64::from(spec.cols) * u64::from(step_x);
        let height = u64::from(spec.rows) * u64::from(step_y);
        let (Ok(width), Ok(height)) = (u32::try_from(width), u32::try_from(height)) else {
            return Err(Error::CanvasTooLarge { width, height });
        };

        Ok(Self {
            tile_width,
            tile_height,
            step_x,
            step_y,
            width,
            height,
        })
    }

    /// Top-left canvas pixel of the tile at `coordinate`.
    pub fn origin(&self, coordinate: TileCoordinate) -> (u32, u32) {
        (coordinate.col * self.step_x, coordinate.row * self.step_y)
    }
}

fn step(axis: Axis, tile_extent: u32, overlap: u32) -> Result<u32> {
    if overlap >= tile_extent {
        return Err(Error::DegenerateOverlap {
            axis,
            overlap,
            tile_extent,
        });
    }
    Ok(tile_extent - overlap)
}

/// Verify `tiles` names every grid cell exactly once.
fn check_coverage(tiles: &[Tile], spec: &GridSpec) -> Result<()> {
    if spec.cols == 0 || spec.rows == 0 {
        return Err(Error::InvalidGridSpec(GridSpecDefect::EmptyGrid {
            cols: spec.cols,
            rows: spec.rows,
        }));
    }

    let expected = spec.tile_count();
    if tiles.len() != expected {
        return Err(Error::IncompleteTileSet(TileSetDefect::Count {
            expected,
            received: tiles.len(),
        }));
    }

    let mut seen = vec![false; expected];
    for tile in tiles {
        let index = spec
            .index_of(tile.coordinate)
            .ok_or(Error::IncompleteTileSet(TileSetDefect::OutOfGrid(tile.coordinate)))?;
        if std::mem::replace(&mut seen[index], true) {
            return Err(Error::IncompleteTileSet(TileSetDefect::Duplicate(
                tile.coordinate,
            )));
        }
    }
    // Right count, all in-grid, no repeats: every cell is covered.
    Ok(())
}

/// Assemble a complete tile set into one image.
///
/// Input tiles are only read. On error nothing is allocated for the canvas.
pub fn stitch(tiles: &[Tile], spec: &GridSpec) -> Result<CompositeImage> {
    let layout = TileLayout::measure(tiles, spec)?;
    debug!(
        tiles = tiles.len(),
        width = layout.width,
        height = layout.height,
        step_x = layout.step_x,
        step_y = layout.step_y,
        "stitching tiles"
    );

    let mut order: Vec<&Tile> = tiles.iter().collect();
    order.sort_by_key(|tile| tile.coordinate);

    let mut canvas = RgbImage::new(layout.width, layout.height);
    for tile in order {
        let (x, y) = layout.origin(tile.coordinate);
        let (x, y) = (i64::from(x), i64::from(y));
        match tile.image.as_rgb8() {
            Some(rgb) => imageops::replace(&mut canvas, rgb, x, y),
            None => imageops::replace(&mut canvas, &tile.image.to_rgb8(), x, y),
        }
    }
    Ok(canvas)
}

/// Stitch images supplied in row-major order.
pub fn stitch_row_major(
    images: Vec<image::DynamicImage>,
    spec: &GridSpec,
) -> Result<CompositeImage> {
    let tiles = Tile::row_major(images, spec);
    stitch(&tiles, spec)
}
