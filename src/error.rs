//! Error types for tilectl.

use crate::grid::{Axis, TileCoordinate};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid grid spec: {0}")]
    InvalidGridSpec(GridSpecDefect),

    #[error("incomplete tile set: {0}")]
    IncompleteTileSet(TileSetDefect),

    #[error(
        "tile {coordinate} is {}x{}, expected {}x{}",
        .found.0, .found.1, .expected.0, .expected.1
    )]
    InconsistentTileSize {
        coordinate: TileCoordinate,
        expected: (u32, u32),
        found: (u32, u32),
    },

    #[error("{axis} overlap {overlap} leaves no new pixels in a {tile_extent} pixel tile")]
    DegenerateOverlap {
        axis: Axis,
        overlap: u32,
        tile_extent: u32,
    },

    #[error("composite canvas would exceed {width}x{height}")]
    CanvasTooLarge { width: u64, height: u64 },
}

impl Error {
    /// True when the caller should fix its grid configuration rather than
    /// its set of captured tiles.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidGridSpec(_) | Error::DegenerateOverlap { .. } | Error::CanvasTooLarge { .. }
        )
    }
}

/// Reason a [`GridSpec`](crate::GridSpec) cannot be planned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridSpecDefect {
    #[error("grid must have at least one column and one row (got {cols}x{rows})")]
    EmptyGrid { cols: u32, rows: u32 },

    #[error("{axis} overlap {overlap} must be smaller than pan {pan}")]
    NoForwardProgress { axis: Axis, pan: u32, overlap: u32 },

    #[error("{axis} pan distance {distance} does not fit in a pan step")]
    PanOutOfRange { axis: Axis, distance: i64 },
}

/// Reason a tile set does not exactly cover its grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TileSetDefect {
    #[error("expected {expected} tiles, received {received}")]
    Count { expected: usize, received: usize },

    #[error("tile {0} lies outside the grid")]
    OutOfGrid(TileCoordinate),

    #[error("tile {0} appears more than once")]
    Duplicate(TileCoordinate),
}

pub type Result<T> = std::result::Result<T, Error>;
