//! tilectl: capture planning and compositing for canvases larger than the screen
//!
//! This crate holds the pure core of a tiled capture:
//! - [`plan`] computes the raster-scan sweep and the viewport pans between tiles
//! - [`stitch`] assembles the captured tiles into one image, removing declared overlap
//!
//! Neither touches the screen, the input devices or the file system. Capture,
//! panning and persistence live in `tilectl-capture`.

pub mod compositor;
pub mod error;
pub mod grid;
pub mod planner;

pub use compositor::{stitch, stitch_row_major, CompositeImage, TileLayout};
pub use error::{Error, GridSpecDefect, Result, TileSetDefect};
pub use grid::{Axis, GridSpec, PanStep, Tile, TileCoordinate};
pub use planner::{plan, Approach, Plan, PlanEntry, PlanIter};
