//! tilectl-capture: Driving a tiled capture of an oversized canvas
//!
//! This crate connects the pure planner and compositor in `tilectl` to the
//! outside world:
//! - Collaborator traits for grabbing and panning a viewport
//! - Drag-gesture panning with a configurable sign mapping
//! - A virtual canvas for dry runs and tests
//! - The sweep loop, with explicit resumption
//! - Tile folders on disk and TOML configuration

pub mod canvas;
pub mod capture;
pub mod config;
pub mod drag;
pub mod error;
pub mod interpolation;
pub mod store;
pub mod sweep;

// Re-export common types at crate root
pub use canvas::{Region, VirtualCanvas};
pub use capture::{Clock, Panner, SystemClock, TileSource};
pub use config::Config;
pub use drag::{DragPanner, DragSettings, MouseButton, PanMapping, PointerDevice};
pub use error::{Error, Result};
pub use interpolation::Curve;
pub use store::{save_composite, TileStore};
pub use sweep::{run_sweep, SweepOptions, SweepSummary, TileSink};
