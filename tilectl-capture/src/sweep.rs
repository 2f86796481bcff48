//! Drives a planned sweep against a viewport.
//!
//! Capture and pan run strictly one after the other: the viewport is a
//! single shared thing and there is nothing to gain from overlapping them.
//! A sweep stops at the first failure. Tiles handed to the sink before that
//! point stay there, and the sweep can be continued with
//! [`SweepOptions::resume_from`] set to the number of tiles already captured.

use crate::capture::{Clock, Panner, TileSource};
use crate::error::Result;
use std::time::Duration;
use tilectl::{Approach, Plan, Tile};
use tracing::{debug, info};

/// Receives tiles as they are captured.
pub trait TileSink {
    /// `index` is the tile's row-major position in the plan.
    fn accept(&mut self, index: usize, tile: Tile) -> Result<()>;
}

impl TileSink for Vec<Tile> {
    fn accept(&mut self, _index: usize, tile: Tile) -> Result<()> {
        self.push(tile);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SweepOptions {
    /// Pause after every pan and every capture so the application can redraw.
    pub settle: Duration,
    /// Plan entries to skip because they were captured by an earlier run.
    pub resume_from: usize,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(800),
            resume_from: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SweepSummary {
    /// Plan index of the first tile captured by this run.
    pub first_index: usize,
    pub captured: usize,
    pub pans_applied: usize,
}

/// Walk `plan`, panning and capturing each tile in turn.
pub fn run_sweep(
    plan: &Plan,
    source: &mut dyn TileSource,
    panner: &mut dyn Panner,
    clock: &dyn Clock,
    sink: &mut dyn TileSink,
    options: &SweepOptions,
) -> Result<SweepSummary> {
    let total = plan.len();
    let mut summary = SweepSummary {
        first_index: options.resume_from.min(total),
        captured: 0,
        pans_applied: 0,
    };

    if summary.first_index > 0 {
        info!(
            resume_from = summary.first_index,
            total, "resuming sweep"
        );
    }

    for entry in plan.resume_from(options.resume_from) {
        let moves = match entry.approach {
            Approach::Start => Vec::new(),
            Approach::Advance(step) => vec![(step, false)],
            Approach::NewRow { rewind, descend } => vec![(rewind, true), (descend, false)],
        };
        for (step, is_rewind) in moves {
            debug!(dx = step.dx, dy = step.dy, rewind = is_rewind, "pan");
            if is_rewind {
                panner.rewind(step)?;
            } else {
                panner.pan(step)?;
            }
            summary.pans_applied += 1;
            clock.sleep(options.settle);
        }

        let image = source.capture()?;
        info!(
            col = entry.coordinate.col,
            row = entry.coordinate.row,
            "captured tile {}/{}",
            entry.index + 1,
            total
        );
        sink.accept(entry.index, Tile::new(entry.coordinate, image))?;
        summary.captured += 1;
        clock.sleep(options.settle);
    }

    Ok(summary)
}
