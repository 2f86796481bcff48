//! Raster-scan traversal planning.
//!
//! [`plan`] turns a [`GridSpec`] into a [`Plan`]: the ordered list of tiles
//! to capture and the viewport pans that reach each of them. Rows are swept
//! left to right; the first tile of every later row is reached by rewinding
//! to column 0 and then descending, as two separate pans.
//!
//! Plans are plain values. Nothing here captures, pans or sleeps.

use crate::error::{Error, GridSpecDefect, Result};
use crate::grid::{Axis, GridSpec, PanStep, TileCoordinate};
use tracing::debug;

/// How the viewport gets from the previous tile to this one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Approach {
    /// First tile of the sweep, captured where the viewport already is.
    Start,
    /// Next column in the same row.
    Advance(PanStep),
    /// First column of a new row. `rewind` must be applied before `descend`.
    NewRow { rewind: PanStep, descend: PanStep },
}

impl Approach {
    /// Pan steps in the order they must be applied.
    pub fn steps(&self) -> Vec<PanStep> {
        match *self {
            Approach::Start => Vec::new(),
            Approach::Advance(step) => vec![step],
            Approach::NewRow { rewind, descend } => vec![rewind, descend],
        }
    }
}

/// One tile of the sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanEntry {
    /// Row-major position in the sweep.
    pub index: usize,
    pub coordinate: TileCoordinate,
    pub approach: Approach,
}

impl PlanEntry {
    pub fn pan_steps(&self) -> Vec<PanStep> {
        self.approach.steps()
    }
}

/// Validated traversal of a grid.
///
/// Entries are computed on demand, so a plan is cheap to hold and can be
/// re-derived at any time to resume an interrupted sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Plan {
    spec: GridSpec,
    advance: PanStep,
    rewind: PanStep,
    descend: PanStep,
}

/// Plan a full sweep of `spec`.
pub fn plan(spec: &GridSpec) -> Result<Plan> {
    if spec.cols == 0 || spec.rows == 0 {
        return Err(Error::InvalidGridSpec(GridSpecDefect::EmptyGrid {
            cols: spec.cols,
            rows: spec.rows,
        }));
    }

    let step_x = forward_distance(Axis::X, spec.pan_x, spec.overlap_x)?;
    let step_y = forward_distance(Axis::Y, spec.pan_y, spec.overlap_y)?;
    let rewind = -(i64::from(spec.cols) - 1) * i64::from(step_x);
    let rewind = i32::try_from(rewind).map_err(|_| {
        Error::InvalidGridSpec(GridSpecDefect::PanOutOfRange {
            axis: Axis::X,
            distance: rewind,
        })
    })?;

    debug!(
        cols = spec.cols,
        rows = spec.rows,
        step_x,
        step_y,
        "planned grid sweep"
    );

    Ok(Plan {
        spec: *spec,
        advance: PanStep::new(step_x, 0),
        rewind: PanStep::new(rewind, 0),
        descend: PanStep::new(0, step_y),
    })
}

fn forward_distance(axis: Axis, pan: u32, overlap: u32) -> Result<i32> {
    if overlap >= pan {
        return Err(Error::InvalidGridSpec(GridSpecDefect::NoForwardProgress {
            axis,
            pan,
            overlap,
        }));
    }
    let distance = i64::from(pan - overlap);
    i32::try_from(distance)
        .map_err(|_| Error::InvalidGridSpec(GridSpecDefect::PanOutOfRange { axis, distance }))
}

impl Plan {
    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn len(&self) -> usize {
        self.spec.tile_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `index`-th entry of the sweep.
    pub fn get(&self, index: usize) -> Option<PlanEntry> {
        let coordinate = self.spec.coordinate_at(index)?;
        let approach = if index == 0 {
            Approach::Start
        } else if coordinate.col == 0 {
            Approach::NewRow {
                rewind: self.rewind,
                descend: self.descend,
            }
        } else {
            Approach::Advance(self.advance)
        };
        Some(PlanEntry {
            index,
            coordinate,
            approach,
        })
    }

    pub fn iter(&self) -> PlanIter<'_> {
        self.resume_from(0)
    }

    /// Entries from `index` on, for continuing a sweep whose first `index`
    /// tiles were already captured. The viewport is assumed to still show
    /// tile `index - 1`.
    pub fn resume_from(&self, index: usize) -> PlanIter<'_> {
        PlanIter {
            plan: self,
            next: index.min(self.len()),
        }
    }

    /// Viewport offset from the start position once entry `index` has been
    /// reached, i.e. after all of its pan steps.
    pub fn viewport_offset(&self, index: usize) -> Option<(i64, i64)> {
        let coordinate = self.spec.coordinate_at(index)?;
        Some((
            i64::from(coordinate.col) * i64::from(self.advance.dx),
            i64::from(coordinate.row) * i64::from(self.descend.dy),
        ))
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = PlanEntry;
    type IntoIter = PlanIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over a [`Plan`].
#[derive(Clone, Debug)]
pub struct PlanIter<'a> {
    plan: &'a Plan,
    next: usize,
}

impl Iterator for PlanIter<'_> {
    type Item = PlanEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.plan.get(self.next)?;
        self.next += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.plan.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PlanIter<'_> {}
