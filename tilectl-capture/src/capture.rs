//! Collaborator seams for a sweep.
//!
//! A sweep only needs two things from the outside world: something that can
//! grab the current viewport, and something that can move it. Real backends
//! (screen grabbers, synthetic mouse drags) and test doubles both plug in here.

use crate::error::Result;
use image::DynamicImage;
use std::thread;
use std::time::Duration;
use tilectl::PanStep;

/// Produces an image of the current viewport.
pub trait TileSource {
    fn capture(&mut self) -> Result<DynamicImage>;
}

/// Shifts the viewport. Best effort: nothing checks the pan really happened.
pub trait Panner {
    fn pan(&mut self, step: PanStep) -> Result<()>;

    /// The long pan back to column 0 before a new row.
    fn rewind(&mut self, step: PanStep) -> Result<()> {
        self.pan(step)
    }
}

pub trait Clock {
    fn sleep(&self, duration: Duration);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Wall-clock [`Clock`] backed by `thread::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}
