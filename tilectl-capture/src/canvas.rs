//! In-memory stand-in for an application viewport.
//!
//! [`VirtualCanvas`] holds one large image and a movable viewport over it. It
//! is both a [`TileSource`] and a [`Panner`], which makes it possible to run
//! a complete sweep without a screen: dry runs from the CLI, and end-to-end
//! tests that compare the stitched result with the source image.

use crate::capture::{Panner, TileSource};
use crate::error::{Error, Result};
use image::{imageops, DynamicImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use tilectl::PanStep;

/// A rectangular region in canvas pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Area outside the canvas, as an editor shows empty graph space.
const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Large image with a movable viewport.
///
/// The viewport lives in a [`Cell`] so one canvas can serve as source and
/// panner of the same sweep: both traits are implemented for `&VirtualCanvas`.
pub struct VirtualCanvas {
    image: RgbaImage,
    viewport: Cell<Region>,
    captures: Cell<usize>,
}

impl VirtualCanvas {
    /// Viewport of `width` x `height` at the canvas origin.
    pub fn new(image: DynamicImage, width: u32, height: u32) -> Self {
        Self::with_viewport(image, Region::new(0, 0, width, height))
    }

    pub fn with_viewport(image: DynamicImage, viewport: Region) -> Self {
        Self {
            image: image.into_rgba8(),
            viewport: Cell::new(viewport),
            captures: Cell::new(0),
        }
    }

    pub fn viewport(&self) -> Region {
        self.viewport.get()
    }

    pub fn canvas_dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Number of viewport captures taken so far.
    pub fn captures(&self) -> usize {
        self.captures.get()
    }

    /// Image of the current viewport.
    pub fn grab(&self) -> Result<DynamicImage> {
        let viewport = self.viewport.get();
        if viewport.width == 0 || viewport.height == 0 {
            return Err(Error::CaptureFailed(format!(
                "viewport {:?} is empty",
                viewport
            )));
        }
        let mut view = RgbaImage::from_pixel(viewport.width, viewport.height, BACKGROUND);
        // `replace` clips, so a viewport hanging off the canvas keeps the background.
        imageops::replace(
            &mut view,
            &self.image,
            -i64::from(viewport.x),
            -i64::from(viewport.y),
        );
        self.captures.set(self.captures.get() + 1);
        Ok(DynamicImage::ImageRgba8(view))
    }

    /// Move the viewport by `step`.
    pub fn shift(&self, step: PanStep) -> Result<()> {
        let mut viewport = self.viewport.get();
        let x = viewport.x.checked_add(step.dx);
        let y = viewport.y.checked_add(step.dy);
        let (Some(x), Some(y)) = (x, y) else {
            return Err(Error::PanFailed(format!(
                "pan {:?} moves viewport {:?} out of range",
                step, viewport
            )));
        };
        viewport.x = x;
        viewport.y = y;
        self.viewport.set(viewport);
        Ok(())
    }
}

impl TileSource for &VirtualCanvas {
    fn capture(&mut self) -> Result<DynamicImage> {
        self.grab()
    }
}

impl Panner for &VirtualCanvas {
    fn pan(&mut self, step: PanStep) -> Result<()> {
        self.shift(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        let mut img = RgbaImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgba([x as u8, y as u8, 128, 255]);
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn capture_crops_viewport() {
        let canvas = VirtualCanvas::with_viewport(gradient(64, 64), Region::new(10, 20, 8, 4));
        let tile = canvas.grab().expect("capture").into_rgba8();
        assert_eq!(tile.dimensions(), (8, 4));
        assert_eq!(*tile.get_pixel(0, 0), Rgba([10, 20, 128, 255]));
        assert_eq!(*tile.get_pixel(7, 3), Rgba([17, 23, 128, 255]));
        assert_eq!(canvas.captures(), 1);
    }

    #[test]
    fn pan_reveals_content_in_step_direction() {
        let canvas = VirtualCanvas::new(gradient(64, 64), 8, 8);
        canvas.shift(PanStep::new(5, 0)).expect("pan right");
        canvas.shift(PanStep::new(0, 3)).expect("pan down");
        assert_eq!(canvas.viewport(), Region::new(5, 3, 8, 8));

        let tile = canvas.grab().expect("capture").into_rgba8();
        assert_eq!(*tile.get_pixel(0, 0), Rgba([5, 3, 128, 255]));
    }

    #[test]
    fn off_canvas_area_is_background() {
        let canvas = VirtualCanvas::with_viewport(gradient(4, 4), Region::new(2, -1, 4, 4));
        let tile = canvas.grab().expect("capture").into_rgba8();
        assert_eq!(*tile.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*tile.get_pixel(0, 1), Rgba([2, 0, 128, 255]));
        assert_eq!(*tile.get_pixel(3, 1), BACKGROUND);
    }

    #[test]
    fn pan_overflow_is_an_error() {
        let canvas = VirtualCanvas::with_viewport(gradient(4, 4), Region::new(i32::MAX, 0, 1, 1));
        assert!(canvas.shift(PanStep::new(1, 0)).is_err());
        assert_eq!(canvas.viewport().x, i32::MAX);
    }

    #[test]
    fn empty_viewport_cannot_capture() {
        let canvas = VirtualCanvas::new(gradient(4, 4), 0, 4);
        assert!(matches!(canvas.grab(), Err(Error::CaptureFailed(_))));
    }
}
