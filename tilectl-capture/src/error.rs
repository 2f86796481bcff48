//! Error types for tilectl-capture.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Pan failed: {0}")]
    PanFailed(String),

    #[error("No PNG/JPG images found in {}", .0.display())]
    NoImages(PathBuf),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Grid(#[from] tilectl::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
