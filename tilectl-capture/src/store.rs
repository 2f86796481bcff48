//! Tiles on disk.
//!
//! A capture folder holds one image per tile, named `tile_01.png`,
//! `tile_02.png`, ... in row-major order. Loading accepts any PNG/JPEG files
//! and orders them by file name, comparing embedded numbers numerically so
//! `tile_100.png` sorts after `tile_99.png`.

use crate::error::{Error, Result};
use crate::sweep::TileSink;
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};
use tilectl::{CompositeImage, GridSpec, Tile};
use tracing::debug;

const TILE_PREFIX: &str = "tile_";
const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Clone, Debug)]
pub struct TileStore {
    dir: PathBuf,
}

impl TileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for the tile at row-major `index`.
    pub fn tile_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}{:02}.png", TILE_PREFIX, index + 1))
    }

    pub fn save(&self, index: usize, image: &DynamicImage) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.tile_path(index);
        image.save(&path)?;
        debug!(path = %path.display(), "saved tile");
        Ok(path)
    }

    /// Image files in the folder, in tile order. A missing folder is empty.
    pub fn image_paths(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && is_image(&path) {
                paths.push(path);
            }
        }
        paths.sort_by_cached_key(|p| sort_key(p));
        Ok(paths)
    }

    /// Paths of the unbroken run `tile_01.png`, `tile_02.png`, ... this store
    /// wrote. Other images in the folder are not part of a sweep.
    pub fn captured_paths(&self) -> Vec<PathBuf> {
        (0..)
            .map(|index| self.tile_path(index))
            .take_while(|path| path.is_file())
            .collect()
    }

    /// Tiles already captured, i.e. where an interrupted sweep resumes.
    pub fn captured_count(&self) -> usize {
        self.captured_paths().len()
    }

    /// Every image in the folder, in tile order.
    pub fn load_images(&self) -> Result<Vec<DynamicImage>> {
        self.open_all(self.image_paths()?)
    }

    /// Only the tiles a sweep wrote, in capture order.
    pub fn load_captured_images(&self) -> Result<Vec<DynamicImage>> {
        self.open_all(self.captured_paths())
    }

    /// Load every image and assign row-major coordinates for `spec`.
    pub fn load(&self, spec: &GridSpec) -> Result<Vec<Tile>> {
        Ok(Tile::row_major(self.load_images()?, spec))
    }

    fn open_all(&self, paths: Vec<PathBuf>) -> Result<Vec<DynamicImage>> {
        if paths.is_empty() {
            return Err(Error::NoImages(self.dir.clone()));
        }
        let images = paths
            .iter()
            .map(image::open)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(count = images.len(), dir = %self.dir.display(), "loaded tiles");
        Ok(images)
    }

    /// Delete the tiles this store wrote. Other images are left alone.
    pub fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for path in self.image_paths()? {
            let ours = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(TILE_PREFIX));
            if ours {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl TileSink for TileStore {
    fn accept(&mut self, index: usize, tile: Tile) -> Result<()> {
        self.save(index, &tile.image).map(|_| ())
    }
}

/// Write the stitched image; the format follows the file extension.
pub fn save_composite(path: &Path, composite: &CompositeImage) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    composite.save(path)?;
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

/// Natural-order key: text with the first run of digits compared as a number.
fn sort_key(path: &Path) -> (String, u64, String) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let start = name.find(|c: char| c.is_ascii_digit());
    match start {
        Some(start) => {
            let digits: String = name[start..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            let number = digits.parse().unwrap_or(u64::MAX);
            (name[..start].to_string(), number, name)
        }
        None => (name.clone(), 0, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_paths_are_one_based() {
        let store = TileStore::new("/tmp/tiles");
        assert_eq!(store.tile_path(0), PathBuf::from("/tmp/tiles/tile_01.png"));
        assert_eq!(store.tile_path(99), PathBuf::from("/tmp/tiles/tile_100.png"));
    }

    #[test]
    fn numbers_sort_numerically() {
        let mut names = vec!["tile_100.png", "tile_9.png", "tile_10.png", "tile_09.jpg"];
        names.sort_by_cached_key(|n| sort_key(Path::new(n)));
        assert_eq!(names, vec!["tile_09.jpg", "tile_9.png", "tile_10.png", "tile_100.png"]);
    }

    #[test]
    fn missing_folder_has_nothing_captured() {
        let store = TileStore::new("/nonexistent/tilectl/tiles");
        assert_eq!(store.captured_count(), 0);
        assert!(store.captured_paths().is_empty());
    }

    #[test]
    fn extension_filter_ignores_case() {
        assert!(is_image(Path::new("a.PNG")));
        assert!(is_image(Path::new("b.jpeg")));
        assert!(!is_image(Path::new("notes.txt")));
        assert!(!is_image(Path::new("tile_01")));
    }
}
