//! Tile types and the tile filename convention.
//!
//! A tile is one decoded image plus its position in the grid. Positions come
//! from the filename: `cell_0_3.pbm` is column 0, row 3.

mod filename;

pub use filename::{parse_tile_filename, tile_filename, FilenameError, NameFilter, TileName};

use std::fmt;
use std::path::{Path, PathBuf};

use image::DynamicImage;

/// Grid position of a tile.
///
/// Column selects the horizontal position, row the vertical position.
/// Ordering is by column, then row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileCoord {
    pub column: u32,
    pub row: u32,
}

impl TileCoord {
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(col {}, row {})", self.column, self.row)
    }
}

/// A decoded tile image at a grid position.
#[derive(Debug, Clone)]
pub struct Tile {
    coord: TileCoord,
    source: PathBuf,
    image: DynamicImage,
}

impl Tile {
    /// Creates a tile from an already decoded image.
    pub fn new(coord: TileCoord, source: impl Into<PathBuf>, image: DynamicImage) -> Self {
        Self {
            coord,
            source: source.into(),
            image,
        }
    }

    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Path the tile was decoded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
