//! Tile indexing: from directory entries to a column-keyed grid.
//!
//! - [`DirectoryListing`] - lists entry names (filesystem or fixed set)
//! - [`TileIndexBuilder`] - filters, parses, decodes and groups tiles
//! - [`TileGrid`] - tiles by column, rows ascending

mod builder;
mod grid;
mod listing;

pub use builder::TileIndexBuilder;
pub use grid::TileGrid;
pub use listing::{DirectoryListing, FsDirectoryListing};
