//! Column-keyed tile grid.

use std::collections::BTreeMap;

use crate::error::{StitchError, StitchResult};
use crate::tile::{Tile, TileCoord};

/// Tiles grouped by column, each column sorted by row.
///
/// Rows within a column are unique and kept in ascending order on every
/// insert. Whether all columns have the same rows and compatible sizes is not
/// checked here; see [`GridLayout::measure`](crate::assembly::GridLayout::measure).
#[derive(Debug, Clone, Default)]
pub struct TileGrid {
    columns: BTreeMap<u32, Vec<Tile>>,
}

impl TileGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from tiles in any order.
    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>) -> StitchResult<Self> {
        let mut grid = Self::new();
        for tile in tiles {
            grid.insert(tile)?;
        }
        Ok(grid)
    }

    /// Insert a tile at its coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::DuplicateTile`] if the cell is already occupied.
    /// The grid is left unchanged in that case.
    pub fn insert(&mut self, tile: Tile) -> StitchResult<()> {
        let coord = tile.coord();
        let column = self.columns.entry(coord.column).or_default();

        match column.binary_search_by_key(&coord.row, |t| t.coord().row) {
            Ok(existing) => Err(StitchError::DuplicateTile {
                coord,
                first: column[existing].source().to_path_buf(),
                second: tile.source().to_path_buf(),
            }),
            Err(pos) => {
                column.insert(pos, tile);
                Ok(())
            }
        }
    }

    /// Total number of tiles.
    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.values().all(Vec::is_empty)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Columns in ascending order, each with its row-sorted tiles.
    pub fn columns(&self) -> impl Iterator<Item = (u32, &[Tile])> + '_ {
        self.columns.iter().map(|(col, tiles)| (*col, tiles.as_slice()))
    }

    pub fn column(&self, column: u32) -> Option<&[Tile]> {
        self.columns.get(&column).map(Vec::as_slice)
    }

    pub fn get(&self, coord: TileCoord) -> Option<&Tile> {
        let column = self.columns.get(&coord.column)?;
        column
            .binary_search_by_key(&coord.row, |t| t.coord().row)
            .ok()
            .map(|i| &column[i])
    }

    /// All tiles in column-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.columns.values().flatten()
    }

    /// All coordinates in column-major order.
    pub fn coords(&self) -> Vec<TileCoord> {
        self.tiles().map(Tile::coord).collect()
    }

    /// Consume the grid, yielding tiles in column-major order.
    pub fn into_tiles(self) -> impl Iterator<Item = Tile> {
        self.columns.into_values().flatten()
    }
}
