//! Grid layout measurement and splitting.
//!
//! A [`GridLayout`] is the validated shape of a [`TileGrid`]: the pixel width
//! of every column, the pixel height of every row, and the shared pixel
//! format. Measuring a grid is where all rectangularity checks happen.

use std::path::PathBuf;

use image::{ColorType, DynamicImage};
use thiserror::Error;

use crate::error::StitchResult;
use crate::index::TileGrid;
use crate::tile::{Tile, TileCoord};

/// Reasons a set of tiles cannot form one rectangular image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimensionMismatch {
    /// There are no tiles at all.
    #[error("dimension mismatch: tile grid is empty")]
    EmptyGrid,

    /// A column has a different number of tiles than the first column.
    #[error(
        "dimension mismatch: column {column} has {found} tiles, column {reference} has {expected}"
    )]
    RowCount {
        column: u32,
        reference: u32,
        expected: usize,
        found: usize,
    },

    /// A column has the same number of tiles but at different rows.
    #[error(
        "dimension mismatch: column {column} has rows {found:?}, column {reference} has rows {expected:?}"
    )]
    RowIndices {
        column: u32,
        reference: u32,
        expected: Vec<u32>,
        found: Vec<u32>,
    },

    /// A tile is not as tall as the rest of its row.
    #[error("dimension mismatch: tile {coord} is {found}px tall, row {} is {expected}px", .coord.row)]
    Height {
        coord: TileCoord,
        expected: u32,
        found: u32,
    },

    /// A tile is not as wide as the rest of its column.
    #[error("dimension mismatch: tile {coord} is {found}px wide, column {} is {expected}px", .coord.column)]
    Width {
        coord: TileCoord,
        expected: u32,
        found: u32,
    },

    /// A tile uses a different channel layout or bit depth.
    #[error("dimension mismatch: tile {coord} has pixel format {found:?}, expected {expected:?}")]
    PixelFormat {
        coord: TileCoord,
        expected: ColorType,
        found: ColorType,
    },

    /// The pixel format has no canvas representation.
    #[error("unsupported pixel format {0:?}")]
    UnsupportedPixelFormat(ColorType),

    /// The composite would exceed `u32` pixels along one axis.
    #[error("dimension mismatch: composite {axis} exceeds u32::MAX pixels")]
    Overflow { axis: &'static str },

    /// A tile does not fit inside the canvas at its offset.
    #[error("dimension mismatch: tile {coord} does not fit the composite")]
    OutOfBounds { coord: TileCoord },

    /// An image handed to the splitter does not match the layout size.
    #[error("dimension mismatch: image is {found_width}x{found_height}, layout is {expected_width}x{expected_height}")]
    ImageSize {
        expected_width: u32,
        expected_height: u32,
        found_width: u32,
        found_height: u32,
    },
}

/// One column or row of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Column or row index from the tile filenames.
    pub index: u32,
    /// Pixel offset from the left (columns) or top (rows) edge.
    pub offset: u32,
    /// Pixel width (columns) or height (rows).
    pub size: u32,
}

/// Validated shape of a tile grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    columns: Vec<Span>,
    rows: Vec<Span>,
    color: ColorType,
}

impl GridLayout {
    /// Measure a grid, checking that it forms a complete rectangle.
    ///
    /// The first column is the reference: every other column must have the
    /// same row indices, every tile in a row must match the reference height,
    /// and every tile in a column must match that column's first tile width.
    pub fn measure(grid: &TileGrid) -> Result<Self, DimensionMismatch> {
        let (reference, reference_tiles) = grid
            .columns()
            .next()
            .filter(|(_, tiles)| !tiles.is_empty())
            .ok_or(DimensionMismatch::EmptyGrid)?;

        let color = reference_tiles[0].image().color();
        let row_indices: Vec<u32> = reference_tiles.iter().map(|t| t.coord().row).collect();
        let row_heights: Vec<u32> = reference_tiles.iter().map(Tile::height).collect();

        let mut column_widths = Vec::with_capacity(grid.column_count());
        for (column, tiles) in grid.columns() {
            if tiles.len() != row_indices.len() {
                return Err(DimensionMismatch::RowCount {
                    column,
                    reference,
                    expected: row_indices.len(),
                    found: tiles.len(),
                });
            }
            if tiles
                .iter()
                .zip(&row_indices)
                .any(|(tile, row)| tile.coord().row != *row)
            {
                return Err(DimensionMismatch::RowIndices {
                    column,
                    reference,
                    expected: row_indices.clone(),
                    found: tiles.iter().map(|t| t.coord().row).collect(),
                });
            }

            let width = tiles[0].width();
            for (tile, &height) in tiles.iter().zip(&row_heights) {
                check_tile(tile, width, height, color)?;
            }
            column_widths.push((column, width));
        }

        let columns = spans(column_widths, "width")?;
        let rows = spans(row_indices.into_iter().zip(row_heights), "height")?;

        Ok(Self {
            columns,
            rows,
            color,
        })
    }

    /// Columns left to right.
    pub fn columns(&self) -> &[Span] {
        &self.columns
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> &[Span] {
        &self.rows
    }

    pub fn color(&self) -> ColorType {
        self.color
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Composite width: the sum of all column widths.
    pub fn width(&self) -> u32 {
        self.columns.last().map_or(0, |s| s.offset + s.size)
    }

    /// Composite height: the sum of all row heights.
    pub fn height(&self) -> u32 {
        self.rows.last().map_or(0, |s| s.offset + s.size)
    }

    /// Top-left pixel of a cell, if the coordinate is in the layout.
    pub fn offset_of(&self, coord: TileCoord) -> Option<(u32, u32)> {
        let x = find_span(&self.columns, coord.column)?.offset;
        let y = find_span(&self.rows, coord.row)?.offset;
        Some((x, y))
    }

    /// Cut `image` back into tiles along this layout's grid lines.
    ///
    /// `source` names the path recorded on each produced tile.
    pub fn split<F>(&self, image: &DynamicImage, source: F) -> StitchResult<TileGrid>
    where
        F: Fn(TileCoord) -> PathBuf,
    {
        if image.width() != self.width() || image.height() != self.height() {
            return Err(DimensionMismatch::ImageSize {
                expected_width: self.width(),
                expected_height: self.height(),
                found_width: image.width(),
                found_height: image.height(),
            }
            .into());
        }

        let mut grid = TileGrid::new();
        for column in &self.columns {
            for row in &self.rows {
                let coord = TileCoord::new(column.index, row.index);
                let piece = image.crop_imm(column.offset, row.offset, column.size, row.size);
                grid.insert(Tile::new(coord, source(coord), piece))?;
            }
        }
        Ok(grid)
    }
}

fn check_tile(
    tile: &Tile,
    width: u32,
    height: u32,
    color: ColorType,
) -> Result<(), DimensionMismatch> {
    let coord = tile.coord();
    if tile.height() != height {
        return Err(DimensionMismatch::Height {
            coord,
            expected: height,
            found: tile.height(),
        });
    }
    if tile.width() != width {
        return Err(DimensionMismatch::Width {
            coord,
            expected: width,
            found: tile.width(),
        });
    }
    let found = tile.image().color();
    if found != color {
        return Err(DimensionMismatch::PixelFormat {
            coord,
            expected: color,
            found,
        });
    }
    Ok(())
}

fn spans(
    sizes: impl IntoIterator<Item = (u32, u32)>,
    axis: &'static str,
) -> Result<Vec<Span>, DimensionMismatch> {
    let mut offset = 0u32;
    let mut spans = Vec::new();
    for (index, size) in sizes {
        spans.push(Span {
            index,
            offset,
            size,
        });
        offset = offset
            .checked_add(size)
            .ok_or(DimensionMismatch::Overflow { axis })?;
    }
    Ok(spans)
}

fn find_span(spans: &[Span], index: u32) -> Option<&Span> {
    spans
        .binary_search_by_key(&index, |s| s.index)
        .ok()
        .map(|i| &spans[i])
}
