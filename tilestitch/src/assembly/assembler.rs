//! Grid assembler - concatenates a tile grid into one image.
//!
//! Column index picks the horizontal position and row index the vertical
//! position, both ascending. Each column's tiles are stacked top to bottom
//! and the resulting strips are laid out left to right:
//!
//! ```text
//!          col 0      col 1
//!        ┌────────┬────────────┐
//! row 0  │ (0, 0) │   (1, 0)   │
//!        ├────────┼────────────┤
//! row 1  │ (0, 1) │   (1, 1)   │
//!        └────────┴────────────┘
//! ```
//!
//! The canvas is allocated once at full size in the tiles' own pixel format
//! and each tile is copied to its offset, so 16-bit and float images stay
//! lossless.

use image::{ColorType, DynamicImage, GenericImage, ImageBuffer};
use tracing::{debug, instrument};

use super::{DimensionMismatch, GridLayout};
use crate::error::StitchResult;
use crate::index::TileGrid;
use crate::tile::TileCoord;

/// Assembled composite and the layout it was built from.
#[derive(Debug, Clone)]
pub struct Composite {
    image: DynamicImage,
    layout: GridLayout,
}

impl Composite {
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Concatenates a validated [`TileGrid`] into one image.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridAssembler;

impl GridAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Assemble `grid` into a single image.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::DimensionMismatch`](crate::error::StitchError::DimensionMismatch)
    /// if the grid is empty, not rectangular, or its tiles do not line up.
    /// Nothing is cropped or padded.
    #[instrument(skip_all, fields(tiles = grid.len()))]
    pub fn assemble(&self, grid: TileGrid) -> StitchResult<Composite> {
        let layout = GridLayout::measure(&grid)?;
        let mut canvas = blank_canvas(layout.color(), layout.width(), layout.height())?;

        for tile in grid.into_tiles() {
            let coord = tile.coord();
            let (x, y) = layout
                .offset_of(coord)
                .ok_or(DimensionMismatch::OutOfBounds { coord })?;
            place(&mut canvas, tile.image(), coord, x, y)?;
        }

        debug!(
            columns = layout.column_count(),
            rows = layout.row_count(),
            width = layout.width(),
            height = layout.height(),
            "Assembled composite"
        );

        Ok(Composite {
            image: canvas,
            layout,
        })
    }
}

fn blank_canvas(color: ColorType, width: u32, height: u32) -> Result<DynamicImage, DimensionMismatch> {
    let canvas = match color {
        ColorType::L8 => DynamicImage::ImageLuma8(ImageBuffer::new(width, height)),
        ColorType::La8 => DynamicImage::ImageLumaA8(ImageBuffer::new(width, height)),
        ColorType::Rgb8 => DynamicImage::ImageRgb8(ImageBuffer::new(width, height)),
        ColorType::Rgba8 => DynamicImage::ImageRgba8(ImageBuffer::new(width, height)),
        ColorType::L16 => DynamicImage::ImageLuma16(ImageBuffer::new(width, height)),
        ColorType::La16 => DynamicImage::ImageLumaA16(ImageBuffer::new(width, height)),
        ColorType::Rgb16 => DynamicImage::ImageRgb16(ImageBuffer::new(width, height)),
        ColorType::Rgba16 => DynamicImage::ImageRgba16(ImageBuffer::new(width, height)),
        ColorType::Rgb32F => DynamicImage::ImageRgb32F(ImageBuffer::new(width, height)),
        ColorType::Rgba32F => DynamicImage::ImageRgba32F(ImageBuffer::new(width, height)),
        other => return Err(DimensionMismatch::UnsupportedPixelFormat(other)),
    };
    Ok(canvas)
}

macro_rules! copy_same_variant {
    ($canvas:expr, $tile:expr, $x:expr, $y:expr, [$($variant:ident),+ $(,)?]) => {
        match ($canvas, $tile) {
            $(
                (DynamicImage::$variant(dst), DynamicImage::$variant(src)) => {
                    Some(dst.copy_from(src, $x, $y).is_ok())
                }
            )+
            _ => None,
        }
    };
}

/// Copy `tile` into `canvas` with its top-left corner at `(x, y)`.
fn place(
    canvas: &mut DynamicImage,
    tile: &DynamicImage,
    coord: TileCoord,
    x: u32,
    y: u32,
) -> Result<(), DimensionMismatch> {
    let expected = canvas.color();
    let copied = copy_same_variant!(
        &mut *canvas,
        tile,
        x,
        y,
        [
            ImageLuma8,
            ImageLumaA8,
            ImageRgb8,
            ImageRgba8,
            ImageLuma16,
            ImageLumaA16,
            ImageRgb16,
            ImageRgba16,
            ImageRgb32F,
            ImageRgba32F,
        ]
    );

    match copied {
        Some(true) => Ok(()),
        Some(false) => Err(DimensionMismatch::OutOfBounds { coord }),
        None => Err(DimensionMismatch::PixelFormat {
            coord,
            expected,
            found: tile.color(),
        }),
    }
}
