//! Stitch pipeline: index -> assemble -> encode.
//!
//! ```text
//! DirectoryListing ─► TileIndexBuilder ─► TileGrid ─► GridAssembler ─► Composite
//!                          │                                             │
//!                          └─────────── ImageCodec (decode / encode) ◄───┘
//! ```
//!
//! The listing and codec collaborators default to the local filesystem and
//! the `image` crate and can be replaced for testing.

use std::path::PathBuf;

use tracing::{info, instrument};

use crate::assembly::{Composite, GridAssembler};
use crate::codec::{ImageCodec, ImageFileCodec};
use crate::config::StitchConfig;
use crate::error::{StitchError, StitchResult};
use crate::index::{DirectoryListing, FsDirectoryListing, TileGrid, TileIndexBuilder};
use crate::tile::NameFilter;

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchReport {
    pub tiles: usize,
    pub columns: usize,
    pub rows: usize,
    pub width: u32,
    pub height: u32,
    pub output_path: PathBuf,
}

/// Runs one stitch according to a [`StitchConfig`].
pub struct Stitcher {
    config: StitchConfig,
    listing: Box<dyn DirectoryListing + Send + Sync>,
    codec: Box<dyn ImageCodec>,
}

impl Stitcher {
    /// Create a stitcher using the filesystem and the `image` crate.
    pub fn new(config: StitchConfig) -> Self {
        let codec = ImageFileCodec::new().with_pnm_encoding(config.pnm_encoding());
        Self {
            config,
            listing: Box::new(FsDirectoryListing),
            codec: Box::new(codec),
        }
    }

    /// Replace the directory listing collaborator.
    pub fn with_listing<L>(mut self, listing: L) -> Self
    where
        L: DirectoryListing + Send + Sync + 'static,
    {
        self.listing = Box::new(listing);
        self
    }

    /// Replace the image codec collaborator.
    pub fn with_codec<C>(mut self, codec: C) -> Self
    where
        C: ImageCodec + 'static,
    {
        self.codec = Box::new(codec);
        self
    }

    fn index_builder(&self) -> StitchResult<TileIndexBuilder> {
        let filter = NameFilter::new(self.config.prefix(), self.config.extension())?;
        let mut builder =
            TileIndexBuilder::new(filter).with_parallel_decode(self.config.parallel_decode());
        if let Some(output_name) = self.config.output_name_in_input_dir() {
            builder = builder.exclude(output_name);
        }
        Ok(builder)
    }

    /// Index and decode the tiles without assembling them.
    pub fn index(&self) -> StitchResult<TileGrid> {
        self.index_builder()?.build(
            self.config.input_dir(),
            self.listing.as_ref(),
            self.codec.as_ref(),
        )
    }

    /// Index and assemble the tiles without writing anything.
    pub fn assemble(&self) -> StitchResult<Composite> {
        let grid = self.index()?;
        GridAssembler::new().assemble(grid)
    }

    /// Index, assemble and write the composite to the configured output.
    #[instrument(skip(self), fields(dir = %self.config.input_dir().display()))]
    pub fn run(&self) -> StitchResult<StitchReport> {
        let grid = self.index()?;
        let tiles = grid.len();

        let composite = GridAssembler::new().assemble(grid)?;
        let layout = composite.layout();
        info!(
            tiles,
            columns = layout.column_count(),
            rows = layout.row_count(),
            width = composite.width(),
            height = composite.height(),
            "Assembled composite"
        );

        let output_path = self.config.output_path().to_path_buf();
        self.codec
            .encode(composite.image(), &output_path)
            .map_err(|source| StitchError::Encode {
                path: output_path.clone(),
                source,
            })?;
        info!(path = %output_path.display(), "Wrote composite");

        Ok(StitchReport {
            tiles,
            columns: layout.column_count(),
            rows: layout.row_count(),
            width: composite.width(),
            height: composite.height(),
            output_path,
        })
    }
}
