//! Error types for tile stitching.
//!
//! Every failure aborts the run. [`StitchError::kind`] maps each variant onto
//! one of four coarse categories so callers can react without matching on
//! every variant.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::assembly::DimensionMismatch;
use crate::tile::{FilenameError, TileCoord};

/// Coarse error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A filename matched the filter but not the naming convention.
    Parse,
    /// Two files map to the same grid cell.
    DuplicateTile,
    /// Tiles cannot be concatenated into a rectangle.
    DimensionMismatch,
    /// Directory listing, decoding or encoding failed.
    Io,
}

/// Errors that can occur while indexing, assembling or writing tiles.
#[derive(Debug, Error)]
pub enum StitchError {
    /// A matching filename does not follow `<label>_<column>_<row>`.
    #[error(transparent)]
    Parse(#[from] FilenameError),

    /// Two files resolve to the same (column, row).
    #[error("duplicate tile at {coord}: '{first}' and '{second}'")]
    DuplicateTile {
        coord: TileCoord,
        first: PathBuf,
        second: PathBuf,
    },

    /// The grid is not rectangular or tile sizes are incompatible.
    #[error(transparent)]
    DimensionMismatch(#[from] DimensionMismatch),

    /// The input directory could not be listed.
    #[error("failed to list directory '{path}': {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A tile could not be read or decoded.
    #[error("failed to decode tile '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The composite could not be encoded or written.
    #[error("failed to write composite '{path}': {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl StitchError {
    /// Returns the coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StitchError::Parse(_) => ErrorKind::Parse,
            StitchError::DuplicateTile { .. } => ErrorKind::DuplicateTile,
            StitchError::DimensionMismatch(_) => ErrorKind::DimensionMismatch,
            StitchError::ListDirectory { .. }
            | StitchError::Decode { .. }
            | StitchError::Encode { .. } => ErrorKind::Io,
        }
    }
}

/// Result alias used throughout the crate.
pub type StitchResult<T> = Result<T, StitchError>;
