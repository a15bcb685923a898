//! tilestitch - reassemble coordinate-named image tiles into one image.
//!
//! Tiles are files named `{label}_{column}_{row}.{extension}` (for example
//! `cell_0_3.pbm`). The library scans a directory for them, groups them into
//! a grid by column and row, concatenates the pixel buffers and writes the
//! composite with the `image` crate.
//!
//! # Modules
//!
//! - [`tile`] - tile types and the filename convention
//! - [`index`] - directory scanning and the column-keyed [`index::TileGrid`]
//! - [`assembly`] - layout validation, concatenation and splitting
//! - [`codec`] - image decode/encode abstraction
//! - [`stitcher`] - the end-to-end pipeline
//! - [`config`] - run parameters and INI loading
//! - [`logging`] - tracing subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use tilestitch::config::StitchConfig;
//! use tilestitch::stitcher::Stitcher;
//!
//! let config = StitchConfig::default().with_input_dir("frames");
//! let report = Stitcher::new(config).run()?;
//! println!("{}x{} from {} tiles", report.width, report.height, report.tiles);
//! # Ok::<(), tilestitch::error::StitchError>(())
//! ```

pub mod assembly;
pub mod codec;
pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod stitcher;
pub mod tile;

pub use error::{ErrorKind, StitchError, StitchResult};
