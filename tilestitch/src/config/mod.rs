//! Stitch configuration.
//!
//! [`StitchConfig`] carries every parameter of a run explicitly. Values come
//! from, in increasing precedence: built-in defaults, an INI file
//! ([`StitchConfig::load_from`]), and the caller's `with_*` overrides.
//!
//! # Example
//!
//! ```
//! use tilestitch::config::StitchConfig;
//!
//! let config = StitchConfig::default()
//!     .with_input_dir("tiles")
//!     .with_output_path("mosaic.png");
//!
//! assert_eq!(config.prefix(), "cell_");
//! assert_eq!(config.extension(), "pbm");
//! ```

mod defaults;
mod file;

pub use defaults::*;
pub use file::ConfigError;

use std::path::{Path, PathBuf};

use crate::codec::PnmEncoding;

/// Parameters for one stitch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchConfig {
    input_dir: PathBuf,
    prefix: String,
    extension: String,
    output_path: PathBuf,
    parallel_decode: bool,
    pnm_encoding: PnmEncoding,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            prefix: DEFAULT_PREFIX.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            parallel_decode: DEFAULT_PARALLEL_DECODE,
            pnm_encoding: PnmEncoding::default(),
        }
    }
}

impl StitchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory scanned for tiles.
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Leading substring a filename must have to be considered a tile.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Trailing extension (without the dot) a tile filename must have.
    ///
    /// A leading dot is tolerated and stripped.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension
            .strip_prefix('.')
            .map(str::to_string)
            .unwrap_or(extension);
        self
    }

    /// Where the composite is written. Format follows the extension.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_parallel_decode(mut self, parallel: bool) -> Self {
        self.parallel_decode = parallel;
        self
    }

    pub fn with_pnm_encoding(mut self, encoding: PnmEncoding) -> Self {
        self.pnm_encoding = encoding;
        self
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn parallel_decode(&self) -> bool {
        self.parallel_decode
    }

    pub fn pnm_encoding(&self) -> PnmEncoding {
        self.pnm_encoding
    }

    /// Name of the output file if it would be listed when scanning the
    /// input directory, so it is never mistaken for a tile.
    pub fn output_name_in_input_dir(&self) -> Option<String> {
        let parent = match self.output_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if !same_dir(parent, &self.input_dir) {
            return None;
        }
        self.output_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => normalize(a) == normalize(b),
    }
}

fn normalize(path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        path.components().collect()
    }
}
