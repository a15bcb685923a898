//! Default configuration values.

/// Directory scanned for tiles.
pub const DEFAULT_INPUT_DIR: &str = ".";

/// Leading substring selecting tile files.
pub const DEFAULT_PREFIX: &str = "cell_";

/// Tile file extension, without the dot.
pub const DEFAULT_EXTENSION: &str = "pbm";

/// Composite output path.
pub const DEFAULT_OUTPUT_PATH: &str = "cell.pbm";

/// Decode tiles sequentially unless asked otherwise.
pub const DEFAULT_PARALLEL_DECODE: bool = false;
