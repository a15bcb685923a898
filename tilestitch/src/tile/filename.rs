//! Tile filename parsing and formatting.
//!
//! Tiles are named `{label}_{column}_{row}.{extension}`, for example
//! `cell_0_3.pbm` (column 0, row 3). Column and row are unsigned base-10
//! integers.
//!
//! Selection happens in two steps. A [`NameFilter`] decides which directory
//! entries are tiles at all (`<prefix>*.<extension>`); non-matching entries
//! are skipped. Every entry that passes the filter must then parse with
//! [`parse_tile_filename`], otherwise the run fails.

use glob::{MatchOptions, Pattern};
use thiserror::Error;

use super::TileCoord;

const FIELD_SEPARATOR: char = '_';

/// Error parsing a tile filename.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilenameError {
    /// The name does not end in `.{extension}`.
    #[error("tile filename '{name}' does not end in '.{extension}'")]
    MissingExtension { name: String, extension: String },

    /// The stem does not split into exactly label, column and row.
    #[error("tile filename '{name}' has {found} '_'-separated fields, expected 3 (label_column_row)")]
    FieldCount { name: String, found: usize },

    /// The column field is not an unsigned integer.
    #[error("tile filename '{name}' has invalid column '{value}'")]
    InvalidColumn { name: String, value: String },

    /// The row field is not an unsigned integer.
    #[error("tile filename '{name}' has invalid row '{value}'")]
    InvalidRow { name: String, value: String },

    /// The prefix/extension pair could not be turned into a match pattern.
    #[error("invalid tile name filter: {0}")]
    InvalidFilter(String),
}

/// Parsed tile filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileName {
    /// Leading field, e.g. `cell`. Not interpreted.
    pub label: String,
    pub coord: TileCoord,
}

/// Matches directory entries of the form `<prefix>*.<extension>`.
#[derive(Debug, Clone)]
pub struct NameFilter {
    prefix: String,
    extension: String,
    pattern: Pattern,
}

impl NameFilter {
    /// Builds a filter for the given prefix and extension.
    ///
    /// Both are matched literally; glob metacharacters in either are escaped.
    ///
    /// ```
    /// use tilestitch::tile::NameFilter;
    ///
    /// let filter = NameFilter::new("cell_", "pbm").unwrap();
    /// assert!(filter.matches("cell_0_3.pbm"));
    /// assert!(!filter.matches("cell.pbm"));
    /// assert!(!filter.matches("cell_0_3.png"));
    /// ```
    pub fn new(prefix: &str, extension: &str) -> Result<Self, FilenameError> {
        let glob = format!("{}*.{}", Pattern::escape(prefix), Pattern::escape(extension));
        let pattern = Pattern::new(&glob).map_err(|e| FilenameError::InvalidFilter(e.to_string()))?;

        Ok(Self {
            prefix: prefix.to_string(),
            extension: extension.to_string(),
            pattern,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns true if `name` should be treated as a tile.
    pub fn matches(&self, name: &str) -> bool {
        self.pattern.matches_with(
            name,
            MatchOptions {
                case_sensitive: true,
                require_literal_separator: true,
                require_literal_leading_dot: false,
            },
        )
    }

    /// Parses a name that passed [`NameFilter::matches`].
    pub fn parse(&self, name: &str) -> Result<TileName, FilenameError> {
        parse_tile_filename(name, &self.extension)
    }
}

/// Parse a tile filename into its label and grid coordinate.
///
/// # Examples
///
/// ```
/// use tilestitch::tile::{parse_tile_filename, TileCoord};
///
/// let name = parse_tile_filename("cell_0_3.pbm", "pbm").unwrap();
/// assert_eq!(name.label, "cell");
/// assert_eq!(name.coord, TileCoord::new(0, 3));
///
/// assert!(parse_tile_filename("cellx_1.pbm", "pbm").is_err());
/// ```
pub fn parse_tile_filename(name: &str, extension: &str) -> Result<TileName, FilenameError> {
    let stem = name
        .strip_suffix(extension)
        .and_then(|s| s.strip_suffix('.'))
        .ok_or_else(|| FilenameError::MissingExtension {
            name: name.to_string(),
            extension: extension.to_string(),
        })?;

    let fields: Vec<&str> = stem.split(FIELD_SEPARATOR).collect();
    let [label, column, row] = fields.as_slice() else {
        return Err(FilenameError::FieldCount {
            name: name.to_string(),
            found: fields.len(),
        });
    };

    let column = parse_index(column).ok_or_else(|| FilenameError::InvalidColumn {
        name: name.to_string(),
        value: column.to_string(),
    })?;
    let row = parse_index(row).ok_or_else(|| FilenameError::InvalidRow {
        name: name.to_string(),
        value: row.to_string(),
    })?;

    Ok(TileName {
        label: label.to_string(),
        coord: TileCoord::new(column, row),
    })
}

/// Format the filename for a tile at `coord`.
///
/// `prefix` is used verbatim, so it normally ends in the separator:
///
/// ```
/// use tilestitch::tile::{tile_filename, TileCoord};
///
/// assert_eq!(tile_filename("cell_", TileCoord::new(0, 3), "pbm"), "cell_0_3.pbm");
/// ```
pub fn tile_filename(prefix: &str, coord: TileCoord, extension: &str) -> String {
    format!(
        "{}{}{}{}.{}",
        prefix, coord.column, FIELD_SEPARATOR, coord.row, extension
    )
}

// Digits only: `u32::from_str` would also accept a leading '+'.
fn parse_index(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
