//! INI configuration file loading.
//!
//! ```ini
//! [tiles]
//! directory = .
//! prefix = cell_
//! extension = pbm
//! parallel_decode = false
//!
//! [output]
//! path = cell.pbm
//! pnm_encoding = ascii
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use std::path::Path;

use ini::Ini;
use thiserror::Error;

use super::StitchConfig;
use crate::codec::PnmEncoding;

const SECTION_TILES: &str = "tiles";
const SECTION_OUTPUT: &str = "output";

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or parse the config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Config text is not valid INI
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] ini::ParseError),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl StitchConfig {
    /// Load configuration from an INI file on top of the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path)?;
        Self::default().apply_ini(&ini)
    }

    /// Parse configuration from INI text on top of the defaults.
    pub fn from_ini_str(content: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(content)?;
        Self::default().apply_ini(&ini)
    }

    fn apply_ini(mut self, ini: &Ini) -> Result<Self, ConfigError> {
        if let Some(section) = ini.section(Some(SECTION_TILES)) {
            if let Some(v) = non_empty(section.get("directory")) {
                self = self.with_input_dir(v);
            }
            if let Some(v) = section.get("prefix") {
                self = self.with_prefix(v.trim());
            }
            if let Some(v) = non_empty(section.get("extension")) {
                self = self.with_extension(v);
            }
            if let Some(v) = non_empty(section.get("parallel_decode")) {
                let parallel = parse_bool(v).ok_or_else(|| ConfigError::InvalidValue {
                    section: SECTION_TILES.to_string(),
                    key: "parallel_decode".to_string(),
                    value: v.to_string(),
                    reason: "must be true or false".to_string(),
                })?;
                self = self.with_parallel_decode(parallel);
            }
        }

        if let Some(section) = ini.section(Some(SECTION_OUTPUT)) {
            if let Some(v) = non_empty(section.get("path")) {
                self = self.with_output_path(v);
            }
            if let Some(v) = non_empty(section.get("pnm_encoding")) {
                let encoding =
                    v.parse::<PnmEncoding>()
                        .map_err(|reason| ConfigError::InvalidValue {
                            section: SECTION_OUTPUT.to_string(),
                            key: "pnm_encoding".to_string(),
                            value: v.to_string(),
                            reason,
                        })?;
                self = self.with_pnm_encoding(encoding);
            }
        }

        Ok(self)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
