//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and a single exit code.

use std::fmt;
use std::process;

use tilestitch::config::ConfigError;
use tilestitch::{ErrorKind, StitchError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be loaded
    Config(ConfigError),
    /// The stitch run failed
    Stitch(StitchError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Stitch(e) = self {
            match e.kind() {
                ErrorKind::Parse => {
                    eprintln!();
                    eprintln!("Tile files must be named <label>_<column>_<row>.<extension>,");
                    eprintln!("e.g. cell_0_3.pbm. Use --prefix to narrow which files are read.");
                }
                ErrorKind::DimensionMismatch => {
                    eprintln!();
                    eprintln!("Every column needs a tile for every row, tiles in a row must");
                    eprintln!("share a height and tiles in a column must share a width.");
                }
                ErrorKind::DuplicateTile | ErrorKind::Io => {}
            }
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::Stitch(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Stitch(e) => Some(e),
            CliError::LoggingInit(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<StitchError> for CliError {
    fn from(e: StitchError) -> Self {
        CliError::Stitch(e)
    }
}
