//! Command-line arguments and their resolution into a [`StitchConfig`].

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tilestitch::codec::PnmEncoding;
use tilestitch::config::StitchConfig;

use crate::error::CliError;

/// Sample encoding for PBM/PGM/PPM output.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PnmEncodingArg {
    /// Plain text samples (P1/P2/P3)
    Ascii,
    /// Raw binary samples (P4/P5/P6)
    Binary,
}

impl From<PnmEncodingArg> for PnmEncoding {
    fn from(arg: PnmEncodingArg) -> Self {
        match arg {
            PnmEncodingArg::Ascii => PnmEncoding::Ascii,
            PnmEncodingArg::Binary => PnmEncoding::Binary,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tilestitch")]
#[command(version)]
#[command(about = "Stitch <prefix><column>_<row>.<ext> tiles into one image", long_about = None)]
pub struct Args {
    /// Directory containing the tiles [default: .]
    #[arg(long, short = 'd')]
    pub dir: Option<PathBuf>,

    /// Leading substring of tile filenames [default: cell_]
    #[arg(long, short = 'p')]
    pub prefix: Option<String>,

    /// Tile file extension, without the dot [default: pbm]
    #[arg(long, short = 'e')]
    pub extension: Option<String>,

    /// Composite output path; format follows its extension [default: cell.pbm]
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// INI file with [tiles] and [output] settings
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Decode tiles in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Sample encoding for PBM/PGM/PPM output [default: ascii]
    #[arg(long, value_enum)]
    pub pnm_encoding: Option<PnmEncodingArg>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Build the run configuration.
    ///
    /// Command-line values take precedence over the config file, which takes
    /// precedence over the built-in defaults.
    pub fn resolve(&self) -> Result<StitchConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => StitchConfig::load_from(path)?,
            None => StitchConfig::default(),
        };

        if let Some(dir) = &self.dir {
            config = config.with_input_dir(dir);
        }
        if let Some(prefix) = &self.prefix {
            config = config.with_prefix(prefix);
        }
        if let Some(extension) = &self.extension {
            config = config.with_extension(extension);
        }
        if let Some(output) = &self.output {
            config = config.with_output_path(output);
        }
        if self.parallel {
            config = config.with_parallel_decode(true);
        }
        if let Some(encoding) = self.pnm_encoding {
            config = config.with_pnm_encoding(encoding.into());
        }

        Ok(config)
    }
}
