//! tilestitch CLI - Command-line interface
//!
//! Run with no arguments to stitch `cell_*.pbm` tiles in the current
//! directory into `cell.pbm`.

mod args;
mod error;

use clap::Parser;
use tilestitch::logging::init_logging;
use tilestitch::stitcher::Stitcher;
use tracing::debug;

use args::Args;
use error::CliError;

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        e.exit();
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let _logging_guard = init_logging(args.verbose, args.log_file.as_deref())
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    let config = args.resolve()?;
    debug!(?config, "Resolved configuration");

    let report = Stitcher::new(config).run()?;

    println!(
        "Wrote {} ({}x{} px, {} columns x {} rows, {} tiles)",
        report.output_path.display(),
        report.width,
        report.height,
        report.columns,
        report.rows,
        report.tiles
    );

    Ok(())
}
