// Entry point: loads the metrics CSV and writes the three sensitivity charts.
use clap::Parser;
use std::error::Error;

use sensitivity_plots::cli::Args;
use sensitivity_plots::{logging, pipeline};

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init_logging();

    let config = args.resolve_config()?;
    let stdout = std::io::stdout();
    pipeline::run(&config, &mut stdout.lock())?;
    Ok(())
}
