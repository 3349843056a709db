//! Load once, then render the standard charts in order.

use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use crate::config::PlotConfig;
use crate::error::{PlotError, Result};
use crate::metrics::MetricsTable;
use crate::plot;

/// Renders every standard chart for `config.input`, writing `Saved: <path>`
/// to `out` after each image. Stops at the first error; images already
/// written stay on disk.
pub fn run<W: Write>(config: &PlotConfig, out: &mut W) -> Result<Vec<PathBuf>> {
    let table = MetricsTable::from_path(&config.input)?;
    info!(input = %config.input.display(), rows = table.len(), "loaded sensitivity metrics");

    let jobs = plot::standard_jobs(config);
    let mut written = Vec::with_capacity(jobs.len());
    for job in &jobs {
        let path = plot::render(job, &table)?;
        writeln!(out, "Saved: {}", path.display())
            .map_err(|err| PlotError::io("<stdout>", err))?;
        written.push(path);
    }
    Ok(written)
}
