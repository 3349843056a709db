use clap::Parser;
use std::path::PathBuf;

use crate::config::PlotConfig;
use crate::error::Result;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to config TOML (used only if it exists)
    #[arg(long, default_value = "sensitivity-plots.toml")]
    pub config: PathBuf,

    /// Metrics CSV to read (overrides config)
    #[arg(long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Directory for the three PNG files (overrides config)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Image resolution in dots per inch (overrides config)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub dpi: Option<u32>,
}

impl Args {
    /// Defaults, then the config file, then command-line overrides.
    pub fn resolve_config(&self) -> Result<PlotConfig> {
        let mut config = PlotConfig::load_or_default(&self.config)?;
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir);
        }
        if let Some(dpi) = self.dpi {
            config.dpi = dpi;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_resolve_to_defaults() {
        let args = Args::parse_from(["sensitivity-plots", "--config", "/nonexistent/plots.toml"]);
        assert_eq!(args.resolve_config().unwrap(), PlotConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "sensitivity-plots",
            "--config",
            "/nonexistent/plots.toml",
            "--input",
            "metrics.csv",
            "--output-dir",
            "charts",
            "--dpi",
            "72",
        ]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.input, PathBuf::from("metrics.csv"));
        assert_eq!(config.output.roc, PathBuf::from("charts/sensitivity-plot-roc.png"));
        assert_eq!(config.dpi, 72);
    }

    #[test]
    fn zero_dpi_flag_is_rejected() {
        let parsed = Args::try_parse_from(["sensitivity-plots", "--dpi", "0"]);
        assert!(parsed.is_err());
    }
}
