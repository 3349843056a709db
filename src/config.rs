use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PlotError, Result};

const DEFAULT_ROOT: &str = "/workspaces/GENUX-FORGE";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "OutputConfig::default_pr")]
    pub pr: PathBuf,
    #[serde(default = "OutputConfig::default_threshold")]
    pub threshold: PathBuf,
    #[serde(default = "OutputConfig::default_roc")]
    pub roc: PathBuf,
}

impl OutputConfig {
    fn default_pr() -> PathBuf {
        Path::new(DEFAULT_ROOT).join("sensitivity-plot-pr.png")
    }
    fn default_threshold() -> PathBuf {
        Path::new(DEFAULT_ROOT).join("sensitivity-plot-threshold.png")
    }
    fn default_roc() -> PathBuf {
        Path::new(DEFAULT_ROOT).join("sensitivity-plot-roc.png")
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pr: Self::default_pr(),
            threshold: Self::default_threshold(),
            roc: Self::default_roc(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlotConfig {
    #[serde(default = "PlotConfig::default_input")]
    pub input: PathBuf,
    #[serde(default = "PlotConfig::default_dpi")]
    pub dpi: u32,
    #[serde(default)]
    pub output: OutputConfig,
}

impl PlotConfig {
    fn default_input() -> PathBuf {
        Path::new(DEFAULT_ROOT).join("sensitivity-metrics.csv")
    }
    fn default_dpi() -> u32 {
        100
    }

    /// Reads `path` when it exists, otherwise returns the defaults.
    /// A config that exists but cannot be read or parsed, or asks for
    /// `dpi = 0`, is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|err| PlotError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let config: Self = toml::from_str(&contents).map_err(|err| PlotError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        if config.dpi == 0 {
            return Err(PlotError::Config {
                path: path.to_path_buf(),
                message: "dpi must be at least 1".to_string(),
            });
        }
        Ok(config)
    }

    /// Moves the three chart outputs into `dir`, keeping their file names.
    pub fn with_output_dir(mut self, dir: &Path) -> Self {
        for out in [
            &mut self.output.pr,
            &mut self.output.threshold,
            &mut self.output.roc,
        ] {
            if let Some(name) = out.file_name() {
                *out = dir.join(name);
            }
        }
        self
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            input: Self::default_input(),
            dpi: Self::default_dpi(),
            output: OutputConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "sensitivity_plots_config_test_{}_{}",
            name,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        p
    }

    #[test]
    fn defaults_match_fixed_paths() {
        let cfg = PlotConfig::default();
        assert_eq!(
            cfg.input,
            PathBuf::from("/workspaces/GENUX-FORGE/sensitivity-metrics.csv")
        );
        assert_eq!(
            cfg.output.pr,
            PathBuf::from("/workspaces/GENUX-FORGE/sensitivity-plot-pr.png")
        );
        assert_eq!(
            cfg.output.threshold,
            PathBuf::from("/workspaces/GENUX-FORGE/sensitivity-plot-threshold.png")
        );
        assert_eq!(
            cfg.output.roc,
            PathBuf::from("/workspaces/GENUX-FORGE/sensitivity-plot-roc.png")
        );
        assert_eq!(cfg.dpi, 100);
    }

    #[test]
    fn missing_file_gives_defaults_without_writing() {
        let path = unique_path("missing.toml");
        let _ = fs::remove_file(&path);

        let cfg = PlotConfig::load_or_default(&path).unwrap();
        assert_eq!(cfg, PlotConfig::default());
        assert!(!path.exists(), "loading must not create the config file");
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let path = unique_path("partial.toml");
        fs::write(&path, "dpi = 150\n[output]\nroc = \"/tmp/roc.png\"\n").unwrap();

        let cfg = PlotConfig::load_or_default(&path).unwrap();
        assert_eq!(cfg.dpi, 150);
        assert_eq!(cfg.output.roc, PathBuf::from("/tmp/roc.png"));
        assert_eq!(cfg.output.pr, OutputConfig::default_pr());
        assert_eq!(cfg.input, PlotConfig::default_input());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = unique_path("broken.toml");
        fs::write(&path, "dpi = \"lots\"\n").unwrap();

        let err = PlotConfig::load_or_default(&path).unwrap_err();
        assert!(matches!(err, PlotError::Config { .. }), "got {err:?}");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn zero_dpi_is_rejected() {
        let path = unique_path("zero_dpi.toml");
        fs::write(&path, "dpi = 0\n").unwrap();

        let err = PlotConfig::load_or_default(&path).unwrap_err();
        match err {
            PlotError::Config { message, .. } => assert!(message.contains("dpi")),
            other => panic!("unexpected error: {other:?}"),
        }

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn output_dir_keeps_file_names() {
        let cfg = PlotConfig::default().with_output_dir(Path::new("/tmp/charts"));
        assert_eq!(cfg.output.pr, PathBuf::from("/tmp/charts/sensitivity-plot-pr.png"));
        assert_eq!(
            cfg.output.threshold,
            PathBuf::from("/tmp/charts/sensitivity-plot-threshold.png")
        );
        assert_eq!(cfg.output.roc, PathBuf::from("/tmp/charts/sensitivity-plot-roc.png"));
        assert_eq!(cfg.input, PlotConfig::default_input());
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let cfg = PlotConfig::default().with_output_dir(Path::new("/srv/out"));
        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: PlotConfig = toml::from_str(&text).expect("parse");
        assert_eq!(parsed, cfg);
    }
}
