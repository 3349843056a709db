//! Error types for loading metrics and rendering charts.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, PlotError>;

#[derive(Error, Debug)]
pub enum PlotError {
    /// Input file missing/unreadable, or output file not writable.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing required column '{column}' in CSV header")]
    MissingColumn { column: &'static str },

    /// Row too short to reach a required column.
    #[error("row {row}: missing value for required column '{column}'")]
    MissingField { row: u64, column: &'static str },

    #[error("row {row}: column '{column}' has non-numeric value '{value}'")]
    InvalidValue {
        row: u64,
        column: &'static str,
        value: String,
    },

    /// Structural CSV problem (bad UTF-8, unreadable stream).
    #[error("row {row}: malformed CSV record: {source}")]
    Csv {
        row: u64,
        #[source]
        source: csv::Error,
    },

    #[error("failed to render chart {}: {message}", path.display())]
    Render { path: PathBuf, message: String },

    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl PlotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PlotError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the errors caused by the CSV contents rather than the filesystem.
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            PlotError::MissingColumn { .. }
                | PlotError::MissingField { .. }
                | PlotError::InvalidValue { .. }
                | PlotError::Csv { .. }
        )
    }

    pub fn is_io(&self) -> bool {
        matches!(self, PlotError::Io { .. })
    }
}
