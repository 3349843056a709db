pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod plot;

pub use error::{PlotError, Result};
pub use metrics::{Column, MetricsRow, MetricsTable};
