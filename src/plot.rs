//! Line/marker chart rendering to PNG.
//!
//! A [`ChartJob`] names which metric columns to pair up, how to label the
//! figure and where to write it. [`render`] draws the job into an in-memory
//! RGB canvas with plotters and writes the PNG in one `fs::write`, so every
//! filesystem failure surfaces as an I/O error on the output path.

use std::error::Error;
use std::fs;
use std::io::Cursor;
use std::ops::Range;
use std::path::PathBuf;

use plotters::prelude::*;
use tracing::{debug, info};

use crate::config::PlotConfig;
use crate::error::{PlotError, Result};
use crate::metrics::{Column, MetricsTable};

const LINE_WIDTH: u32 = 2;
const MARKER_SIZE: i32 = 4;
const LEGEND_LINE_LEN: i32 = 20;
/// Fraction of the data span added on each side of an axis.
const AXIS_MARGIN: f64 = 0.05;

const SERIES_BLUE: RGBColor = RGBColor(31, 119, 180);
const SERIES_ORANGE: RGBColor = RGBColor(255, 127, 14);
const SERIES_GREEN: RGBColor = RGBColor(44, 160, 44);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
}

#[derive(Debug, Clone)]
pub struct SeriesSpec {
    pub label: String,
    pub x: Column,
    pub y: Column,
    pub marker: Marker,
    pub color: RGBColor,
}

/// Figure size in inches; pixel size is `inches * dpi`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSize {
    pub width: f64,
    pub height: f64,
}

impl FigureSize {
    pub const STANDARD: FigureSize = FigureSize {
        width: 8.0,
        height: 6.0,
    };
    pub const WIDE: FigureSize = FigureSize {
        width: 10.0,
        height: 6.0,
    };
}

#[derive(Debug, Clone)]
pub struct ChartJob {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<SeriesSpec>,
    /// Horizontal guide drawn across the full x range.
    pub reference_line: Option<f64>,
    pub figure: FigureSize,
    pub dpi: u32,
    pub out_path: PathBuf,
}

impl ChartJob {
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        let width = (self.figure.width * dpi).round().max(1.0) as u32;
        let height = (self.figure.height * dpi).round().max(1.0) as u32;
        (width, height)
    }
}

/// The three charts produced for a sensitivity sweep, in output order:
/// precision-recall, metrics vs threshold, FPR vs recall.
pub fn standard_jobs(config: &PlotConfig) -> Vec<ChartJob> {
    let series = |label: &str, x: Column, y: Column, marker: Marker, color: RGBColor| SeriesSpec {
        label: label.to_string(),
        x,
        y,
        marker,
        color,
    };

    vec![
        ChartJob {
            title: "GenUX Drift Detection: Precision-Recall Curve".to_string(),
            x_label: "Recall".to_string(),
            y_label: "Precision".to_string(),
            series: vec![series(
                "Precision-Recall",
                Column::Recall,
                Column::Precision,
                Marker::Circle,
                SERIES_BLUE,
            )],
            reference_line: None,
            figure: FigureSize::STANDARD,
            dpi: config.dpi,
            out_path: config.output.pr.clone(),
        },
        ChartJob {
            title: "GenUX Drift Detection: Performance vs Threshold".to_string(),
            x_label: "Threshold".to_string(),
            y_label: "Score".to_string(),
            series: vec![
                series(
                    "Precision",
                    Column::Threshold,
                    Column::Precision,
                    Marker::Circle,
                    SERIES_BLUE,
                ),
                series(
                    "Recall",
                    Column::Threshold,
                    Column::Recall,
                    Marker::Square,
                    SERIES_ORANGE,
                ),
                series(
                    "F1",
                    Column::Threshold,
                    Column::F1,
                    Marker::Triangle,
                    SERIES_GREEN,
                ),
            ],
            reference_line: Some(0.0),
            figure: FigureSize::WIDE,
            dpi: config.dpi,
            out_path: config.output.threshold.clone(),
        },
        ChartJob {
            title: "GenUX Drift Detection: FPR vs TPR".to_string(),
            x_label: "False Positive Rate (FPR)".to_string(),
            y_label: "True Positive Rate (Recall)".to_string(),
            series: vec![series(
                "ROC (approx)",
                Column::Fpr,
                Column::Recall,
                Marker::Circle,
                RED,
            )],
            reference_line: None,
            figure: FigureSize::STANDARD,
            dpi: config.dpi,
            out_path: config.output.roc.clone(),
        },
    ]
}

/// Renders `job` from `table` and writes the PNG. Returns the written path.
pub fn render(job: &ChartJob, table: &MetricsTable) -> Result<PathBuf> {
    if job.dpi == 0 {
        return Err(PlotError::Render {
            path: job.out_path.clone(),
            message: "dpi must be at least 1".to_string(),
        });
    }
    let (width, height) = job.pixel_size();
    let mut canvas = vec![0u8; width as usize * height as usize * 3];

    draw_chart(job, table, &mut canvas, (width, height)).map_err(|err| PlotError::Render {
        path: job.out_path.clone(),
        message: err.to_string(),
    })?;
    let png = encode_png(canvas, width, height).map_err(|message| PlotError::Render {
        path: job.out_path.clone(),
        message,
    })?;

    fs::write(&job.out_path, &png).map_err(|err| PlotError::io(&job.out_path, err))?;
    info!(
        path = %job.out_path.display(),
        width,
        height,
        bytes = png.len(),
        "wrote chart"
    );
    Ok(job.out_path.clone())
}

/// Span of the finite values plus a margin on both sides.
///
/// A single distinct value is widened to at least ±0.5; no finite values
/// gives `0..1`.
pub fn axis_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values.into_iter().filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let span = hi - lo;
    if span <= 0.0 {
        let pad = (lo.abs() * AXIS_MARGIN).max(0.5);
        return (lo - pad)..(hi + pad);
    }
    let pad = span * AXIS_MARGIN;
    (lo - pad)..(hi + pad)
}

fn draw_chart(
    job: &ChartJob,
    table: &MetricsTable,
    canvas: &mut [u8],
    size: (u32, u32),
) -> std::result::Result<(), Box<dyn Error>> {
    let series: Vec<(&SeriesSpec, Vec<(f64, f64)>)> = job
        .series
        .iter()
        .map(|spec| {
            let points: Vec<(f64, f64)> = table
                .points(spec.x, spec.y)
                .into_iter()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .collect();
            (spec, points)
        })
        .collect();

    let x_range = axis_range(series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.0)));
    let y_range = axis_range(
        series
            .iter()
            .flat_map(|(_, pts)| pts.iter().map(|p| p.1))
            .chain(job.reference_line),
    );
    debug!(title = %job.title, ?x_range, ?y_range, "axis ranges");

    let root = BitMapBackend::with_buffer(canvas, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&job.title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), y_range)?;

    chart
        .configure_mesh()
        .x_desc(job.x_label.as_str())
        .y_desc(job.y_label.as_str())
        .bold_line_style(BLACK.mix(0.3))
        .light_line_style(WHITE)
        .draw()?;

    if let Some(y) = job.reference_line {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x_range.start, y), (x_range.end, y)],
            BLACK.mix(0.1),
        )))?;
    }

    for (spec, points) in &series {
        let color = spec.color;
        let anno = chart.draw_series(LineSeries::new(
            points.iter().copied(),
            color.stroke_width(LINE_WIDTH),
        ))?;
        anno.label(spec.label.as_str());

        let legend_line =
            move || PathElement::new(vec![(0, 0), (LEGEND_LINE_LEN, 0)], color.stroke_width(LINE_WIDTH));
        let legend_mid = (LEGEND_LINE_LEN / 2, 0);
        let s = MARKER_SIZE;
        match spec.marker {
            Marker::Circle => {
                anno.legend(move |(x, y)| {
                    EmptyElement::at((x, y))
                        + legend_line()
                        + Circle::new(legend_mid, s, color.filled())
                });
                chart.draw_series(points.iter().map(|&p| Circle::new(p, s, color.filled())))?;
            }
            Marker::Square => {
                anno.legend(move |(x, y)| {
                    EmptyElement::at((x, y))
                        + legend_line()
                        + Rectangle::new(
                            [(legend_mid.0 - s, -s), (legend_mid.0 + s, s)],
                            color.filled(),
                        )
                });
                chart.draw_series(points.iter().map(|&p| {
                    EmptyElement::at(p) + Rectangle::new([(-s, -s), (s, s)], color.filled())
                }))?;
            }
            Marker::Triangle => {
                anno.legend(move |(x, y)| {
                    EmptyElement::at((x, y))
                        + legend_line()
                        + TriangleMarker::new(legend_mid, s + 1, color.filled())
                });
                chart.draw_series(
                    points
                        .iter()
                        .map(|&p| TriangleMarker::new(p, s + 1, color.filled())),
                )?;
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn encode_png(canvas: Vec<u8>, width: u32, height: u32) -> std::result::Result<Vec<u8>, String> {
    let pixels = image::RgbImage::from_raw(width, height, canvas)
        .ok_or_else(|| format!("canvas does not hold {width}x{height} RGB pixels"))?;
    let mut png = Cursor::new(Vec::new());
    pixels
        .write_to(&mut png, image::ImageFormat::Png)
        .map_err(|err| err.to_string())?;
    Ok(png.into_inner())
}
