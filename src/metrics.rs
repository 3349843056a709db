//! Threshold sweep metrics loaded from CSV.
//!
//! The table stores one `Vec<f64>` per metric. Row `i` of every column
//! describes the same measurement, so all columns always have equal length.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{PlotError, Result};

/// One of the five metric columns a sensitivity CSV must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Threshold,
    Precision,
    Recall,
    F1,
    Fpr,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Threshold,
        Column::Precision,
        Column::Recall,
        Column::F1,
        Column::Fpr,
    ];

    /// Header name in the CSV.
    pub fn name(self) -> &'static str {
        match self {
            Column::Threshold => "threshold",
            Column::Precision => "precision",
            Column::Recall => "recall",
            Column::F1 => "f1",
            Column::Fpr => "fpr",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single measurement at one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricsRow {
    pub threshold: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub fpr: f64,
}

impl MetricsRow {
    fn from_values(values: [f64; 5]) -> Self {
        let [threshold, precision, recall, f1, fpr] = values;
        Self {
            threshold,
            precision,
            recall,
            f1,
            fpr,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsTable {
    columns: [Vec<f64>; 5],
}

impl MetricsTable {
    pub fn from_rows(rows: impl IntoIterator<Item = MetricsRow>) -> Self {
        let mut table = Self::default();
        for row in rows {
            table.push(row);
        }
        table
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| PlotError::io(path, err))?;
        let table = Self::from_reader(file)?;
        debug!(path = %path.display(), rows = table.len(), "loaded metrics");
        Ok(table)
    }

    /// Parses a headed CSV. Column order is free and unknown columns are ignored.
    ///
    /// Rows may be ragged: trailing extras and missing optional columns are
    /// fine, only a missing required field fails. A repeated header name
    /// resolves to its last occurrence. Every row is fully parsed before it
    /// is appended, so a failure never leaves the columns at different lengths.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|source| PlotError::Csv { row: 0, source })?
            .clone();

        let mut positions = [0usize; 5];
        for (slot, column) in positions.iter_mut().zip(Column::ALL) {
            *slot = headers
                .iter()
                .enumerate()
                .filter(|(_, name)| *name == column.name())
                .map(|(index, _)| index)
                .last()
                .ok_or(PlotError::MissingColumn {
                    column: column.name(),
                })?;
        }

        let mut table = Self::default();
        let mut record = csv::StringRecord::new();
        let mut row = 0u64;
        loop {
            row += 1;
            match reader.read_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(source) => return Err(PlotError::Csv { row, source }),
            }

            let mut values = [0.0f64; 5];
            for ((value, column), &position) in
                values.iter_mut().zip(Column::ALL).zip(positions.iter())
            {
                *value = parse_field(record.get(position), row, column)?;
            }
            table.push(MetricsRow::from_values(values));
        }
        Ok(table)
    }

    fn push(&mut self, row: MetricsRow) {
        self.columns[Column::Threshold.index()].push(row.threshold);
        self.columns[Column::Precision.index()].push(row.precision);
        self.columns[Column::Recall.index()].push(row.recall);
        self.columns[Column::F1.index()].push(row.f1);
        self.columns[Column::Fpr.index()].push(row.fpr);
    }

    pub fn len(&self) -> usize {
        self.columns[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column(&self, column: Column) -> &[f64] {
        &self.columns[column.index()]
    }

    pub fn threshold(&self) -> &[f64] {
        self.column(Column::Threshold)
    }

    pub fn precision(&self) -> &[f64] {
        self.column(Column::Precision)
    }

    pub fn recall(&self) -> &[f64] {
        self.column(Column::Recall)
    }

    pub fn f1(&self) -> &[f64] {
        self.column(Column::F1)
    }

    pub fn fpr(&self) -> &[f64] {
        self.column(Column::Fpr)
    }

    /// Index-aligned `(x, y)` pairs in row order.
    pub fn points(&self, x: Column, y: Column) -> Vec<(f64, f64)> {
        self.column(x)
            .iter()
            .copied()
            .zip(self.column(y).iter().copied())
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = MetricsRow> + '_ {
        (0..self.len()).map(move |i| {
            MetricsRow::from_values(Column::ALL.map(|column| self.column(column)[i]))
        })
    }
}

fn parse_field(raw: Option<&str>, row: u64, column: Column) -> Result<f64> {
    let raw = raw.ok_or(PlotError::MissingField {
        row,
        column: column.name(),
    })?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| PlotError::InvalidValue {
            row,
            column: column.name(),
            value: raw.to_string(),
        })
}
