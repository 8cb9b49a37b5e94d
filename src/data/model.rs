use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::units::MS_PER_MINUTE;
use crate::stats::{RegressionFit, Summary};

// ---------------------------------------------------------------------------
// RawRecord – one valid row of a benchmark log
// ---------------------------------------------------------------------------

/// A single `timestamp_ms, label, value` row as it appears in the log.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub time_ms: f64,
    /// Column 1, kept verbatim.
    pub label: String,
    pub value: f64,
}

impl RawRecord {
    /// Position on the shared time axis, in minutes.
    pub fn minutes(&self) -> f64 {
        self.time_ms / MS_PER_MINUTE
    }
}

// ---------------------------------------------------------------------------
// Series – one source, normalized for plotting
// ---------------------------------------------------------------------------

/// One labelled sequence of `(minutes, normalized value)` points.
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    /// Resolved display label (override or `default_label`).
    pub label: String,
    /// First label observed in the data itself.
    pub default_label: String,
    /// Points in input row order.
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|&(x, _)| x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, y)| y).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Time covered by the log, read from the last kept point's x. Rows that
    /// were skipped or dropped as zeros do not count.
    pub fn duration_minutes(&self) -> Option<f64> {
        self.points.last().map(|&(x, _)| x)
    }

    /// Smallest and largest x, used to draw regression overlays.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.points.iter().map(|&(x, _)| x);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x))))
    }
}

// ---------------------------------------------------------------------------
// SeriesReport – what the aggregator hands to the rendering sink
// ---------------------------------------------------------------------------

/// A series plus its statistics. `summary` is `None` when the source had
/// no usable points after filtering.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesReport {
    pub path: PathBuf,
    pub series: Series,
    pub summary: Option<Summary>,
    pub fit: Option<RegressionFit>,
    /// Rows the loader had to skip.
    pub skipped_rows: usize,
}

impl SeriesReport {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
    }
}

impl fmt::Display for SeriesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ({}) ===", self.series.label, self.path.display())?;
        match &self.summary {
            Some(summary) => write!(f, "{summary}")?,
            None => writeln!(f, "no usable data points")?,
        }
        if let Some(fit) = &self.fit {
            writeln!(f, "{fit}")?;
        }
        if self.skipped_rows > 0 {
            writeln!(f, "skipped rows:   {}", self.skipped_rows)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_divides_by_sixty_thousand() {
        let rec = RawRecord {
            time_ms: 90_000.0,
            label: "io".into(),
            value: 1.0,
        };
        assert_eq!(rec.minutes(), 1.5);
    }

    #[test]
    fn x_range_ignores_row_order() {
        let series = Series {
            label: "a".into(),
            default_label: "a".into(),
            points: vec![(2.0, 1.0), (0.5, 1.0), (3.0, 1.0)],
        };
        assert_eq!(series.x_range(), Some((0.5, 3.0)));
        assert_eq!(series.duration_minutes(), Some(3.0));
    }
}
