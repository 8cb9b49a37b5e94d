use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::data::model::SeriesReport;

/// Directory the scripts historically wrote their figures into.
pub const DEFAULT_OUTPUT_DIR: &str = "data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    #[default]
    Scatter,
    Line,
    Box,
}

/// Everything the viewer needs to draw one figure.
#[derive(Debug, Clone)]
pub struct PlotDocument {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: PlotKind,
    pub reports: Vec<SeriesReport>,
}

impl PlotDocument {
    pub fn time_series(title: String, y_label: String, kind: PlotKind, reports: Vec<SeriesReport>) -> Self {
        Self {
            title,
            x_label: "Time (minutes)".to_string(),
            y_label,
            kind,
            reports,
        }
    }

    /// `(label, xs, ys)` per source, in source order.
    pub fn series_triples(&self) -> Vec<(&str, Vec<f64>, Vec<f64>)> {
        self.reports
            .iter()
            .map(|r| (r.series.label.as_str(), r.series.xs(), r.series.ys()))
            .collect()
    }
}

/// Map a plot title to a file name that is valid on every platform.
///
/// Path separators, reserved characters and control characters become `_`;
/// leading/trailing dots and spaces are stripped. An empty result becomes
/// `plot`.
pub fn sanitize_file_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if trimmed.is_empty() {
        "plot".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `<dir>/<sanitized title>.png`
pub fn default_output_path(dir: Option<&str>, title: &str) -> PathBuf {
    let dir = dir.unwrap_or(DEFAULT_OUTPUT_DIR);
    PathBuf::from(dir).join(format!("{}.png", sanitize_file_name(title)))
}
