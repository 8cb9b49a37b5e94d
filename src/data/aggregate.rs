use std::path::PathBuf;

use super::label::{resolve, resolve_batch};
use super::loader::SeriesLoader;
use super::model::{SeriesReport, Series};
use super::units::Conversion;
use crate::error::{PipelineError, Result};
use crate::stats::{fit_linear, summarize};

// ---------------------------------------------------------------------------
// Source specification
// ---------------------------------------------------------------------------

/// One benchmark log and how to turn it into a series.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSpec {
    pub path: PathBuf,
    pub conversion: Conversion,
    pub override_label: Option<String>,
    /// Treat `y == 0.0` as an incomplete sample and drop it.
    pub drop_zero_values: bool,
}

impl SourceSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conversion: Conversion::default(),
            override_label: None,
            drop_zero_values: false,
        }
    }

    /// Build specs for `paths` sharing one conversion, pairing them with a
    /// parallel list of label overrides. A mismatched list fails before any
    /// file is touched.
    pub fn batch(
        paths: &[PathBuf],
        overrides: Option<&[String]>,
        conversion: Conversion,
        drop_zero_values: bool,
    ) -> Result<Vec<SourceSpec>> {
        let labels = resolve_batch(overrides, paths.len())?;
        Ok(paths
            .iter()
            .zip(labels)
            .map(|(path, override_label)| SourceSpec {
                path: path.clone(),
                conversion,
                override_label,
                drop_zero_values,
            })
            .collect())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Fit a regression line to every non-empty series.
    pub regression: bool,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Load every source in order and compute its statistics.
///
/// The output has exactly one report per source, in input order. Only an
/// unreadable source aborts the run.
pub fn aggregate(sources: &[SourceSpec], options: AggregateOptions) -> Result<Vec<SeriesReport>> {
    sources
        .iter()
        .map(|spec| aggregate_one(spec, options))
        .collect()
}

fn aggregate_one(spec: &SourceSpec, options: AggregateOptions) -> Result<SeriesReport> {
    let loader = SeriesLoader::open(&spec.path)?;
    let mut records = loader.records()?;

    let mut points = Vec::new();
    for record in records.by_ref() {
        let record = record?;
        let y = spec.conversion.apply(record.value);
        if spec.drop_zero_values && y == 0.0 {
            continue;
        }
        points.push((record.minutes(), y));
    }

    let default_label = match records.default_label() {
        Some(label) => label.to_string(),
        None => file_stem(&spec.path),
    };
    let series = Series {
        label: resolve(spec.override_label.as_deref(), &default_label),
        default_label,
        points,
    };

    let summary = match summarize(&series.ys()) {
        Ok(summary) => Some(summary),
        Err(PipelineError::EmptyInput) => {
            log::warn!("{}: no usable data points", spec.path.display());
            None
        }
        Err(e) => return Err(e),
    };

    log::info!(
        "{}: {} points as '{}' ({} rows skipped)",
        spec.path.display(),
        series.len(),
        series.label,
        records.skipped()
    );

    let mut report = SeriesReport {
        path: spec.path.clone(),
        series,
        summary,
        fit: None,
        skipped_rows: records.skipped(),
    };
    if options.regression {
        attach_fit(&mut report);
    }
    Ok(report)
}

/// Fit a regression line to a non-empty report that does not have one yet.
///
/// Regression errors only leave `fit` empty; the series and summary stand.
pub fn attach_fit(report: &mut SeriesReport) {
    if report.fit.is_some() || report.is_empty() {
        return;
    }
    match fit_linear(&report.series.xs(), &report.series.ys()) {
        Ok(fit) => report.fit = Some(fit),
        Err(e) => log::warn!("{}: no regression line: {e}", report.path.display()),
    }
}

fn file_stem(path: &std::path::Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;
    use crate::data::units::SizeUnit;

    fn write_log(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn preserves_source_order() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            write_log(&dir, "A.csv", "0,zeta,1\n"),
            write_log(&dir, "B.csv", "0,alpha,2\n"),
            write_log(&dir, "C.csv", "0,mid,3\n"),
        ];
        let specs = SourceSpec::batch(&paths, None, Conversion::default(), false).unwrap();
        let reports = aggregate(&specs, AggregateOptions::default()).unwrap();

        let labels: Vec<_> = reports.iter().map(|r| r.series.label.as_str()).collect();
        assert_eq!(labels, ["zeta", "alpha", "mid"]);
        let out_paths: Vec<_> = reports.iter().map(|r| r.path.clone()).collect();
        assert_eq!(out_paths, paths);
    }

    #[test]
    fn overrides_are_applied_in_order() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            write_log(&dir, "a.csv", "0,x,1\n"),
            write_log(&dir, "b.csv", "0,y,1\n"),
        ];
        let labels = vec!["first".to_string(), "second".to_string()];
        let specs = SourceSpec::batch(&paths, Some(&labels), Conversion::default(), false).unwrap();
        let reports = aggregate(&specs, AggregateOptions::default()).unwrap();

        assert_eq!(reports[0].series.label, "first");
        assert_eq!(reports[0].series.default_label, "x");
        assert_eq!(reports[1].series.label, "second");
    }

    #[test]
    fn label_mismatch_is_rejected_up_front() {
        let paths = vec![PathBuf::from("missing-1.csv"), PathBuf::from("missing-2.csv")];
        let labels = vec!["only".to_string()];
        let err = SourceSpec::batch(&paths, Some(&labels), Conversion::default(), false).unwrap_err();
        assert!(matches!(err, PipelineError::LabelCountMismatch { .. }));
    }

    #[test]
    fn converts_units_and_time_axis() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "bytes.csv", "60000,Size,1048576\n120000,Size,2097152\n");
        let conversion = Conversion::Size {
            from: SizeUnit::Bytes,
            to: SizeUnit::MiB,
        };
        let specs = SourceSpec::batch(&[path], None, conversion, false).unwrap();
        let reports = aggregate(&specs, AggregateOptions::default()).unwrap();

        assert_eq!(reports[0].series.points, vec![(1.0, 1.0), (2.0, 2.0)]);
    }

    #[test]
    fn zero_filtering_is_explicit() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "lat.csv", "0,Latency,0\n1000,Latency,2000000\n2000,Latency,0\n");

        let keep = SourceSpec::batch(&[path.clone()], None, Conversion::Latency, false).unwrap();
        let drop = SourceSpec::batch(&[path], None, Conversion::Latency, true).unwrap();

        let kept = aggregate(&keep, AggregateOptions::default()).unwrap();
        let dropped = aggregate(&drop, AggregateOptions::default()).unwrap();

        assert_eq!(kept[0].series.len(), 3);
        assert_eq!(dropped[0].series.ys(), vec![2.0]);
    }

    #[test]
    fn empty_source_is_reported_not_dropped() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            write_log(&dir, "zeros.csv", "0,Latency,0\n1,Latency,0\n"),
            write_log(&dir, "ok.csv", "0,Latency,5\n"),
        ];
        let specs = SourceSpec::batch(&paths, None, Conversion::Latency, true).unwrap();
        let reports = aggregate(&specs, AggregateOptions { regression: true }).unwrap();

        assert_eq!(reports.len(), 2);
        assert!(reports[0].is_empty());
        assert_eq!(reports[0].series.label, "Latency");
        assert!(!reports[1].is_empty());
        // A single point cannot carry a regression line.
        assert!(reports[1].fit.is_none());
    }

    #[test]
    fn regression_is_attached_when_requested() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "line.csv", "0,y,1\n60000,y,3\n120000,y,5\n");
        let specs = SourceSpec::batch(&[path], None, Conversion::default(), false).unwrap();

        let fit = aggregate(&specs, AggregateOptions { regression: true }).unwrap()[0]
            .fit
            .unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 1.0).abs() < 1e-9);
    }

    #[test]
    fn identical_timestamps_get_no_regression_line() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "burst.csv", "6000,a,1\n6000,a,5\n6000,a,2\n");
        let specs = SourceSpec::batch(&[path], None, Conversion::default(), false).unwrap();
        let reports = aggregate(&specs, AggregateOptions { regression: true }).unwrap();

        assert!(reports[0].fit.is_none());
        assert_eq!(reports[0].summary.unwrap().count, 3);
    }

    #[test]
    fn attach_fit_fills_in_later() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "line.csv", "0,y,1\n60000,y,3\n");
        let specs = SourceSpec::batch(&[path], None, Conversion::default(), false).unwrap();
        let mut reports = aggregate(&specs, AggregateOptions::default()).unwrap();
        assert!(reports[0].fit.is_none());

        attach_fit(&mut reports[0]);
        assert!((reports[0].fit.unwrap().slope - 2.0).abs() < 1e-9);
    }

    #[test]
    fn run_time_ends_at_last_kept_point() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "tail.csv", "0,a,1\n120000,a,2\n180000,a,n/a\n240000,a,0\n");
        let specs = SourceSpec::batch(&[path], None, Conversion::Latency, true).unwrap();
        let reports = aggregate(&specs, AggregateOptions::default()).unwrap();

        assert_eq!(reports[0].series.duration_minutes(), Some(2.0));
        assert_eq!(reports[0].skipped_rows, 1);
    }

    #[test]
    fn unreadable_source_aborts() {
        let specs = vec![SourceSpec::new("/no/such/log.csv")];
        let err = aggregate(&specs, AggregateOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::SourceUnreadable { .. }));
    }

    #[test]
    fn file_without_rows_falls_back_to_file_name() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "empty_run.csv", "");
        let reports = aggregate(&[SourceSpec::new(path)], AggregateOptions::default()).unwrap();
        assert_eq!(reports[0].series.label, "empty_run");
        assert!(reports[0].is_empty());
    }
}
