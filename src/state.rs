use std::path::Path;

use anyhow::{Context, Result};
use bench_panda::data::aggregate::{aggregate, attach_fit, AggregateOptions, SourceSpec};
use bench_panda::render::PlotDocument;

use crate::color::SeriesColors;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct AppState {
    pub document: PlotDocument,

    /// Per-series visibility, parallel to `document.reports`.
    pub visible: Vec<bool>,

    /// One colour per series, in source order.
    pub colors: SeriesColors,

    /// How files added from the File menu are read.
    pub template: SourceSpec,
    pub options: AggregateOptions,

    /// Draw regression lines for series that have one.
    pub show_regression: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(document: PlotDocument, template: SourceSpec, options: AggregateOptions) -> Self {
        let n = document.reports.len();
        Self {
            document,
            visible: vec![true; n],
            colors: SeriesColors::new(n),
            template,
            options,
            show_regression: options.regression,
            status_message: None,
        }
    }

    /// Load another log and append it after the existing series.
    pub fn add_source(&mut self, path: &Path) -> Result<()> {
        let spec = SourceSpec {
            path: path.to_path_buf(),
            override_label: None,
            ..self.template.clone()
        };
        let mut reports = aggregate(std::slice::from_ref(&spec), self.options)
            .with_context(|| format!("loading {}", path.display()))?;
        self.document.reports.append(&mut reports);
        self.visible.push(true);
        self.colors = SeriesColors::new(self.document.reports.len());
        self.status_message = None;
        Ok(())
    }

    /// Turn regression overlays on or off. Switching on fits every series
    /// loaded without one, and sources added later are fitted on load.
    pub fn set_regression(&mut self, on: bool) {
        self.show_regression = on;
        self.options.regression = on;
        if on {
            self.document.reports.iter_mut().for_each(attach_fit);
        }
    }

    /// Indices of series currently shown, in source order.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.visible
            .iter()
            .enumerate()
            .filter(|&(_, &shown)| shown)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn select_all(&mut self) {
        self.visible.iter_mut().for_each(|v| *v = true);
    }

    pub fn select_none(&mut self) {
        self.visible.iter_mut().for_each(|v| *v = false);
    }
}

#[cfg(test)]
mod tests {
    use bench_panda::render::PlotKind;
    use std::io::Write;

    use super::*;

    fn empty_state() -> AppState {
        let doc = PlotDocument::time_series("t".into(), "y".into(), PlotKind::Scatter, Vec::new());
        AppState::new(doc, SourceSpec::new(""), AggregateOptions::default())
    }

    #[test]
    fn added_sources_are_appended_and_visible() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0,Added,1").unwrap();

        let mut state = empty_state();
        state.add_source(file.path()).unwrap();
        state.add_source(file.path()).unwrap();

        assert_eq!(state.document.reports.len(), 2);
        assert_eq!(state.visible_indices(), vec![0, 1]);
        assert_eq!(state.colors.len(), 2);

        state.visible[0] = false;
        assert_eq!(state.visible_indices(), vec![1]);
        state.select_none();
        assert!(state.visible_indices().is_empty());
        state.select_all();
        assert_eq!(state.visible_indices().len(), 2);
    }

    #[test]
    fn enabling_regression_fits_loaded_and_new_sources() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0,Added,1\n60000,Added,3").unwrap();

        let mut state = empty_state();
        state.add_source(file.path()).unwrap();
        assert!(state.document.reports[0].fit.is_none());

        state.set_regression(true);
        assert!(state.show_regression);
        let fit = state.document.reports[0].fit.unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);

        state.add_source(file.path()).unwrap();
        assert!(state.document.reports[1].fit.is_some());

        state.set_regression(false);
        assert!(!state.show_regression);
    }

    #[test]
    fn unreadable_source_leaves_state_untouched() {
        let mut state = empty_state();
        assert!(state.add_source(Path::new("/no/such.csv")).is_err());
        assert!(state.document.reports.is_empty());
        assert!(state.visible.is_empty());
    }
}
