use bench_panda::data::model::SeriesReport;
use bench_panda::render::PlotKind;
use eframe::egui::{Stroke, Ui};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points};

use crate::color::REGRESSION_COLOR;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Benchmark plot (central panel)
// ---------------------------------------------------------------------------

/// Render the comparison plot in the central panel.
pub fn benchmark_plot(ui: &mut Ui, state: &AppState) {
    let doc = &state.document;

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(doc.title.as_str());
    });

    if doc.reports.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a benchmark log to plot it  (File → Open…)");
        });
        return;
    }

    let x_label = match doc.kind {
        PlotKind::Box => "",
        _ => doc.x_label.as_str(),
    };

    Plot::new("benchmark_plot")
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(doc.y_label.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (slot, idx) in state.visible_indices().into_iter().enumerate() {
                let report = &doc.reports[idx];
                let color = state.colors.color_for(idx);
                let name = report.series.label.as_str();

                match doc.kind {
                    PlotKind::Scatter => {
                        let points: PlotPoints = report.series.points.iter().map(|&(x, y)| [x, y]).collect();
                        plot_ui.points(Points::new(points).name(name).color(color).radius(1.0));
                    }
                    PlotKind::Line => {
                        let points: PlotPoints = report.series.points.iter().map(|&(x, y)| [x, y]).collect();
                        plot_ui.line(Line::new(points).name(name).color(color).width(1.5));
                    }
                    PlotKind::Box => {
                        if let Some(elem) = box_elem(report, slot as f64 + 1.0) {
                            let elem = elem.fill(color.linear_multiply(0.3)).stroke(Stroke::new(1.5, color));
                            plot_ui.box_plot(BoxPlot::new(vec![elem]).name(name));
                        }
                    }
                }

                if state.show_regression && doc.kind != PlotKind::Box {
                    if let Some(line) = regression_line(report) {
                        plot_ui.line(line);
                    }
                }
            }
        });
}

/// Straight fit line across the series' x range.
fn regression_line(report: &SeriesReport) -> Option<Line> {
    let fit = report.fit?;
    let (lo, hi) = report.series.x_range()?;
    let points = PlotPoints::from(vec![[lo, fit.predict(lo)], [hi, fit.predict(hi)]]);
    Some(
        Line::new(points)
            .name(format!("{} fit", report.series.label))
            .color(REGRESSION_COLOR)
            .width(1.5),
    )
}

/// Box with whiskers at the most extreme values within 1.5 IQR of the box.
fn box_elem(report: &SeriesReport, position: f64) -> Option<BoxElem> {
    let s = report.summary?;
    let lo_fence = s.q1 - 1.5 * s.iqr;
    let hi_fence = s.q3 + 1.5 * s.iqr;
    let inside = report
        .series
        .points
        .iter()
        .map(|&(_, y)| y)
        .filter(|&y| y >= lo_fence && y <= hi_fence);
    let (lower, upper) = inside.fold((s.q1, s.q3), |(lo, hi), y| (lo.min(y), hi.max(y)));

    let spread = BoxSpread::new(lower, s.q1, s.median, s.q3, upper);
    Some(
        BoxElem::new(position, spread)
            .name(report.series.label.as_str())
            .box_width(0.5),
    )
}
