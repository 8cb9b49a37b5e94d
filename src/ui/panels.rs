use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – series and statistics
// ---------------------------------------------------------------------------

/// Render the left panel: one collapsible block per series.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Series");
    ui.separator();

    if state.document.reports.is_empty() {
        ui.label("No logs loaded.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (idx, report) in state.document.reports.iter().enumerate() {
                let color = state.colors.color_for(idx);
                let text = RichText::new(&report.series.label).strong().color(color);
                ui.checkbox(&mut state.visible[idx], text);

                egui::CollapsingHeader::new("Statistics")
                    .id_salt(("stats", idx))
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.label(RichText::new(report.path.display().to_string()).weak());
                        match &report.summary {
                            Some(summary) => {
                                ui.monospace(summary.to_string());
                            }
                            None => {
                                ui.label(RichText::new("no usable data points").color(Color32::YELLOW));
                            }
                        }
                        if let Some(fit) = &report.fit {
                            ui.monospace(fit.to_string());
                        }
                        if report.skipped_rows > 0 {
                            ui.label(format!("{} rows skipped", report.skipped_rows));
                        }
                    });
                ui.separator();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} series loaded, {} visible",
            state.document.reports.len(),
            state.visible_indices().len()
        ));

        ui.separator();

        if ui
            .selectable_label(state.show_regression, "Regression")
            .clicked()
        {
            state.set_regression(!state.show_regression);
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open benchmark log")
        .add_filter("CSV", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        match state.add_source(&path) {
            Ok(()) => {
                log::info!("Added {}", path.display());
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
