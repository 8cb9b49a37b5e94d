use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

/// Frames to draw before taking the screenshot, so the plot has laid out
/// its axes and legend.
const SETTLE_FRAMES: u32 = 3;

/// Where a capture run ends up; filled in by the app, read after the window
/// closes.
pub type CaptureOutcome = Rc<RefCell<Option<Result<PathBuf>>>>;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BenchPandaApp {
    pub state: AppState,
    capture: Option<Capture>,
}

struct Capture {
    path: PathBuf,
    frames: u32,
    requested: bool,
    outcome: CaptureOutcome,
}

impl BenchPandaApp {
    /// Interactive viewer with menus and the statistics panel.
    pub fn interactive(state: AppState) -> Self {
        Self { state, capture: None }
    }

    /// Draw the plot once, save it as PNG at `path`, then close.
    pub fn capture(state: AppState, path: PathBuf, outcome: CaptureOutcome) -> Self {
        Self {
            state,
            capture: Some(Capture {
                path,
                frames: 0,
                requested: false,
                outcome,
            }),
        }
    }

    fn drive_capture(&mut self, ctx: &egui::Context) {
        let Some(capture) = &mut self.capture else {
            return;
        };

        let shot = ctx.input(|i| {
            i.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(Arc::clone(image)),
                _ => None,
            })
        });

        if let Some(image) = shot {
            let result = save_png(&capture.path, &image);
            if let Err(e) = &result {
                log::error!("Failed to save plot: {e:#}");
            }
            *capture.outcome.borrow_mut() = Some(result.map(|()| capture.path.clone()));
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        capture.frames += 1;
        if !capture.requested && capture.frames >= SETTLE_FRAMES {
            capture.requested = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(Default::default()));
        }
        ctx.request_repaint();
    }
}

fn save_png(path: &Path, shot: &egui::ColorImage) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let [width, height] = shot.size;
    let bytes: Vec<u8> = shot.pixels.iter().flat_map(|c| c.to_array()).collect();
    image::save_buffer(path, &bytes, width as u32, height as u32, image::ColorType::Rgba8)
        .with_context(|| format!("writing {}", path.display()))
}

impl eframe::App for BenchPandaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.capture.is_none() {
            // ---- Top panel: menu bar ----
            egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
                panels::top_bar(ui, &mut self.state);
            });

            // ---- Left side panel: series and statistics ----
            egui::SidePanel::left("series_panel")
                .default_width(260.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::benchmark_plot(ui, &self.state);
        });

        self.drive_capture(ctx);
    }
}
