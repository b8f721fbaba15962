use eframe::egui;

use pdh_reader::PdhReader;

use crate::state::AppState;
use crate::ui::{details, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct PdhViewerApp {
    pub state: AppState,
}

impl PdhViewerApp {
    /// Start on the default data directory when it exists.
    pub fn new() -> Self {
        let mut state = AppState::default();
        match PdhReader::open_default() {
            Ok(reader) => state.set_reader(reader),
            Err(e) => log::debug!("No default data directory: {e}"),
        }
        Self { state }
    }
}

impl eframe::App for PdhViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: file list ----
        egui::SidePanel::left("file_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: data table / metadata of the focused file ----
        egui::TopBottomPanel::bottom("details_panel")
            .default_height(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                details::details_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::curve_plot(ui, &self.state);
        });
    }
}
