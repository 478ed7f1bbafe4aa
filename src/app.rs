use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct EdfMarkupApp {
    pub state: AppState,
}

impl eframe::App for EdfMarkupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: load / channel / markup controls ----
        egui::SidePanel::left("control_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: interval table ----
        egui::TopBottomPanel::bottom("interval_table")
            .default_height(160.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::interval_table(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::signal_plot(ui, &self.state);
        });
    }
}
