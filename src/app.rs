use eframe::egui;

use crate::data::source::sources_from_dropped;
use crate::state::AppState;
use crate::ui::board::BoardView;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct GlyphTrainerApp {
    pub state: AppState,
    board_view: BoardView,
}

impl eframe::App for GlyphTrainerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Dropped files become a batch ----
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if !dropped.is_empty() {
            let target = self.state.drop_target;
            self.state.submit_batch(target, sources_from_dropped(&dropped));
        }
        let files_hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());

        // ---- One batch item per frame ----
        if self.state.poll_batch() {
            ctx.request_repaint();
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: settings and datasets ----
        egui::SidePanel::left("settings_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, files_hovering);
            });

        // ---- Central panel: board and results ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::central_panel(ui, &mut self.state, &mut self.board_view);
        });
    }
}
