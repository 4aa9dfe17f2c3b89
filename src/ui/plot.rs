use eframe::egui::{Color32, Ui};
use egui_plot::{HLine, Legend, Line, Plot, PlotPoints};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Training error plot
// ---------------------------------------------------------------------------

/// Error curve of the last training run, with the stopping threshold.
pub fn training_plot(ui: &mut Ui, state: &AppState) {
    let Some(stats) = &state.training_stats else {
        ui.label("Not trained yet.");
        return;
    };

    let points: PlotPoints = stats
        .error_history
        .iter()
        .map(|&(i, e)| [i as f64, e])
        .collect();

    let threshold = stats.error_threshold;

    Plot::new("training_error")
        .legend(Legend::default())
        .x_axis_label("Iteration")
        .y_axis_label("Error")
        .height(180.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("mean squared error")
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );
            plot_ui.hline(HLine::new(threshold).name("threshold").color(Color32::DARK_RED));
        });
}
