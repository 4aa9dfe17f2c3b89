use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::source::sources_from_paths;
use crate::state::{AppState, BatchTarget, ClassifierStatus, LoadedSet};
use crate::ui::board::BoardView;
use crate::ui::{plot, results};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open training images…").clicked() {
                open_files_dialog(state, BatchTarget::Training);
                ui.close_menu();
            }
            if ui.button("Open test images…").clicked() {
                open_files_dialog(state, BatchTarget::Testing);
                ui.close_menu();
            }
        });

        ui.separator();

        let count = |set: &Option<LoadedSet>| set.as_ref().map_or(0, |s| s.dataset.len());
        ui.label(format!(
            "{} training / {} test samples",
            count(&state.training_set),
            count(&state.test_set)
        ));

        ui.separator();

        let (text, color) = match state.classifier_status {
            ClassifierStatus::Untrained => ("untrained", Color32::GRAY),
            ClassifierStatus::Trained => ("trained", Color32::GREEN),
            ClassifierStatus::Stale => ("needs retraining", Color32::YELLOW),
        };
        ui.label(RichText::new(text).color(color));
        if state.classifier_status != ClassifierStatus::Untrained {
            ui.label(format!("classes: {}", state.labels().join(", ")));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – settings, datasets
// ---------------------------------------------------------------------------

/// Render the left settings panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, files_hovering: bool) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Settings");
            ui.separator();
            settings_form(ui, state);

            ui.add_space(8.0);
            ui.horizontal(|ui: &mut Ui| {
                let can_train = state.training_set.is_some() && !state.is_busy();
                if ui.add_enabled(can_train, egui::Button::new("Train")).clicked() {
                    state.train();
                }
                let can_test = state.test_set.is_some()
                    && state.classifier_status == ClassifierStatus::Trained
                    && !state.is_busy();
                if ui.add_enabled(can_test, egui::Button::new("Test")).clicked() {
                    state.test_dataset();
                }
            });

            ui.add_space(8.0);
            ui.heading("Images");
            ui.separator();
            drop_zone(ui, state, files_hovering);

            ui.add_space(8.0);
            dataset_view(ui, "Training set", state.training_set.as_ref());
            dataset_view(ui, "Test set", state.test_set.as_ref());
        });
}

fn settings_form(ui: &mut Ui, state: &mut AppState) {
    let form = &mut state.settings;
    egui::Grid::new("settings_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("Error threshold");
            ui.text_edit_singleline(&mut form.error_threshold);
            ui.end_row();

            ui.label("Iterations");
            ui.text_edit_singleline(&mut form.iterations);
            ui.end_row();

            ui.label("Hidden layers");
            ui.text_edit_singleline(&mut form.hidden_layers)
                .on_hover_text("Comma-separated neuron counts, e.g. 32, 16");
            ui.end_row();
        });
    ui.checkbox(&mut form.use_gpu, "Use GPU");
    ui.checkbox(&mut form.invert, "Invert colours")
        .on_hover_text("Treat light pixels as ink");
}

fn drop_zone(ui: &mut Ui, state: &mut AppState, files_hovering: bool) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Dropped files go to:");
        ui.radio_value(&mut state.drop_target, BatchTarget::Training, "training");
        ui.radio_value(&mut state.drop_target, BatchTarget::Testing, "test");
    });

    let stroke_color = if files_hovering {
        Color32::LIGHT_BLUE
    } else {
        Color32::DARK_GRAY
    };
    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(2.0, stroke_color))
        .show(ui, |ui: &mut Ui| {
            ui.set_min_height(60.0);
            ui.vertical_centered(|ui: &mut Ui| {
                match state.batch_progress {
                    Some((done, total)) => {
                        let fraction = if total == 0 { 1.0 } else { done as f32 / total as f32 };
                        ui.add(egui::ProgressBar::new(fraction).text(format!("{done} / {total}")));
                    }
                    None if files_hovering => {
                        ui.label(format!("Release to load {} images", state.drop_target.describe()));
                    }
                    None => {
                        ui.label("Drop image files here.\nThe label is the file name up to the first '.'");
                    }
                }
            });
        });
}

fn dataset_view(ui: &mut Ui, title: &str, set: Option<&LoadedSet>) {
    let Some(set) = set else {
        return;
    };
    let labels = set.dataset.labels().join(", ");
    egui::CollapsingHeader::new(RichText::new(format!("{title}  ({})", set.dataset.len())).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if set.dataset.is_empty() {
                ui.label("(empty)");
                return;
            }
            ui.label(format!("Labels: {labels}"));
            ScrollArea::vertical()
                .id_salt(title)
                .max_height(200.0)
                .show(ui, |ui: &mut Ui| {
                    let mut text = set.json_lines.as_str();
                    ui.add(
                        egui::TextEdit::multiline(&mut text)
                            .code_editor()
                            .desired_width(f32::INFINITY),
                    );
                });
        });
}

// ---------------------------------------------------------------------------
// Central panel – drawing board and results
// ---------------------------------------------------------------------------

/// Render the drawing board, its classification, the training curve and the
/// test table.
pub fn central_panel(ui: &mut Ui, state: &mut AppState, board_view: &mut BoardView) {
    ui.horizontal_top(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.heading("Draw a glyph");
            board_view.show(ui, &mut state.board);
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Clear").clicked() {
                    state.clear_board();
                }
                let trained = state.classifier_status == ClassifierStatus::Trained;
                if ui.add_enabled(trained, egui::Button::new("Classify")).clicked() {
                    state.classify_drawing();
                }
            });
        });
        ui.add_space(16.0);
        ui.vertical(|ui: &mut Ui| {
            ui.heading("Result");
            results::drawing_scores(ui, state);
        });
    });

    ui.separator();
    ui.heading("Training");
    plot::training_plot(ui, state);

    ui.separator();
    ui.heading("Test results");
    results::test_table(ui, state);
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_files_dialog(state: &mut AppState, target: BatchTarget) {
    let files = rfd::FileDialog::new()
        .set_title(format!("Open {} images", target.describe()))
        .add_filter("Images", &["png", "jpg", "jpeg", "gif", "bmp"])
        .pick_files();

    if let Some(paths) = files {
        state.submit_batch(target, sources_from_paths(paths));
    }
}
