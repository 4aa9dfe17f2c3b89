use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Classification of the drawing
// ---------------------------------------------------------------------------

/// Scores of the last board classification, best first.
pub fn drawing_scores(ui: &mut Ui, state: &AppState) {
    let Some(result) = &state.drawing_result else {
        return;
    };
    ui.label(
        RichText::new(format!(
            "{}  ({:.1}%)",
            result.label,
            result.confidence * 100.0
        ))
        .heading()
        .color(state.label_colors.color_for(&result.label)),
    );
    for (label, score) in &result.scores {
        ui.horizontal(|ui: &mut Ui| {
            ui.label(RichText::new(label).color(state.label_colors.color_for(label)));
            ui.add(egui::ProgressBar::new(*score as f32).desired_width(160.0));
        });
    }

    if let Some(vector) = state.test_vector.as_ref().filter(|v| !v.is_empty()) {
        egui::CollapsingHeader::new(format!(
            "Captured vector ({} bits, {} inked)",
            vector.len(),
            vector.ones()
        ))
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new(vector_art(vector.bits())).monospace().size(6.0));
        });
    }
}

/// Render a square bit vector as text, one row per line.
fn vector_art(bits: &[u8]) -> String {
    if bits.is_empty() {
        return String::new();
    }
    let side = (bits.len() as f64).sqrt() as usize;
    let width = if side * side == bits.len() { side } else { bits.len() };
    bits.chunks(width)
        .map(|row| row.iter().map(|&b| if b == 1 { '█' } else { '·' }).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Test-set table
// ---------------------------------------------------------------------------

/// One row per test sample: expected, predicted, confidence.
pub fn test_table(ui: &mut Ui, state: &AppState) {
    if state.test_results.is_empty() {
        ui.label("No test run yet.");
        return;
    }
    if let Some(acc) = state.test_accuracy() {
        ui.strong(format!("Accuracy: {:.1}%", acc * 100.0));
    }

    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(220.0)
        .column(Column::auto())
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("#");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Expected");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Predicted");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Confidence");
            });
        })
        .body(|mut body| {
            for (i, r) in state.test_results.iter().enumerate() {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(i.to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(RichText::new(&r.expected).color(state.label_colors.color_for(&r.expected)));
                    });
                    row.col(|ui: &mut Ui| {
                        let color = if r.is_correct() { Color32::GREEN } else { Color32::RED };
                        ui.label(RichText::new(&r.predicted).color(color));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.1}%", r.confidence * 100.0));
                    });
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::vector_art;

    #[test]
    fn square_vectors_render_as_rows() {
        assert_eq!(vector_art(&[1, 0, 0, 1]), "█·\n·█");
        assert_eq!(vector_art(&[]), "");
    }

    #[test]
    fn non_square_vectors_render_on_one_line() {
        assert_eq!(vector_art(&[1, 0, 1]), "█·█");
    }
}
