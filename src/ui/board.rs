use eframe::egui::{self, pos2, Color32, ColorImage, Rect, Sense, TextureHandle, TextureOptions, Ui, Vec2};

use crate::canvas::{DrawingBoard, BOARD_SIZE};

/// Screen pixels per board pixel.
const SCALE: f32 = 5.0;

// ---------------------------------------------------------------------------
// Drawing board widget
// ---------------------------------------------------------------------------

/// Screen-side companion of a [`DrawingBoard`]: owns the GPU texture and the
/// in-progress pointer stroke.
#[derive(Default)]
pub struct BoardView {
    texture: Option<TextureHandle>,
    uploaded_revision: Option<u64>,
    last_point: Option<(f32, f32)>,
}

impl BoardView {
    /// Paint the board and turn pointer drags into strokes.
    pub fn show(&mut self, ui: &mut Ui, board: &mut DrawingBoard) {
        egui::Frame::canvas(ui.style()).show(ui, |ui: &mut Ui| {
            let side = BOARD_SIZE as f32 * SCALE;
            let (response, painter) = ui.allocate_painter(Vec2::splat(side), Sense::click_and_drag());

            if response.is_pointer_button_down_on() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let point = (
                        (pos.x - response.rect.min.x) / SCALE,
                        (pos.y - response.rect.min.y) / SCALE,
                    );
                    let from = self.last_point.unwrap_or(point);
                    board.stroke(from, point);
                    self.last_point = Some(point);
                }
            } else {
                self.last_point = None;
            }

            let texture = self.texture_for(ui.ctx(), board);
            painter.image(
                texture,
                response.rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        });
    }

    /// Upload the board when it changed since the last frame.
    fn texture_for(&mut self, ctx: &egui::Context, board: &DrawingBoard) -> egui::TextureId {
        let size = [board.pixels().width() as usize, board.pixels().height() as usize];
        let stale = self.uploaded_revision != Some(board.revision());

        let id = match &mut self.texture {
            Some(tex) => {
                if stale {
                    let image = ColorImage::from_rgba_unmultiplied(size, board.pixels().as_raw());
                    tex.set(image, TextureOptions::NEAREST);
                }
                tex.id()
            }
            None => {
                let image = ColorImage::from_rgba_unmultiplied(size, board.pixels().as_raw());
                let tex = ctx.load_texture("drawing_board", image, TextureOptions::NEAREST);
                let id = tex.id();
                self.texture = Some(tex);
                id
            }
        };
        self.uploaded_revision = Some(board.revision());
        id
    }
}
