use image::{Rgba, RgbaImage};

use crate::data::extract::extract;
use crate::data::model::BinaryVector;

/// Side length of the drawing board, in pixels.
pub const BOARD_SIZE: u32 = 64;
/// Radius of the round brush, in board pixels.
pub const BRUSH_RADIUS: f32 = 2.0;

const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);
const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

// ---------------------------------------------------------------------------
// Drawing board
// ---------------------------------------------------------------------------

/// The 64x64 surface glyphs are sketched on: black ink on white paper.
#[derive(Debug, Clone)]
pub struct DrawingBoard {
    pixels: RgbaImage,
    revision: u64,
}

impl Default for DrawingBoard {
    fn default() -> Self {
        Self {
            pixels: RgbaImage::from_pixel(BOARD_SIZE, BOARD_SIZE, PAPER),
            revision: 0,
        }
    }
}

impl DrawingBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped on every mutation; lets the UI know when to re-upload.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Back to blank paper.
    pub fn clear(&mut self) {
        for px in self.pixels.pixels_mut() {
            *px = PAPER;
        }
        self.revision += 1;
    }

    /// Ink a round-brush segment between two board coordinates.
    pub fn stroke(&mut self, from: (f32, f32), to: (f32, f32)) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let len = (dx * dx + dy * dy).sqrt();
        let steps = (len / (BRUSH_RADIUS * 0.5)).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.dab(from.0 + dx * t, from.1 + dy * t);
        }
        self.revision += 1;
    }

    fn dab(&mut self, cx: f32, cy: f32) {
        let r = BRUSH_RADIUS;
        let max = BOARD_SIZE as f32 - 1.0;
        let x0 = (cx - r).floor().clamp(0.0, max) as u32;
        let x1 = (cx + r).ceil().clamp(0.0, max) as u32;
        let y0 = (cy - r).floor().clamp(0.0, max) as u32;
        let y1 = (cy + r).ceil().clamp(0.0, max) as u32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (px, py) = (x as f32 + 0.5 - cx, y as f32 + 0.5 - cy);
                if px * px + py * py <= r * r {
                    self.pixels.put_pixel(x, y, INK);
                }
            }
        }
    }

    /// A stable copy of the current bitmap.
    pub fn capture(&self) -> RgbaImage {
        self.pixels.clone()
    }
}

/// Snapshot the board and extract the snapshot, so later strokes cannot
/// reach the vector.
pub fn capture_vector(board: &DrawingBoard, invert: bool) -> BinaryVector {
    let snapshot = board.capture();
    extract(&snapshot, invert)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_board_is_all_background() {
        let board = DrawingBoard::new();
        let v = capture_vector(&board, false);
        assert_eq!(v.len(), 4096);
        assert_eq!(v.ones(), 0);
        assert_eq!(capture_vector(&board, true).ones(), 4096);
    }

    #[test]
    fn stroke_inks_pixels_along_the_segment() {
        let mut board = DrawingBoard::new();
        board.stroke((10.0, 32.0), (50.0, 32.0));
        let v = capture_vector(&board, false);
        assert!(v.ones() > 40);
        // Midpoint of the segment is inked, a far corner is not.
        assert_eq!(v.bits()[32 * 64 + 30], 1);
        assert_eq!(v.bits()[0], 0);
    }

    #[test]
    fn strokes_near_the_edge_stay_in_bounds() {
        let mut board = DrawingBoard::new();
        board.stroke((-5.0, -5.0), (0.0, 0.0));
        board.stroke((63.9, 63.9), (70.0, 70.0));
        let v = capture_vector(&board, false);
        assert_eq!(v.bits()[0], 1);
        assert_eq!(v.bits()[4095], 1);
    }

    #[test]
    fn capture_is_a_snapshot() {
        let mut board = DrawingBoard::new();
        let before = board.capture();
        board.stroke((5.0, 5.0), (6.0, 6.0));
        assert_eq!(extract(&before, false).ones(), 0);
    }

    #[test]
    fn clear_resets_ink_and_bumps_revision() {
        let mut board = DrawingBoard::new();
        board.stroke((20.0, 20.0), (40.0, 40.0));
        let rev = board.revision();
        board.clear();
        assert!(board.revision() > rev);
        assert_eq!(capture_vector(&board, false).ones(), 0);
    }
}
