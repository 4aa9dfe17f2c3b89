use image::{DynamicImage, Rgba, RgbaImage};

use super::model::BinaryVector;

/// A channel at or above this value marks the pixel as background.
pub const LIGHT_THRESHOLD: u8 = 200;

// ---------------------------------------------------------------------------
// Pixel extraction
// ---------------------------------------------------------------------------

/// Threshold every pixel of `img` into one bit, row-major.
///
/// A pixel is *light* when its red **or** green channel is `>= 200`; light
/// pixels emit `0` and dark (ink) pixels emit `1`. `invert` swaps the two.
/// Blue and alpha are ignored.
pub fn extract(img: &RgbaImage, invert: bool) -> BinaryVector {
    // `pixels()` walks rows top to bottom, left to right within a row.
    let bits = img
        .pixels()
        .map(|&Rgba([r, g, _, _])| {
            let light = r >= LIGHT_THRESHOLD || g >= LIGHT_THRESHOLD;
            u8::from(light == invert)
        })
        .collect();
    BinaryVector::from_bits(bits)
}

// ---------------------------------------------------------------------------
// Offscreen render surface
// ---------------------------------------------------------------------------

/// Scratch raster that decoded images are painted onto before extraction.
///
/// One surface is reused for every item of a batch. [`RenderSurface::paint`]
/// resizes and clears it before copying, so no pixel of a previous image can
/// leak into the next extraction.
#[derive(Debug)]
pub struct RenderSurface {
    buffer: RgbaImage,
}

impl Default for RenderSurface {
    fn default() -> Self {
        Self {
            buffer: RgbaImage::new(0, 0),
        }
    }
}

impl RenderSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repaint the whole surface with `img`.
    ///
    /// The surface starts out transparent black, like a freshly sized canvas,
    /// so fully transparent source pixels read back as `(0, 0, 0, 0)`.
    pub fn paint(&mut self, img: &DynamicImage) {
        let src = img.to_rgba8();
        let (w, h) = src.dimensions();
        if self.buffer.dimensions() != (w, h) {
            self.buffer = RgbaImage::new(w, h);
        }
        for (dst, px) in self.buffer.pixels_mut().zip(src.pixels()) {
            *dst = if px[3] == 0 { Rgba([0, 0, 0, 0]) } else { *px };
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// Extract the current contents.
    pub fn extract(&self, invert: bool) -> BinaryVector {
        extract(&self.buffer, invert)
    }
}
