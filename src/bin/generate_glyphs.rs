//! Writes sample 64x64 glyph PNGs (`circle.N.png`, `cross.N.png`,
//! `line.N.png`) for trying out the trainer.

#[path = "../rng.rs"]
mod rng;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use image::{Rgba, RgbaImage};

use rng::SimpleRng;

#[derive(Parser, Debug)]
#[command(name = "generate_glyphs")]
#[command(about = "Write sample circle, cross and line glyphs as 64x64 PNGs")]
struct Args {
    /// Directory to write the PNGs into
    #[arg(default_value = "glyphs")]
    out_dir: PathBuf,

    /// Glyphs per shape
    #[arg(default_value_t = 10)]
    count: usize,
}

const SIZE: u32 = 64;
const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Clone, Copy)]
enum Shape {
    Circle,
    Cross,
    Line,
}

impl Shape {
    const ALL: [Shape; 3] = [Shape::Circle, Shape::Cross, Shape::Line];

    fn name(self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Cross => "cross",
            Shape::Line => "line",
        }
    }
}

/// Ink a disc of radius `r` centred at `(cx, cy)`.
fn dab(img: &mut RgbaImage, cx: f64, cy: f64, r: f64) {
    let lo_x = (cx - r).floor().max(0.0) as u32;
    let lo_y = (cy - r).floor().max(0.0) as u32;
    let hi_x = ((cx + r).ceil() as u32).min(SIZE - 1);
    let hi_y = ((cy + r).ceil() as u32).min(SIZE - 1);
    for y in lo_y..=hi_y {
        for x in lo_x..=hi_x {
            let (dx, dy) = (x as f64 + 0.5 - cx, y as f64 + 0.5 - cy);
            if dx * dx + dy * dy <= r * r {
                img.put_pixel(x, y, INK);
            }
        }
    }
}

fn segment(img: &mut RgbaImage, from: (f64, f64), to: (f64, f64), r: f64) {
    let steps = ((to.0 - from.0).hypot(to.1 - from.1) / (r * 0.5)).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        dab(img, from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t, r);
    }
}

fn draw(shape: Shape, rng: &mut SimpleRng) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(SIZE, SIZE, PAPER);
    let c = SIZE as f64 / 2.0;
    let (jx, jy) = (rng.range(-6.0, 6.0), rng.range(-6.0, 6.0));
    let r = rng.range(1.5, 3.0);

    match shape {
        Shape::Circle => {
            let radius = rng.range(14.0, 22.0);
            let steps = 96;
            for i in 0..steps {
                let a0 = i as f64 / steps as f64 * std::f64::consts::TAU;
                let a1 = (i + 1) as f64 / steps as f64 * std::f64::consts::TAU;
                segment(
                    &mut img,
                    (c + jx + radius * a0.cos(), c + jy + radius * a0.sin()),
                    (c + jx + radius * a1.cos(), c + jy + radius * a1.sin()),
                    r,
                );
            }
        }
        Shape::Cross => {
            let half = rng.range(14.0, 22.0);
            segment(&mut img, (c + jx - half, c + jy - half), (c + jx + half, c + jy + half), r);
            segment(&mut img, (c + jx - half, c + jy + half), (c + jx + half, c + jy - half), r);
        }
        Shape::Line => {
            let half = rng.range(16.0, 26.0);
            let tilt = rng.range(-6.0, 6.0);
            segment(&mut img, (c + jx - tilt, c + jy - half), (c + jx + tilt, c + jy + half), r);
        }
    }
    img
}

fn write_glyphs(out_dir: &Path, count: usize) -> Result<usize> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let mut written = 0;
    for shape in Shape::ALL {
        for n in 1..=count {
            let path = out_dir.join(format!("{}.{n}.png", shape.name()));
            draw(shape, &mut rng)
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            written += 1;
        }
    }
    Ok(written)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let written = write_glyphs(&args.out_dir, args.count)?;
    println!("Wrote {written} glyphs to {}", args.out_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_leaves_ink_on_paper() {
        let mut rng = SimpleRng::new(3);
        for shape in Shape::ALL {
            let img = draw(shape, &mut rng);
            let ink = img.pixels().filter(|p| **p == INK).count();
            assert!(ink > 50, "{} has only {ink} ink pixels", shape.name());
            assert!(ink < (SIZE * SIZE / 2) as usize);
        }
    }

    #[test]
    fn output_dir_and_count_default() {
        let args = Args::try_parse_from(["generate_glyphs"]).unwrap();
        assert_eq!(args.out_dir, PathBuf::from("glyphs"));
        assert_eq!(args.count, 10);

        let args = Args::try_parse_from(["generate_glyphs", "out", "3"]).unwrap();
        assert_eq!(args.out_dir, PathBuf::from("out"));
        assert_eq!(args.count, 3);

        assert!(Args::try_parse_from(["generate_glyphs", "out", "many"]).is_err());
    }

    #[test]
    fn writes_every_shape_count_times() {
        let dir = std::env::temp_dir().join(format!("generate-glyphs-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(write_glyphs(&dir, 2).unwrap(), 6);
        assert!(dir.join("circle.2.png").is_file());
        assert!(dir.join("line.1.png").is_file());
        assert!(!dir.join("cross.3.png").exists());
    }
}
