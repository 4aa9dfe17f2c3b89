mod app;
mod canvas;
mod classifier;
mod color;
mod data;
mod rng;
mod settings;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::GlyphTrainerApp;
use clap::{Parser, Subcommand};
use eframe::egui;

#[derive(Parser, Debug)]
#[command(name = "glyph-trainer")]
#[command(about = "Sketch glyphs, build labeled datasets from images and train a classifier")]
struct Cli {
    /// Without a command the desktop app starts.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Build a dataset from image files and print it as JSON lines
    Dump {
        /// Treat light pixels as ink
        #[arg(long)]
        invert: bool,
        /// Image files, labeled by their name up to the first '.'
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Some(Command::Dump { invert, files }) => {
            print!("{}", dump_json_lines(files, invert)?);
            Ok(())
        }
        None => run_gui(),
    }
}

fn run_gui() -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([700.0, 500.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Glyph Trainer",
        options,
        Box::new(|_cc| Ok(Box::new(GlyphTrainerApp::default()))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

/// Run the files through the batch processor and render the dataset as
/// JSON lines.
fn dump_json_lines(files: Vec<PathBuf>, invert: bool) -> Result<String> {
    let dataset = data::batch::run(data::source::sources_from_paths(files), invert)
        .context("building dataset")?;
    log::info!("Dumping {} samples ({})", dataset.len(), dataset.labels().join(", "));
    dataset.to_json_lines().context("serializing dataset")
}
