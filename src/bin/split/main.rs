//! Split images into tiles
//!
//! # Usage
//!
//! split [--input-dir images] [--output-dir output] [--all | --image NAME] [--size WxH | --ratio W:H]
//!
//! Anything not given as a flag is asked for interactively.

mod error;
mod prompt;

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use clap::Parser;
use console::style;
use dialoguer::theme::ColorfulTheme;

use splitter::config::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR};
use splitter::core::MIN_PIECE_FRACTION;
use splitter::input::{parse_ratio, parse_size};
use splitter::library::{self, file_name, ImageDescriptor, SUPPORTED_EXTENSIONS};
use splitter::logging::init_logging;
use splitter::{
    split_images, Config, ImageReport, RatioSpec, RunSummary, SplitError, SplitSpec, TileSpec,
};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "split")]
#[command(about = "Cut images into tiles by pixel size or aspect ratio", long_about = None)]
struct Args {
    /// Folder holding the source images
    #[arg(long, default_value = DEFAULT_INPUT_DIR)]
    input_dir: PathBuf,

    /// Folder the tiles are written under, one subfolder per image
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Split every image without asking
    #[arg(long, conflicts_with = "image")]
    all: bool,

    /// Split only the image with this file name
    #[arg(long)]
    image: Option<String>,

    /// Piece size in pixels, e.g. 640x480
    #[arg(long, value_parser = parse_size, conflicts_with = "ratio")]
    size: Option<TileSpec>,

    /// Piece aspect ratio, e.g. 16:9
    #[arg(long, value_parser = parse_ratio)]
    ratio: Option<RatioSpec>,

    /// Share of a full piece a leftover strip needs to be kept (ratio mode)
    #[arg(long, default_value_t = MIN_PIECE_FRACTION)]
    min_piece_fraction: f64,

    /// More diagnostic output on stderr (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        e.exit();
    }
}

fn run(args: Args) -> Result<(), CliError> {
    init_logging(args.verbose).map_err(|e| CliError::LoggingInit(e.to_string()))?;
    let config = Config::new(&args.input_dir, &args.output_dir);

    print_banner();

    let images = match library::find_images(&config.input_dir) {
        Ok(images) => images,
        Err(SplitError::MissingDirectory(dir)) => return create_input_dir(&dir),
        Err(e) => return Err(CliError::Input(e)),
    };

    if images.is_empty() {
        println!(
            "{}",
            style(format!("No images found in '{}'!", config.input_dir.display())).red()
        );
        println!(
            "Put images ({}) in that folder first.",
            SUPPORTED_EXTENSIONS.join(", ").to_uppercase()
        );
        return Ok(());
    }

    print_images(&images);

    let theme = ColorfulTheme::default();
    let selected = match (&args.image, args.all) {
        (Some(name), _) => vec![library::find_by_name(&images, name)
            .ok_or_else(|| CliError::UnknownImage(name.clone()))?
            .clone()],
        (None, true) => images.clone(),
        (None, false) => prompt::select_images(&theme, &images)?,
    };

    let spec = match (args.size, args.ratio) {
        (Some(size), _) => SplitSpec::Pixel(size),
        (None, Some(ratio)) => {
            SplitSpec::Ratio(ratio.with_min_piece_fraction(args.min_piece_fraction))
        }
        (None, None) => prompt::choose_spec(&theme, args.min_piece_fraction)?,
    };

    println!();
    println!("Selected mode: {}", style(spec).cyan());
    println!();
    println!("Processing {} image(s)...", selected.len());
    println!("{}", "=".repeat(50));

    let summary = split_images(&config, &selected, &spec, |source, result| {
        print_outcome(&spec, source, result)
    })
    .map_err(CliError::Split)?;

    print_summary(&summary, &config);
    Ok(())
}

/// Create the missing input folder and tell the user what to do next.
fn create_input_dir(dir: &Path) -> Result<(), CliError> {
    println!(
        "{}",
        style(format!("Folder '{}' not found!", dir.display())).red()
    );
    create_dir_all(dir).map_err(|source| {
        CliError::Input(SplitError::CreateDirectory {
            path: dir.into(),
            source,
        })
    })?;
    println!("{} Created folder '{}'.", style("✓").green(), dir.display());
    println!("Put the images you want to split in it, then run again.");
    Ok(())
}

fn print_banner() {
    println!("{}", style("IMAGE SPLITTER").bold().cyan());
    println!("{}", "=".repeat(50));
    println!("Cuts images into smaller pieces by pixel size or aspect ratio.");
}

fn print_images(images: &[PathBuf]) {
    println!();
    println!("Available images:");
    println!("{}", "-".repeat(40));
    for (i, path) in images.iter().enumerate() {
        match ImageDescriptor::probe(path) {
            Ok(d) => println!("{}. {} ({}x{}px)", i + 1, file_name(path), d.width, d.height),
            Err(_) => println!("{}. {} (dimensions unavailable)", i + 1, file_name(path)),
        }
    }
    println!();
}

fn print_outcome(spec: &SplitSpec, source: &Path, result: &splitter::Result<ImageReport>) {
    println!();
    println!("Processing: {}", style(file_name(source)).bold());

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            println!("   {} Error processing image: {}", style("✗").red(), e);
            return;
        }
    };

    let (width, height) = report.descriptor.dimensions();
    let grid = &report.grid;
    println!("   Original size: {}x{}px", width, height);
    if let SplitSpec::Ratio(ratio) = spec {
        println!("   Original ratio: {:.2}:1", f64::from(width) / f64::from(height));
        println!(
            "   Target ratio: {:?}:{:?} = {:.2}:1",
            ratio.ratio_w,
            ratio.ratio_h,
            ratio.target_ratio()
        );
        println!("   Piece size: {}x{}px", grid.piece.0, grid.piece.1);
    }
    println!(
        "   Grid: {} columns x {} rows = {} pieces",
        grid.cols,
        grid.rows,
        grid.positions()
    );

    for (i, tile) in report.tiles.iter().enumerate() {
        let name = file_name(&tile.path);
        match &tile.error {
            None => {
                println!(
                    "   {} Piece {}/{}: {} ({})",
                    style("✓").green(),
                    i + 1,
                    report.attempted(),
                    name,
                    tile_size(spec, tile.cell.area.dimensions())
                );
            }
            Some(e) => println!("   {} Piece {}: {}", style("✗").red(), i + 1, e),
        }
    }

    println!(
        "   Done! {} pieces saved in: {}",
        report.written(),
        report.dest.display()
    );
}

/// Tile size for the report; ratio mode adds the actual aspect.
fn tile_size(spec: &SplitSpec, (w, h): (u32, u32)) -> String {
    match spec {
        SplitSpec::Pixel(_) => format!("{}x{}px", w, h),
        SplitSpec::Ratio(_) => format!("{}x{}px, {:.2}:1", w, h, f64::from(w) / f64::from(h)),
    }
}

fn print_summary(summary: &RunSummary, config: &Config) {
    println!();
    println!("{}", "=".repeat(50));
    println!("{}", style("RESULT SUMMARY").bold());
    println!(
        "{} Succeeded: {}/{} images",
        style("✓").green(),
        summary.succeeded,
        summary.selected
    );
    if summary.succeeded > 0 {
        println!("Results saved in folder: {}", config.output_dir.display());
    }
}
