//! Image splitter.
//!
//! Cuts source images into a grid of tiles, either of a fixed pixel size
//! or of a target aspect ratio, and saves every tile as its own file.

#![warn(missing_docs)]

pub mod config;
pub mod core;
pub mod error;
pub mod input;
pub mod library;
pub mod logging;
pub mod tiling;
pub mod writer;

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView};
use tracing::{info, warn};

pub use crate::config::Config;
pub use crate::core::{Cell, Dimensions, RatioSpec, Rectangle, SplitSpec, TileSpec};
pub use crate::error::{Result, SplitError};
pub use crate::library::ImageDescriptor;
pub use crate::tiling::{compute_rectangles, Grid};
pub use crate::writer::{Naming, TileResult, TileWriter};

/// What happened to one source image.
#[derive(Debug)]
pub struct ImageReport {
    /// Size and format of the source.
    pub descriptor: ImageDescriptor,
    /// The grid the tiles were cut from.
    pub grid: Grid,
    /// Folder holding this image's tiles.
    pub dest: PathBuf,
    /// One result per kept cell, in grid order.
    pub tiles: Vec<TileResult>,
}

impl ImageReport {
    /// Tiles that were cut and handed to the encoder.
    pub fn attempted(&self) -> usize {
        self.tiles.len()
    }

    /// Tiles that made it to disk.
    pub fn written(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_written()).count()
    }

    /// Whether every attempted tile was written.
    pub fn is_complete(&self) -> bool {
        self.written() == self.attempted()
    }
}

/// Totals over every selected image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Images the run was asked to split.
    pub selected: usize,
    /// Images split with every tile written.
    pub succeeded: usize,
}

// Public actions

/// Split a single image into tiles under `output_dir/<base name>/`.
pub fn split_image(source: &Path, output_dir: &Path, spec: &SplitSpec) -> Result<ImageReport> {
    tiling::validate(spec)?;
    let writer = TileWriter::for_source(source, output_dir, Naming::for_spec(spec))?;

    let img = load_image(source)?;
    let (width, height) = img.dimensions();
    let descriptor = ImageDescriptor {
        path: source.into(),
        width,
        height,
        format: writer.format(),
    };

    let grid = compute_rectangles(descriptor.dimensions(), spec)?;
    let tiles = writer.write(&img, &grid.cells)?;

    Ok(ImageReport {
        descriptor,
        grid,
        dest: writer.dest().into(),
        tiles,
    })
}

/// Split each image in turn, reporting every outcome to `on_image`.
///
/// A failing image never stops the run; only invalid parameters or an
/// output folder that can't be created do, and both are checked before
/// the first image is opened.
pub fn split_images<F>(
    config: &Config,
    images: &[PathBuf],
    spec: &SplitSpec,
    mut on_image: F,
) -> Result<RunSummary>
where
    F: FnMut(&Path, &Result<ImageReport>),
{
    tiling::validate(spec)?;
    create_dir_all(&config.output_dir).map_err(|source| SplitError::CreateDirectory {
        path: config.output_dir.clone(),
        source,
    })?;

    let mut summary = RunSummary {
        selected: images.len(),
        succeeded: 0,
    };

    for source in images {
        let result = split_image(source, &config.output_dir, spec);
        match &result {
            Ok(report) if report.is_complete() => {
                summary.succeeded += 1;
                info!(source = %source.display(), tiles = report.written(), "Split image");
            }
            Ok(report) => warn!(
                source = %source.display(),
                written = report.written(),
                attempted = report.attempted(),
                "Some tiles were not written"
            ),
            Err(e) => warn!(source = %source.display(), error = %e, "Image not split"),
        }
        on_image(source, &result);
    }

    Ok(summary)
}

/// Load an image from a file
fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| SplitError::Decode {
        path: path.into(),
        source,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs;
    use tempfile::TempDir;

    struct TestContext {
        _dir: TempDir,
        config: Config,
    }

    fn setup() -> TestContext {
        let dir = TempDir::new().unwrap();
        let config = Config::new(dir.path().join("images"), dir.path().join("output"));
        fs::create_dir(&config.input_dir).unwrap();
        TestContext { _dir: dir, config }
    }

    fn add_image(ctx: &TestContext, name: &str, width: u32, height: u32) -> PathBuf {
        let path = ctx.config.input_dir.join(name);
        RgbImage::from_pixel(width, height, Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();
        path
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_splits_image_by_pixels() {
        let ctx = setup();
        let source = add_image(&ctx, "test_demo.png", 800, 600);

        let report = split_image(&source, &ctx.config.output_dir, &SplitSpec::pixel(200, 150)).unwrap();

        assert_eq!(report.descriptor.dimensions(), (800, 600));
        assert_eq!(report.attempted(), 16);
        assert_eq!(report.written(), 16);
        assert_eq!(report.dest, ctx.config.output_dir.join("test_demo"));
        let names = file_names(&report.dest);
        assert_eq!(names.len(), 16);
        assert_eq!(names[0], "test_demo_row01_col01.png");
        assert_eq!(names[15], "test_demo_row04_col04.png");
        let tile = image::open(report.dest.join("test_demo_row02_col03.png")).unwrap();
        assert_eq!(tile.dimensions(), (200, 150));
    }

    #[test]
    fn test_splits_image_by_ratio() {
        let ctx = setup();
        let source = add_image(&ctx, "wide.bmp", 1000, 300);

        let report = split_image(&source, &ctx.config.output_dir, &SplitSpec::ratio(1.0, 1.0)).unwrap();

        assert_eq!(report.grid.piece, (300, 300));
        assert_eq!(
            file_names(&report.dest),
            vec![
                "wide_ratio1.0-1.0_01_01.bmp",
                "wide_ratio1.0-1.0_01_02.bmp",
                "wide_ratio1.0-1.0_01_03.bmp",
            ]
        );
    }

    #[test]
    fn test_repeated_runs_give_same_files() {
        let ctx = setup();
        let source = add_image(&ctx, "again.png", 90, 40);
        let spec = SplitSpec::pixel(25, 25);

        let first = split_image(&source, &ctx.config.output_dir, &spec).unwrap();
        let first_names = file_names(&first.dest);
        let second = split_image(&source, &ctx.config.output_dir, &spec).unwrap();

        assert_eq!(first.grid, second.grid);
        assert_eq!(first_names, file_names(&second.dest));
        assert_eq!(first_names.len(), 8);
    }

    #[test]
    fn test_invalid_spec_touches_nothing() {
        let ctx = setup();
        let source = add_image(&ctx, "a.png", 10, 10);

        let result = split_image(&source, &ctx.config.output_dir, &SplitSpec::pixel(0, 5));

        assert!(result.unwrap_err().is_invalid_argument());
        assert!(!ctx.config.output_dir.exists());
    }

    #[test]
    fn test_undecodable_image_fails_alone() {
        let ctx = setup();
        let broken = ctx.config.input_dir.join("broken.png");
        fs::write(&broken, b"nope").unwrap();
        let good = add_image(&ctx, "good.png", 20, 20);
        let mut seen = Vec::new();

        let summary = split_images(
            &ctx.config,
            &[broken.clone(), good.clone()],
            &SplitSpec::pixel(10, 10),
            |path, result| seen.push((path.to_path_buf(), result.is_ok())),
        )
        .unwrap();

        assert_eq!(summary, RunSummary { selected: 2, succeeded: 1 });
        assert_eq!(seen, vec![(broken, false), (good, true)]);
    }

    #[test]
    fn test_run_rejects_invalid_spec_before_any_image() {
        let ctx = setup();
        let source = add_image(&ctx, "a.png", 10, 10);
        let mut calls = 0;

        let result = split_images(&ctx.config, &[source], &SplitSpec::ratio(1.0, 0.0), |_, _| calls += 1);

        assert!(result.unwrap_err().is_invalid_argument());
        assert_eq!(calls, 0);
    }
}
