//! Cropping and saving of tiles.

use std::fs::{create_dir_all, write};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, DynamicImage, ImageEncoder, ImageFormat, ImageResult};
use tracing::{info, warn};

use crate::core::{Cell, SplitSpec};
use crate::error::{Result, SplitError};
use crate::library::{base_name, dotted_extension};

/// JPEG quality used for every tile.
pub const JPEG_QUALITY: u8 = 95;

/// How tile file names are built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Naming {
    /// `{base}_row{RR}_col{CC}{ext}`
    Grid,
    /// `{base}_ratio{W}-{H}_{RR}_{CC}{ext}`
    Ratio {
        /// Width part of the ratio.
        ratio_w: f64,
        /// Height part of the ratio.
        ratio_h: f64,
    },
}

impl Naming {
    /// The naming that goes with a splitting mode.
    pub fn for_spec(spec: &SplitSpec) -> Naming {
        match spec {
            SplitSpec::Pixel(_) => Naming::Grid,
            SplitSpec::Ratio(spec) => Naming::Ratio {
                ratio_w: spec.ratio_w,
                ratio_h: spec.ratio_h,
            },
        }
    }

    /// Name a tile by its 1-based position in the grid.
    pub fn file_name(&self, base: &str, cell: &Cell, extension: &str) -> String {
        let (row, col) = (cell.row + 1, cell.col + 1);
        match self {
            Naming::Grid => format!("{}_row{:02}_col{:02}{}", base, row, col, extension),
            // Debug keeps the fractional part, so 16 renders as "16.0"
            Naming::Ratio { ratio_w, ratio_h } => format!(
                "{}_ratio{:?}-{:?}_{:02}_{:02}{}",
                base, ratio_w, ratio_h, row, col, extension
            ),
        }
    }
}

/// The outcome of writing one tile.
#[derive(Debug)]
pub struct TileResult {
    /// The cell that was cut.
    pub cell: Cell,
    /// Where the tile was (or would have been) saved.
    pub path: PathBuf,
    /// Why the tile wasn't saved, if it wasn't.
    pub error: Option<SplitError>,
}

impl TileResult {
    /// Whether the tile is on disk.
    pub fn is_written(&self) -> bool {
        self.error.is_none()
    }
}

/// Writes the tiles of one source image into its own folder.
#[derive(Debug, Clone)]
pub struct TileWriter {
    dest: PathBuf,
    base: String,
    extension: String,
    format: ImageFormat,
    naming: Naming,
}

impl TileWriter {
    /// Prepare a writer for tiles of `source`, saved under `output_dir/<base name>`.
    pub fn for_source(source: &Path, output_dir: &Path, naming: Naming) -> Result<TileWriter> {
        let format = ImageFormat::from_path(source)
            .map_err(|_| SplitError::UnsupportedFormat(source.into()))?;
        let base = base_name(source);
        Ok(Self {
            dest: output_dir.join(&base),
            base,
            extension: dotted_extension(source),
            format,
            naming,
        })
    }

    /// Folder the tiles land in.
    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Container format of the source, reused for every tile.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Where the tile for `cell` is saved.
    pub fn tile_path(&self, cell: &Cell) -> PathBuf {
        self.dest
            .join(self.naming.file_name(&self.base, cell, &self.extension))
    }

    /// Crop and save every cell.
    ///
    /// Only failing to create the destination folder is an error; a tile
    /// that can't be saved is recorded in its result and the rest carry on.
    pub fn write(&self, img: &DynamicImage, cells: &[Cell]) -> Result<Vec<TileResult>> {
        create_dir_all(&self.dest).map_err(|source| SplitError::CreateDirectory {
            path: self.dest.clone(),
            source,
        })?;

        let results = cells
            .iter()
            .map(|cell| {
                let path = self.tile_path(cell);
                let error = self
                    .write_tile(img, cell, &path)
                    .map_err(|source| SplitError::Write {
                        path: path.clone(),
                        source,
                    })
                    .err();
                match &error {
                    None => info!(path = %path.display(), "Wrote tile"),
                    Some(e) => warn!(error = %e, "Tile not written"),
                }
                TileResult {
                    cell: *cell,
                    path,
                    error,
                }
            })
            .collect();

        Ok(results)
    }

    fn write_tile(&self, img: &DynamicImage, cell: &Cell, path: &Path) -> ImageResult<()> {
        let r = cell.area;
        let tile = img.crop_imm(r.left, r.top, r.width(), r.height());
        save(&tile, path, self.format)
    }
}

/// Save an image in the given format at the best quality the codec offers.
///
/// The file is only created once encoding has succeeded.
fn save(img: &DynamicImage, path: &Path, format: ImageFormat) -> ImageResult<()> {
    let bytes = encode(img, format)?;
    write(path, bytes)?;
    Ok(())
}

fn encode(img: &DynamicImage, format: ImageFormat) -> ImageResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    let (width, height) = (img.width(), img.height());

    match format {
        ImageFormat::Jpeg => {
            // No alpha in JPEG
            let rgb = img.to_rgb8();
            JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY).write_image(
                rgb.as_raw(),
                width,
                height,
                ColorType::Rgb8,
            )?;
        }
        ImageFormat::Png => {
            PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, FilterType::Adaptive)
                .write_image(img.as_bytes(), width, height, img.color())?;
        }
        other => img.write_to(&mut buffer, other)?,
    }

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::Rectangle;
    use image::{GenericImageView, Rgb, Rgb32FImage, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn cell(row: u32, col: u32, area: Rectangle) -> Cell {
        Cell { row, col, area }
    }

    fn quadrants() -> DynamicImage {
        let mut img = RgbaImage::from_pixel(20, 10, Rgba([255, 0, 0, 255]));
        image::imageops::overlay(&mut img, &RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 255])), 10, 0);
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_names_grid_tiles_with_padded_positions() {
        let c = cell(0, 11, Rectangle::new(0, 0, 1, 1));

        assert_eq!(Naming::Grid.file_name("photo", &c, ".png"), "photo_row01_col12.png");
    }

    #[test]
    fn test_names_ratio_tiles_with_ratio() {
        let c = cell(2, 0, Rectangle::new(0, 0, 1, 1));
        let naming = Naming::for_spec(&SplitSpec::ratio(16.0, 9.0));

        assert_eq!(naming.file_name("photo", &c, ".JPG"), "photo_ratio16.0-9.0_03_01.JPG");

        let naming = Naming::for_spec(&SplitSpec::ratio(1.5, 1.0));
        assert_eq!(naming.file_name("p", &c, ""), "p_ratio1.5-1.0_03_01");
    }

    #[test]
    fn test_writes_one_file_per_cell() {
        let out = TempDir::new().unwrap();
        let writer =
            TileWriter::for_source(Path::new("images/flag.png"), out.path(), Naming::Grid).unwrap();
        let cells = vec![
            cell(0, 0, Rectangle::new(0, 0, 10, 10)),
            cell(0, 1, Rectangle::new(10, 0, 20, 10)),
        ];

        let results = writer.write(&quadrants(), &cells).unwrap();

        assert!(results.iter().all(TileResult::is_written));
        assert_eq!(writer.dest(), out.path().join("flag"));
        let left = image::open(out.path().join("flag/flag_row01_col01.png")).unwrap();
        let right = image::open(out.path().join("flag/flag_row01_col02.png")).unwrap();
        assert_eq!(left.dimensions(), (10, 10));
        assert_eq!(left.get_pixel(5, 5), Rgba([255, 0, 0, 255]));
        assert_eq!(right.get_pixel(5, 5), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_creating_existing_folder_is_harmless() {
        let out = TempDir::new().unwrap();
        std::fs::create_dir(out.path().join("flag")).unwrap();
        let writer =
            TileWriter::for_source(Path::new("flag.png"), out.path(), Naming::Grid).unwrap();

        let results = writer
            .write(&quadrants(), &[cell(0, 0, Rectangle::new(0, 0, 20, 10))])
            .unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0].is_written());
    }

    #[test]
    fn test_writes_jpeg_from_image_with_alpha() {
        let out = TempDir::new().unwrap();
        let writer =
            TileWriter::for_source(Path::new("shot.jpg"), out.path(), Naming::Grid).unwrap();

        let results = writer
            .write(&quadrants(), &[cell(0, 0, Rectangle::new(0, 0, 8, 8))])
            .unwrap();

        assert!(results[0].is_written(), "{:?}", results[0].error);
        let tile = image::open(&results[0].path).unwrap();
        assert_eq!(tile.dimensions(), (8, 8));
    }

    #[test]
    fn test_failed_tile_does_not_stop_the_rest() {
        let out = TempDir::new().unwrap();
        let writer =
            TileWriter::for_source(Path::new("flag.bmp"), out.path(), Naming::Grid).unwrap();
        let cells = vec![
            cell(0, 0, Rectangle::new(0, 0, 10, 10)),
            cell(0, 1, Rectangle::new(10, 0, 20, 10)),
        ];
        // A directory squatting on the first tile's path makes it unwritable
        std::fs::create_dir_all(writer.tile_path(&cells[0])).unwrap();

        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 10, Rgb([1, 2, 3])));
        let results = writer.write(&img, &cells).unwrap();

        assert!(matches!(results[0].error, Some(SplitError::Write { .. })));
        assert!(results[1].is_written());
    }

    #[test]
    fn test_failed_encoding_leaves_no_file() {
        let out = TempDir::new().unwrap();
        let writer =
            TileWriter::for_source(Path::new("hdr.png"), out.path(), Naming::Grid).unwrap();
        let c = cell(0, 0, Rectangle::new(0, 0, 4, 4));
        // PNG has no 32-bit float colour type
        let img = DynamicImage::ImageRgb32F(Rgb32FImage::new(4, 4));

        let results = writer.write(&img, &[c]).unwrap();

        assert!(matches!(results[0].error, Some(SplitError::Write { .. })));
        assert!(!writer.tile_path(&c).exists());
    }

    #[test]
    fn test_writes_other_allowed_formats() {
        let out = TempDir::new().unwrap();

        for source in ["anim.gif", "scan.tiff", "pic.webp"] {
            let writer =
                TileWriter::for_source(Path::new(source), out.path(), Naming::Grid).unwrap();

            let results = writer
                .write(&quadrants(), &[cell(0, 1, Rectangle::new(10, 0, 20, 10))])
                .unwrap();

            assert!(results[0].is_written(), "{}: {:?}", source, results[0].error);
            let tile = image::open(&results[0].path).unwrap();
            assert_eq!(tile.dimensions(), (10, 10), "{}", source);
        }
    }

    #[test]
    fn test_rejects_unknown_source_format() {
        let out = TempDir::new().unwrap();

        let result = TileWriter::for_source(Path::new("notes.txt"), out.path(), Naming::Grid);

        assert!(matches!(result, Err(SplitError::UnsupportedFormat(_))));
    }
}
