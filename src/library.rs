//! Discovery of source images in the input directory.

use std::fs::read_dir;
use std::io;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use tracing::debug;

use crate::core::Dimensions;
use crate::error::{Result, SplitError};

/// Extensions accepted as source images, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "bmp", "tiff", "webp"];

/// What is known about a source image before it is decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDescriptor {
    /// Location of the source file.
    pub path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Container format, taken from the extension.
    pub format: ImageFormat,
}

impl ImageDescriptor {
    /// Read the dimensions from the file header without decoding pixels.
    pub fn probe(path: &Path) -> Result<ImageDescriptor> {
        let format =
            ImageFormat::from_path(path).map_err(|_| SplitError::UnsupportedFormat(path.into()))?;
        let (width, height) = image::image_dimensions(path).map_err(|source| SplitError::Decode {
            path: path.into(),
            source,
        })?;
        Ok(Self {
            path: path.into(),
            width,
            height,
            format,
        })
    }

    /// Width and height.
    pub fn dimensions(&self) -> Dimensions {
        (self.width, self.height)
    }

    /// The file name without its directory.
    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }
}

/// Whether the path has one of the supported image extensions.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Find the supported images directly inside a directory, sorted by name.
pub fn find_images(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SplitError::MissingDirectory(dir.into()));
    }
    let path_reader = read_dir(dir).map_err(|source| SplitError::ListDirectory {
        path: dir.into(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = path_reader
        .filter_map(io::Result::ok)
        .map(|f| f.path())
        .filter(|p| p.is_file() && is_supported(p))
        .collect();
    paths.sort();

    debug!(dir = %dir.display(), found = paths.len(), "Listed images");
    Ok(paths)
}

/// Pick an image from the list by its file name.
pub fn find_by_name<'a>(images: &'a [PathBuf], name: &str) -> Option<&'a PathBuf> {
    images.iter().find(|p| file_name(p) == name)
}

/// The file name without its directory.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The file name without directory or extension.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The extension as written on disk, with its leading dot.
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
