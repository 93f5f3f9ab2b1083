//! Error types for splitting images.

use std::io;
use std::path::PathBuf;

use image::ImageError;
use thiserror::Error;

/// Convenience alias for results carrying a [`SplitError`].
pub type Result<T> = std::result::Result<T, SplitError>;

/// Errors that can occur while splitting an image.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Tiling parameters rejected before any I/O.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The ratio and image size leave no room for a single pixel.
    #[error("Ratio {ratio_w:?}:{ratio_h:?} gives an empty piece for a {width}x{height}px image")]
    DegenerateTile {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
        /// Requested ratio width.
        ratio_w: f64,
        /// Requested ratio height.
        ratio_h: f64,
    },

    /// The input directory does not exist.
    #[error("Directory '{}' not found", .0.display())]
    MissingDirectory(PathBuf),

    /// The input directory exists but can't be read.
    #[error("Failed to list '{}': {source}", .path.display())]
    ListDirectory {
        /// The folder.
        path: PathBuf,
        /// Underlying failure.
        source: io::Error,
    },

    /// The source file can't be opened or decoded.
    #[error("Failed to open image '{}': {source}", .path.display())]
    Decode {
        /// The source image.
        path: PathBuf,
        /// Underlying failure.
        source: ImageError,
    },

    /// The destination folder can't be created.
    #[error("Failed to create directory '{}': {source}", .path.display())]
    CreateDirectory {
        /// The folder.
        path: PathBuf,
        /// Underlying failure.
        source: io::Error,
    },

    /// A tile could not be written.
    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        /// The tile.
        path: PathBuf,
        /// Underlying failure.
        source: ImageError,
    },

    /// The source extension maps to no known image format.
    #[error("Unsupported image format for '{}'", .0.display())]
    UnsupportedFormat(PathBuf),
}

impl SplitError {
    /// Whether the error was raised by parameter validation.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SplitError::InvalidArgument(_))
    }
}
