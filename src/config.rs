//! Run configuration.

use std::path::PathBuf;

/// Default folder holding the source images.
pub const DEFAULT_INPUT_DIR: &str = "images";

/// Default folder the tiles are written under.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Where to read images from and write tiles to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Folder the source images are listed from.
    pub input_dir: PathBuf,
    /// Folder holding one tile folder per source image.
    pub output_dir: PathBuf,
}

impl Config {
    /// Build a configuration from the two folders.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Config {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR)
    }
}
