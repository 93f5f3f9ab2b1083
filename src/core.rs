//! Geometry and tiling parameters.

use std::fmt;

/// Alias for width and height
pub type Dimensions = (u32, u32);

/// Fraction of a full piece a clipped edge piece must reach to be kept.
///
/// Also decides whether a leftover strip earns an extra row or column.
pub const MIN_PIECE_FRACTION: f64 = 0.5;

/// A pixel region of an image, right and bottom edges exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rectangle {
    /// First column inside the region.
    pub left: u32,
    /// First row inside the region.
    pub top: u32,
    /// First column past the region.
    pub right: u32,
    /// First row past the region.
    pub bottom: u32,
}

impl Rectangle {
    /// Create a region from its edges.
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Rectangle {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    /// Width and height.
    pub fn dimensions(&self) -> Dimensions {
        (self.width(), self.height())
    }
}

/// A rectangle together with its 0-based grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Row, counted from 0 at the top.
    pub row: u32,
    /// Column, counted from 0 at the left.
    pub col: u32,
    /// The pixels covered, clipped to the image.
    pub area: Rectangle,
}

/// Cut into cells of a fixed pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSpec {
    /// Width of a full cell in pixels.
    pub cell_width: u32,
    /// Height of a full cell in pixels.
    pub cell_height: u32,
}

/// Cut into as many cells of the given aspect ratio as fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioSpec {
    /// Width part of the ratio.
    pub ratio_w: f64,
    /// Height part of the ratio.
    pub ratio_h: f64,
    /// See [`MIN_PIECE_FRACTION`].
    pub min_piece_fraction: f64,
}

impl RatioSpec {
    /// A ratio spec using the default [`MIN_PIECE_FRACTION`].
    pub fn new(ratio_w: f64, ratio_h: f64) -> RatioSpec {
        Self {
            ratio_w,
            ratio_h,
            min_piece_fraction: MIN_PIECE_FRACTION,
        }
    }

    /// Replace the minimum piece fraction.
    pub fn with_min_piece_fraction(self, min_piece_fraction: f64) -> RatioSpec {
        Self {
            min_piece_fraction,
            ..self
        }
    }

    /// Width over height.
    pub fn target_ratio(&self) -> f64 {
        self.ratio_w / self.ratio_h
    }
}

/// How an image should be split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitSpec {
    /// Fixed pixel cells.
    Pixel(TileSpec),
    /// Cells of an aspect ratio.
    Ratio(RatioSpec),
}

impl SplitSpec {
    /// Shorthand for [`SplitSpec::Pixel`].
    pub fn pixel(cell_width: u32, cell_height: u32) -> SplitSpec {
        SplitSpec::Pixel(TileSpec {
            cell_width,
            cell_height,
        })
    }

    /// Shorthand for [`SplitSpec::Ratio`] with the default fraction.
    pub fn ratio(ratio_w: f64, ratio_h: f64) -> SplitSpec {
        SplitSpec::Ratio(RatioSpec::new(ratio_w, ratio_h))
    }
}

impl fmt::Display for SplitSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitSpec::Pixel(spec) => {
                write!(f, "PIXEL ({}x{}px)", spec.cell_width, spec.cell_height)
            }
            SplitSpec::Ratio(spec) => write!(f, "RATIO ({:?}:{:?})", spec.ratio_w, spec.ratio_h),
        }
    }
}
