//! Grid arithmetic for both splitting modes.

use itertools::iproduct;
use num::Integer;
use tracing::debug;

use crate::core::{Cell, Dimensions, RatioSpec, Rectangle, SplitSpec, TileSpec};
use crate::error::{Result, SplitError};

/// The cells chosen for one image, with the grid they were cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Size of a full, unclipped piece.
    pub piece: Dimensions,
    /// Columns in the grid.
    pub cols: u32,
    /// Rows in the grid.
    pub rows: u32,
    /// Kept cells in row-major order.
    pub cells: Vec<Cell>,
}

impl Grid {
    /// Number of positions in the grid, including any discarded ones.
    pub fn positions(&self) -> u32 {
        self.cols * self.rows
    }
}

/// Compute the cells to cut from an image of the given size.
pub fn compute_rectangles(size: Dimensions, spec: &SplitSpec) -> Result<Grid> {
    let grid = match spec {
        SplitSpec::Pixel(spec) => pixel_grid(size, spec)?,
        SplitSpec::Ratio(spec) => ratio_grid(size, spec)?,
    };
    debug!(
        width = size.0,
        height = size.1,
        cols = grid.cols,
        rows = grid.rows,
        kept = grid.cells.len(),
        "Computed grid"
    );
    Ok(grid)
}

/// Cover the whole image with fixed size cells.
///
/// The last column and row are clipped to the image edges, so nothing is
/// ignored and nothing is dropped.
pub fn pixel_grid((width, height): Dimensions, spec: &TileSpec) -> Result<Grid> {
    validate_cell_size(spec)?;
    let TileSpec {
        cell_width,
        cell_height,
    } = *spec;

    let cols = Integer::div_ceil(&width, &cell_width);
    let rows = Integer::div_ceil(&height, &cell_height);
    let cells = cells_within((width, height), (cell_width, cell_height), cols, rows).collect();

    Ok(Grid {
        piece: (cell_width, cell_height),
        cols,
        rows,
        cells,
    })
}

/// Cut as many pieces of the target ratio as fit along the longer side.
///
/// A leftover strip bigger than the minimum fraction of a piece earns one
/// extra, narrower piece; any piece smaller than that is discarded.
pub fn ratio_grid((width, height): Dimensions, spec: &RatioSpec) -> Result<Grid> {
    validate_ratio(spec)?;

    let (piece, cols, rows) = ratio_layout((width, height), spec)?;
    let (piece_width, piece_height) = piece;
    let min_width = f64::from(piece_width) * spec.min_piece_fraction;
    let min_height = f64::from(piece_height) * spec.min_piece_fraction;

    let cells = cells_within((width, height), piece, cols, rows)
        .filter(|c| f64::from(c.area.width()) >= min_width)
        .filter(|c| f64::from(c.area.height()) >= min_height)
        .collect();

    Ok(Grid {
        piece,
        cols,
        rows,
        cells,
    })
}

/// Choose the piece size and grid shape for the ratio, before filtering.
fn ratio_layout(
    (width, height): Dimensions,
    spec: &RatioSpec,
) -> Result<(Dimensions, u32, u32)> {
    let target = spec.target_ratio();
    let degenerate = || SplitError::DegenerateTile {
        width,
        height,
        ratio_w: spec.ratio_w,
        ratio_h: spec.ratio_h,
    };

    if f64::from(width) / f64::from(height) > target {
        // Wider than the target: a horizontal strip of full height pieces
        let piece_width = (f64::from(height) * target).floor() as u32;
        if piece_width == 0 {
            return Err(degenerate());
        }
        let (cols, remainder) = width.div_rem(&piece_width);
        let cols = cols + extra_piece(remainder, piece_width, spec.min_piece_fraction);
        Ok(((piece_width, height), cols, 1))
    } else {
        // Taller than (or exactly) the target: a vertical strip of full width pieces
        let piece_height = (f64::from(width) / target).floor() as u32;
        if piece_height == 0 {
            return Err(degenerate());
        }
        let (rows, remainder) = height.div_rem(&piece_height);
        let rows = rows + extra_piece(remainder, piece_height, spec.min_piece_fraction);
        Ok(((width, piece_height), 1, rows))
    }
}

fn extra_piece(remainder: u32, piece: u32, min_fraction: f64) -> u32 {
    u32::from(f64::from(remainder) > f64::from(piece) * min_fraction)
}

/// Check the parameters without touching any image.
pub fn validate(spec: &SplitSpec) -> Result<()> {
    match spec {
        SplitSpec::Pixel(spec) => validate_cell_size(spec),
        SplitSpec::Ratio(spec) => validate_ratio(spec),
    }
}

fn validate_cell_size(spec: &TileSpec) -> Result<()> {
    if spec.cell_width == 0 || spec.cell_height == 0 {
        return Err(SplitError::InvalidArgument(format!(
            "cell size must be positive, got {}x{}",
            spec.cell_width, spec.cell_height
        )));
    }
    Ok(())
}

fn validate_ratio(spec: &RatioSpec) -> Result<()> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !positive(spec.ratio_w) || !positive(spec.ratio_h) {
        return Err(SplitError::InvalidArgument(format!(
            "ratio components must be positive, got {:?}:{:?}",
            spec.ratio_w, spec.ratio_h
        )));
    }
    if !(0.0..=1.0).contains(&spec.min_piece_fraction) {
        return Err(SplitError::InvalidArgument(format!(
            "minimum piece fraction must be between 0 and 1, got {}",
            spec.min_piece_fraction
        )));
    }
    Ok(())
}

/// Row-major cells of the given piece size, clipped to the image.
fn cells_within(
    (width, height): Dimensions,
    (piece_width, piece_height): Dimensions,
    cols: u32,
    rows: u32,
) -> impl Iterator<Item = Cell> {
    iproduct!(0..rows, 0..cols).map(move |(row, col)| {
        let left = col * piece_width;
        let top = row * piece_height;
        let area = Rectangle::new(
            left,
            top,
            left.saturating_add(piece_width).min(width),
            top.saturating_add(piece_height).min(height),
        );
        Cell { row, col, area }
    })
}
