//! Parsing of the tiling parameters typed by the user.

use thiserror::Error;

use crate::core::{RatioSpec, TileSpec};

/// Reasons typed parameters are rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// Not two parts around the separator.
    #[error("Format must be {0}")]
    Format(&'static str),

    /// A part didn't parse as a finite number.
    #[error("'{0}' is not a valid number")]
    NotANumber(String),

    /// A value was zero or negative.
    #[error("Value must be more than 0")]
    NotPositive,
}

/// Parse a ratio written as `W:H`, e.g. `16:9` or `1.91:1`.
pub fn parse_ratio(text: &str) -> Result<RatioSpec, InputError> {
    let (w, h) = split_pair(text, ':').ok_or(InputError::Format("width:height (e.g. 1:1)"))?;
    Ok(RatioSpec::new(parse_component(w)?, parse_component(h)?))
}

/// Parse a cell size written as `WxH`, e.g. `640x480`.
pub fn parse_size(text: &str) -> Result<TileSpec, InputError> {
    let (w, h) = split_pair(&text.to_ascii_lowercase(), 'x')
        .map(|(w, h)| (w.to_owned(), h.to_owned()))
        .ok_or(InputError::Format("widthxheight (e.g. 640x480)"))?;
    Ok(TileSpec {
        cell_width: parse_dimension(&w)?,
        cell_height: parse_dimension(&h)?,
    })
}

/// Parse a positive whole number of pixels.
pub fn parse_dimension(text: &str) -> Result<u32, InputError> {
    let text = text.trim();
    let value: i64 = text
        .parse()
        .map_err(|_| InputError::NotANumber(text.to_owned()))?;
    if value <= 0 {
        return Err(InputError::NotPositive);
    }
    u32::try_from(value).map_err(|_| InputError::NotANumber(text.to_owned()))
}

fn parse_component(text: &str) -> Result<f64, InputError> {
    let text = text.trim();
    let value: f64 = text
        .parse()
        .map_err(|_| InputError::NotANumber(text.to_owned()))?;
    if !value.is_finite() {
        return Err(InputError::NotANumber(text.to_owned()));
    }
    if value <= 0.0 {
        return Err(InputError::NotPositive);
    }
    Ok(value)
}

/// Split into exactly two parts around the separator.
fn split_pair(text: &str, sep: char) -> Option<(&str, &str)> {
    let mut parts = text.trim().split(sep);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => Some((a, b)),
        _ => None,
    }
}
