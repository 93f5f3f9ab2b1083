//! Interactive prompts.
//!
//! Only asks and validates; every value handed back is ready for the
//! library to use as-is.

use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

use splitter::input::{parse_ratio, InputError};
use splitter::library::file_name;
use splitter::{RatioSpec, SplitError, SplitSpec, TileSpec};

use crate::error::CliError;

/// Ask which image to split, or all of them.
pub fn select_images(theme: &ColorfulTheme, images: &[PathBuf]) -> Result<Vec<PathBuf>, CliError> {
    let items: Vec<String> = images
        .iter()
        .map(|p| file_name(p))
        .chain(std::iter::once("All images".to_string()))
        .collect();

    let selection = Select::with_theme(theme)
        .with_prompt("Select the image to split")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(match images.get(selection) {
        Some(image) => vec![image.clone()],
        None => images.to_vec(),
    })
}

/// Ask for the splitting mode and its parameters.
pub fn choose_spec(theme: &ColorfulTheme, min_piece_fraction: f64) -> Result<SplitSpec, CliError> {
    let modes = vec![
        "By PIXEL (e.g. 640x480 pixels)",
        "By RATIO (e.g. 1:1, 16:9, 4:3, 4:5 for feeds)",
    ];

    let mode = Select::with_theme(theme)
        .with_prompt("Select the splitting mode")
        .items(&modes)
        .default(0)
        .interact()?;

    if mode == 0 {
        Ok(SplitSpec::Pixel(ask_size(theme)?))
    } else {
        let spec = ask_ratio(theme)?.with_min_piece_fraction(min_piece_fraction);
        Ok(SplitSpec::Ratio(spec))
    }
}

fn ask_size(theme: &ColorfulTheme) -> Result<TileSpec, CliError> {
    let cell_width = ask_dimension(theme, "Piece width in pixels")?;
    let cell_height = ask_dimension(theme, "Piece height in pixels")?;
    Ok(TileSpec {
        cell_width,
        cell_height,
    })
}

fn ask_dimension(theme: &ColorfulTheme, prompt: &str) -> Result<u32, CliError> {
    let value = Input::<u32>::with_theme(theme)
        .with_prompt(prompt)
        .validate_with(|v: &u32| -> Result<(), InputError> {
            if *v == 0 {
                Err(InputError::NotPositive)
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(value)
}

fn ask_ratio(theme: &ColorfulTheme) -> Result<RatioSpec, CliError> {
    let text: String = Input::with_theme(theme)
        .with_prompt("Ratio as width:height (e.g. 1:1, 16:9, 4:3, 3:2)")
        .validate_with(|s: &String| parse_ratio(s).map(|_| ()))
        .interact_text()?;

    parse_ratio(&text).map_err(|e| CliError::Input(SplitError::InvalidArgument(e.to_string())))
}
