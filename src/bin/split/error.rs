//! CLI error handling with user-friendly messages.

use std::process;

use splitter::SplitError;
use thiserror::Error;

/// Errors that end a run of the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// The terminal prompt failed (closed stdin, not a terminal, ...)
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// The input folder couldn't be prepared or read
    #[error("{0}")]
    Input(SplitError),

    /// `--image` named a file that isn't in the input folder
    #[error("Image '{0}' not found in the input folder")]
    UnknownImage(String),

    /// The run could not start
    #[error("{0}")]
    Split(SplitError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Prompt(_) = self {
            eprintln!();
            eprintln!("Run from an interactive terminal, or pass the choices as flags:");
            eprintln!("  split --all --size 640x480");
            eprintln!("  split --image photo.jpg --ratio 4:5");
        }

        process::exit(1)
    }
}
